//! Outbound HTTP seam.
//!
//! Client-side (csr): real HTTP calls via `gloo-net`.
//! Native builds (tests, tooling): [`GlooTransport`] fails every request with
//! a transport error, since these endpoints are only meaningful in the browser.
//!
//! DESIGN
//! ======
//! Requests and responses are plain data so the layers above can be driven by
//! in-memory transports in tests without a browser.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::rc::Rc;
use std::sync::Arc;

use serde::Serialize;

use super::error::RequestError;

/// Header name every request carries.
pub const CONTENT_TYPE: &str = "Content-Type";

/// Default request body encoding.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP methods used by the backend API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// An outbound request, fully composed.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// New request with the JSON content type already set.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: vec![(CONTENT_TYPE.to_owned(), JSON_CONTENT_TYPE.to_owned())],
            body: None,
        }
    }

    /// Set a header, replacing any existing one with the same
    /// (case-insensitive) name.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Serialize `data` as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Body`] if `data` cannot be serialized.
    pub fn json_body<B: Serialize + ?Sized>(mut self, data: &B) -> Result<Self, RequestError> {
        self.body = Some(serde_json::to_string(data)?);
        Ok(self)
    }

    /// Value of a header by case-insensitive name.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A settled response with its raw body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// True for 2xx statuses.
    #[must_use]
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends composed requests and returns settled responses.
///
/// Implementations only fail for transport-level problems; non-2xx statuses
/// are returned as responses.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError>;
}

impl<T: Transport + ?Sized> Transport for Rc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        (**self).send(request).await
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        (**self).send(request).await
    }
}

/// Browser `fetch` transport backed by `gloo-net`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        #[cfg(feature = "csr")]
        {
            use gloo_net::http::{Method as GlooMethod, RequestBuilder};

            let method = match request.method {
                Method::Get => GlooMethod::GET,
                Method::Post => GlooMethod::POST,
                Method::Put => GlooMethod::PUT,
                Method::Delete => GlooMethod::DELETE,
            };
            let mut builder = RequestBuilder::new(&request.url).method(method);
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            let built = match request.body {
                Some(body) => builder.body(body),
                None => builder.build(),
            }
            .map_err(|e| RequestError::Transport(e.to_string()))?;

            let resp = built
                .send()
                .await
                .map_err(|e| RequestError::Transport(e.to_string()))?;
            let status = resp.status();
            let content_type = resp.headers().get("content-type");
            let body = resp
                .binary()
                .await
                .map_err(|e| RequestError::Transport(e.to_string()))?;
            Ok(HttpResponse { status, content_type, body })
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(RequestError::Transport(format!(
                "{} {} is not available outside the browser",
                request.method.as_str(),
                request.url
            )))
        }
    }
}
