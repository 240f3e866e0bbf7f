//! JSON request pipeline shared by every API facade.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each call holds the loading overlay for exactly the time the request is in
//! flight, decodes JSON on 2xx, and turns every failure into one danger toast
//! before handing the error back. Facades above decide whether to propagate
//! or convert to a sentinel.

#[cfg(test)]
#[path = "http_client_test.rs"]
mod http_client_test;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::RequestError;
use super::transport::{HttpRequest, Method, Transport};
use crate::config::join_url;
use crate::state::notices::{LoadingGuard, Notifier, Severity};

/// HTTP client with uniform headers, overlay handling and error toasts.
#[derive(Clone, Debug)]
pub struct HttpClient<T, N> {
    transport: T,
    notifier: N,
    base_url: String,
}

impl<T: Transport, N: Notifier> HttpClient<T, N> {
    pub fn new(transport: T, notifier: N) -> Self {
        Self { transport, notifier, base_url: String::new() }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Absolute URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Send a composed request and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns the [`RequestError`] after it has been shown as a danger toast.
    pub async fn request<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, RequestError> {
        let result = {
            let _loading = LoadingGuard::acquire(&self.notifier);
            self.dispatch(request).await
        };
        result.map_err(|err| self.surface(err))
    }

    /// `GET path`.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, RequestError> {
        self.request(HttpRequest::new(Method::Get, self.url(path))).await
    }

    /// `POST path` with `data` as the JSON body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn post<B, R>(&self, path: &str, data: &B) -> Result<R, RequestError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_with_body(Method::Post, path, data).await
    }

    /// `PUT path` with `data` as the JSON body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn put<B, R>(&self, path: &str, data: &B) -> Result<R, RequestError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_with_body(Method::Put, path, data).await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R, RequestError> {
        self.request(HttpRequest::new(Method::Delete, self.url(path))).await
    }

    async fn send_with_body<B, R>(&self, method: Method, path: &str, data: &B) -> Result<R, RequestError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        match HttpRequest::new(method, self.url(path)).json_body(data) {
            Ok(request) => self.request(request).await,
            Err(err) => Err(self.surface(err)),
        }
    }

    async fn dispatch<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, RequestError> {
        let response = self.transport.send(request).await?;
        if !response.ok() {
            return Err(RequestError::from_error_body(response.status, &response.body));
        }
        decode_json(&response.body)
    }

    fn surface(&self, err: RequestError) -> RequestError {
        self.notifier.show_toast(&err.to_string(), Severity::Danger);
        err
    }
}

/// Decode a 2xx body. Empty bodies decode as JSON `null`.
pub(crate) fn decode_json<R: DeserializeOwned>(body: &[u8]) -> Result<R, RequestError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(serde_json::Value::Null)?);
    }
    Ok(serde_json::from_slice(body)?)
}
