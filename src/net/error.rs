//! The single failure kind surfaced by the HTTP layer.
//!
//! ERROR HANDLING
//! ==============
//! Every variant renders as the user-facing message shown in the danger toast,
//! so callers never format errors themselves.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde::Deserialize;

/// Message used when a failed response carries no usable `error` field.
pub const GENERIC_FAILURE_MESSAGE: &str = "Ошибка запроса";

/// A failed request: transport problem, non-2xx status, or unusable body.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// The request never produced a response (network down, CORS, bad URL).
    #[error("{0}")]
    Transport(String),
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Status { status: u16, message: String },
    /// The request or response body could not be (de)serialized.
    #[error("{0}")]
    Body(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl RequestError {
    /// Build a status failure from a non-2xx response body.
    ///
    /// The body is expected to be JSON with an `error` string; anything else
    /// falls back to [`GENERIC_FAILURE_MESSAGE`].
    #[must_use]
    pub fn from_error_body(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_owned());
        Self::Status { status, message }
    }

    /// HTTP status code, when the failure came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Body(_) => None,
        }
    }
}

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Body(err.to_string())
    }
}
