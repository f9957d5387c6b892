//! Error taxonomy for the request pipeline.
//!
//! # Design
//! Four closed cases cover every failure `build` and `execute` can report.
//! Non-2xx responses are not split by status class: callers match on
//! `ServerError::status` and inspect the preserved body themselves.

use std::error::Error as StdError;

/// Boxed cause carried by [`Error::Decoding`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors returned by the request builder and the executor.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The endpoint could not be turned into a resolvable URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The transport did not produce a classifiable HTTP response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The server answered with a status outside 200..300.
    #[error("{}", server_error_message(*.status, .body.as_deref()))]
    ServerError { status: u16, body: Option<Vec<u8>> },

    /// The response body could not be decoded into the requested type.
    #[error("decoding failed: {0}")]
    Decoding(#[source] BoxError),
}

impl Error {
    /// Status code of a `ServerError`.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw body of a `ServerError`, unmodified.
    pub fn body(&self) -> Option<&[u8]> {
        match self {
            Error::ServerError { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::ServerError { .. })
    }
}

fn server_error_message(status: u16, body: Option<&[u8]>) -> String {
    match body.map(std::str::from_utf8) {
        Some(Ok(text)) => format!("server error (HTTP {status}): {text}"),
        Some(Err(_)) => format!("server error (HTTP {status}): <{} bytes>", body.map_or(0, <[u8]>::len)),
        None => format!("server error (HTTP {status})"),
    }
}
