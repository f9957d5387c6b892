//! The transport collaborator.
//!
//! # Design
//! The core never does I/O itself. A `Transport` takes a `TransportRequest`
//! and hands back whatever the server said as a `TransportResponse`,
//! including 4xx/5xx answers: status interpretation belongs to the
//! executor, not the transport. `Err` is reserved for failures where no HTTP
//! response exists at all.

use std::sync::Arc;

use crate::error::BoxError;
use crate::http::{TransportRequest, TransportResponse};

/// Failure to obtain an HTTP response.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Executes a request against the network (or a test double).
pub trait Transport: Send + Sync {
    fn submit(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn submit(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        (**self).submit(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn submit(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        (**self).submit(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn submit(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        (**self).submit(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "ureq")]
mod blocking {
    use super::{Transport, TransportError};
    use crate::http::{Headers, TransportRequest, TransportResponse};

    /// Blocking transport backed by a `ureq::Agent`.
    ///
    /// Non-2xx statuses are returned as data. Timeouts, proxies and redirect
    /// policy are whatever the agent was configured with.
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }

        /// Use a caller-configured agent. It should have
        /// `http_status_as_error(false)`, or 4xx/5xx surface as transport
        /// failures instead of `ServerError`.
        pub fn from_agent(agent: ureq::Agent) -> Self {
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Transport for UreqTransport {
        fn submit(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
            let mut builder = ureq::http::Request::builder()
                .method(http::Method::from(request.method))
                .uri(request.url.as_str());
            for (name, value) in request.headers.iter() {
                builder = builder.header(name, value);
            }

            let result = match &request.body {
                Some(body) => {
                    let req = builder
                        .body(body.as_slice())
                        .map_err(|e| TransportError::with_source("invalid request", e))?;
                    self.agent.run(req)
                }
                None => {
                    let req = builder
                        .body(())
                        .map_err(|e| TransportError::with_source("invalid request", e))?;
                    self.agent.run(req)
                }
            };
            let mut response = result.map_err(|e| {
                TransportError::with_source(format!("{} {} failed", request.method, request.url), e)
            })?;

            let status = response.status().as_u16();
            let headers: Headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str(), v)))
                .collect();
            let body = response
                .body_mut()
                .read_to_vec()
                .map_err(|e| TransportError::with_source("failed to read response body", e))?;

            Ok(TransportResponse { status, headers, body })
        }
    }
}
