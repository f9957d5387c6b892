//! Typed requests against named API endpoints.
//!
//! # Overview
//! An [`Endpoint`] describes one API call. [`build`] turns it into a
//! [`TransportRequest`] without touching the network; [`ApiClient`] submits
//! that request through a [`Transport`], classifies the status and decodes
//! the body into the caller's type.
//!
//! ```no_run
//! # #[cfg(feature = "ureq")] {
//! use api_core::{ApiClient, EndpointDescriptor, UreqTransport};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! let client = ApiClient::new(UreqTransport::new());
//! let endpoint = EndpointDescriptor::get("https://api.example.com").path("/users/7");
//! let user: User = client.execute(&endpoint)?;
//! # }
//! # Ok::<(), api_core::Error>(())
//! ```
//!
//! # Design
//! - Nothing here holds mutable state; an `ApiClient` can be shared freely.
//! - Failures are one of the four [`Error`] cases and are always returned,
//!   never logged and dropped.
//! - The transport is the only I/O boundary, so tests swap it for a double.

pub mod builder;
pub mod client;
pub mod decode;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod transport;

pub use crate::builder::build;
pub use crate::client::{classify, ApiClient};
pub use crate::decode::{Decoder, JsonDecoder};
pub use crate::endpoint::{Endpoint, EndpointDescriptor};
pub use crate::error::{BoxError, Error};
pub use crate::http::{Headers, Method, QueryParams, TransportRequest, TransportResponse};
pub use crate::transport::{Transport, TransportError};

#[cfg(feature = "ureq")]
pub use crate::transport::UreqTransport;
