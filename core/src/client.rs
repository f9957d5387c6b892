//! Request execution and response decoding.
//!
//! # Design
//! `ApiClient` holds a transport and a default decoder and nothing else, so
//! concurrent callers can share one instance. Each call builds a fresh
//! request, submits it once, classifies the status and decodes the body.
//! Retries, timeouts and caching belong to the transport or to the caller.
//!
//! The classification and decoding halves (`classify`, `parse`) are public
//! so callers that perform the round-trip themselves can still reuse them.

use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::builder::build;
use crate::decode::{Decoder, JsonDecoder};
use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::http::TransportResponse;
use crate::transport::Transport;

/// Status codes a transport may report for a real HTTP response.
const CLASSIFIABLE: std::ops::RangeInclusive<u16> = 100..=599;

/// Executes endpoints against a transport and decodes the results.
#[derive(Debug, Clone)]
pub struct ApiClient<T, D = JsonDecoder> {
    transport: T,
    decoder: D,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            decoder: JsonDecoder,
        }
    }
}

#[cfg(feature = "ureq")]
impl Default for ApiClient<crate::transport::UreqTransport> {
    fn default() -> Self {
        Self::new(crate::transport::UreqTransport::new())
    }
}

impl<T: Transport, D: Decoder> ApiClient<T, D> {
    pub fn with_decoder(transport: T, decoder: D) -> Self {
        Self { transport, decoder }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build, submit, classify and decode with the client's decoder.
    pub fn execute<V, E>(&self, endpoint: &E) -> Result<V, Error>
    where
        V: DeserializeOwned,
        E: Endpoint + ?Sized,
    {
        self.execute_with(endpoint, &self.decoder)
    }

    /// Like [`execute`](Self::execute) with a per-call decoder.
    pub fn execute_with<V, E, C>(&self, endpoint: &E, decoder: &C) -> Result<V, Error>
    where
        V: DeserializeOwned,
        E: Endpoint + ?Sized,
        C: Decoder + ?Sized,
    {
        let response = self.execute_raw(endpoint)?;
        decode(&response.body, decoder)
    }

    /// Build, submit and classify. Returns the successful response undecoded.
    pub fn execute_raw<E: Endpoint + ?Sized>(&self, endpoint: &E) -> Result<TransportResponse, Error> {
        let request = build(endpoint)?;
        debug!(method = %request.method, url = %request.url, "submitting request");

        let response = self
            .transport
            .submit(&request)
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;
        debug!(
            method = %request.method,
            url = %request.url,
            status = response.status,
            bytes = response.body.len(),
            "response received"
        );

        classify(response)
    }

    /// Classify a response obtained elsewhere and decode it with the
    /// client's decoder.
    pub fn parse<V: DeserializeOwned>(&self, response: TransportResponse) -> Result<V, Error> {
        let response = classify(response)?;
        decode(&response.body, &self.decoder)
    }
}

/// Map a response to success (2xx) or the matching error.
pub fn classify(response: TransportResponse) -> Result<TransportResponse, Error> {
    if !CLASSIFIABLE.contains(&response.status) {
        return Err(Error::InvalidResponse(format!(
            "status {} is not an HTTP status code",
            response.status
        )));
    }
    if response.is_success() {
        return Ok(response);
    }
    let body = (!response.body.is_empty()).then_some(response.body);
    Err(Error::ServerError {
        status: response.status,
        body,
    })
}

fn decode<V, C>(bytes: &[u8], decoder: &C) -> Result<V, Error>
where
    V: DeserializeOwned,
    C: Decoder + ?Sized,
{
    trace!(bytes = bytes.len(), target_type = std::any::type_name::<V>(), "decoding body");
    decoder.decode(bytes).map_err(|e| Error::Decoding(Box::new(e)))
}
