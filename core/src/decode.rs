//! Response body decoding.

use serde::de::DeserializeOwned;

/// Turns raw response bytes into a typed value.
pub trait Decoder {
    type Error: std::error::Error + Send + Sync + 'static;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, Self::Error>;
}

impl<D: Decoder + ?Sized> Decoder for &D {
    type Error = D::Error;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, Self::Error> {
        (**self).decode(bytes)
    }
}

/// Default decoder: JSON via serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    type Error = serde_json::Error;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, Self::Error> {
        serde_json::from_slice(bytes)
    }
}
