//! The endpoint contract.
//!
//! # Design
//! An endpoint is read, never mutated: every accessor takes `&self` and must
//! return the same value on every call. Concrete APIs usually implement
//! [`Endpoint`] on an enum with one variant per call and branch in each
//! accessor. [`EndpointDescriptor`] is the record form for one-off calls.

use std::borrow::Cow;

use serde::Serialize;

use crate::http::{Headers, Method, QueryParams};

/// Describes one API call.
///
/// `headers`, `query_parameters` and `body` default to empty / absent, so an
/// implementation only overrides what it needs.
pub trait Endpoint {
    /// Absolute origin, e.g. `https://api.example.com`.
    fn base_url(&self) -> Cow<'_, str>;

    /// Resource path appended to the base URL. May be empty.
    fn path(&self) -> Cow<'_, str>;

    fn method(&self) -> Method;

    fn headers(&self) -> Headers {
        Headers::new()
    }

    fn query_parameters(&self) -> QueryParams {
        QueryParams::new()
    }

    fn body(&self) -> Option<Vec<u8>> {
        None
    }
}

impl<E: Endpoint + ?Sized> Endpoint for &E {
    fn base_url(&self) -> Cow<'_, str> {
        (**self).base_url()
    }

    fn path(&self) -> Cow<'_, str> {
        (**self).path()
    }

    fn method(&self) -> Method {
        (**self).method()
    }

    fn headers(&self) -> Headers {
        (**self).headers()
    }

    fn query_parameters(&self) -> QueryParams {
        (**self).query_parameters()
    }

    fn body(&self) -> Option<Vec<u8>> {
        (**self).body()
    }
}

/// An endpoint described as plain data.
///
/// ```
/// use api_core::{EndpointDescriptor, Method};
///
/// let endpoint = EndpointDescriptor::new("https://api.example.com", Method::Get)
///     .path("/users")
///     .query("limit", 10)
///     .header("Accept", "application/json");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub base_url: String,
    pub path: String,
    pub method: Method,
    pub headers: Headers,
    pub query: QueryParams,
    pub body: Option<Vec<u8>>,
}

impl EndpointDescriptor {
    pub fn new(base_url: impl Into<String>, method: Method) -> Self {
        Self {
            base_url: base_url.into(),
            method,
            ..Default::default()
        }
    }

    pub fn get(base_url: impl Into<String>) -> Self {
        Self::new(base_url, Method::Get)
    }

    pub fn post(base_url: impl Into<String>) -> Self {
        Self::new(base_url, Method::Post)
    }

    pub fn put(base_url: impl Into<String>) -> Self {
        Self::new(base_url, Method::Put)
    }

    pub fn delete(base_url: impl Into<String>) -> Self {
        Self::new(base_url, Method::Delete)
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `body` as JSON. No `Content-Type` header is added.
    pub fn json_body(mut self, body: &impl Serialize) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }
}

impl Endpoint for EndpointDescriptor {
    fn base_url(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.base_url)
    }

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.path)
    }

    fn method(&self) -> Method {
        self.method
    }

    fn headers(&self) -> Headers {
        self.headers.clone()
    }

    fn query_parameters(&self) -> QueryParams {
        self.query.clone()
    }

    fn body(&self) -> Option<Vec<u8>> {
        self.body.clone()
    }
}
