//! Endpoint → `TransportRequest`.
//!
//! # Design
//! `build` is pure: no I/O, no defaults injected, and the same endpoint always
//! yields the same request (or the same error). The base URL and path are
//! joined as strings before parsing so that a base with a path prefix
//! (`https://host/v1`) keeps it, which `Url::join` would not.
//!
//! Query parameters keep their insertion order and are form-encoded, so a
//! space becomes `+`.

use url::Url;

use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::http::TransportRequest;

/// Build a transport-ready request from `endpoint`.
pub fn build<E: Endpoint + ?Sized>(endpoint: &E) -> Result<TransportRequest, Error> {
    let mut url = resolve(&endpoint.base_url(), &endpoint.path())?;

    let query = endpoint.query_parameters();
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query.iter());
    }

    let url = assemble(url)?;

    Ok(TransportRequest {
        method: endpoint.method(),
        url,
        headers: endpoint.headers(),
        body: endpoint.body(),
    })
}

/// Join base and path into a URL with a host.
fn resolve(base: &str, path: &str) -> Result<Url, Error> {
    let base = base.trim();
    if base.is_empty() {
        return Err(Error::InvalidUrl("invalid base URL or path: base URL is empty".into()));
    }

    let joined = join(base, path);
    let url = Url::parse(&joined)
        .map_err(|e| Error::InvalidUrl(format!("invalid base URL or path `{joined}`: {e}")))?;

    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(Error::InvalidUrl(format!(
            "invalid base URL or path `{joined}`: URL has no host"
        )));
    }
    Ok(url)
}

fn join(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Final check once the query has been appended.
fn assemble(url: Url) -> Result<String, Error> {
    if url.host_str().is_none() {
        return Err(Error::InvalidUrl(format!(
            "failed to assemble final URL `{url}`: URL has no host"
        )));
    }
    let url = String::from(url);
    if url.is_empty() {
        return Err(Error::InvalidUrl("failed to assemble final URL: result is empty".into()));
    }
    Ok(url)
}
