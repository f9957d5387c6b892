//! End-to-end runs against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every pipeline
//! outcome over real HTTP through `UreqTransport`.

#![cfg(feature = "ureq")]

use std::borrow::Cow;
use std::net::SocketAddr;

use api_core::{ApiClient, Endpoint, EndpointDescriptor, Error, Method, QueryParams, UreqTransport};
use mock_server::{Db, User};
use serde::Deserialize;

/// Start the mock server in a background thread and return its address.
fn start_server(db: Db) -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with(listener, db).await
        })
        .unwrap();
    });

    addr
}

/// The users API as an enum-backed endpoint.
enum Users {
    Get(u64),
    Search { name: String, limit: usize },
    Create(String),
    Delete(u64),
}

struct Api<'a> {
    base_url: &'a str,
    call: Users,
}

impl Endpoint for Api<'_> {
    fn base_url(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.base_url)
    }

    fn path(&self) -> Cow<'_, str> {
        match &self.call {
            Users::Get(id) | Users::Delete(id) => Cow::Owned(format!("/users/{id}")),
            Users::Search { .. } | Users::Create(_) => Cow::Borrowed("/users"),
        }
    }

    fn method(&self) -> Method {
        match self.call {
            Users::Get(_) | Users::Search { .. } => Method::Get,
            Users::Create(_) => Method::Post,
            Users::Delete(_) => Method::Delete,
        }
    }

    fn headers(&self) -> api_core::Headers {
        match self.call {
            Users::Create(_) => [("Content-Type", "application/json")].into_iter().collect(),
            _ => api_core::Headers::new(),
        }
    }

    fn query_parameters(&self) -> QueryParams {
        match &self.call {
            Users::Search { name, limit } => {
                let mut query = QueryParams::new();
                query.push("name", name);
                query.push("limit", limit);
                query
            }
            _ => QueryParams::new(),
        }
    }

    fn body(&self) -> Option<Vec<u8>> {
        match &self.call {
            Users::Create(name) => serde_json::to_vec(&serde_json::json!({ "name": name })).ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Echo {
    query: Vec<(String, String)>,
    headers: std::collections::BTreeMap<String, String>,
    body: String,
}

#[test]
fn users_lifecycle() {
    let addr = start_server(Db::seeded(["Ann"]));
    let base_url = format!("http://{addr}");
    let api = |call| Api { base_url: &base_url, call };
    let client = ApiClient::new(UreqTransport::new());

    // Step 1: get a seeded user.
    let ann: User = client.execute(&api(Users::Get(1))).unwrap();
    assert_eq!(ann, User { id: 1, name: "Ann".into() });

    // Step 2: create another.
    let bo: User = client.execute(&api(Users::Create("Bo".into()))).unwrap();
    assert_eq!(bo.name, "Bo");

    // Step 3: search with query parameters.
    let found: Vec<User> = client
        .execute(&api(Users::Search { name: "Bo".into(), limit: 5 }))
        .unwrap();
    assert_eq!(found, vec![bo.clone()]);

    // Step 4: delete returns 204 with no body.
    let response = client.execute_raw(&api(Users::Delete(bo.id))).unwrap();
    assert_eq!(response.status, 204);

    // Step 5: get after delete is a ServerError with the body preserved.
    let err = client.execute::<User, _>(&api(Users::Get(bo.id))).unwrap_err();
    assert_eq!(err.status(), Some(404));
    let body: serde_json::Value = serde_json::from_slice(err.body().unwrap()).unwrap();
    assert_eq!(body, serde_json::json!({ "error": "not found" }));
}

#[test]
fn query_headers_and_body_reach_the_server() {
    let addr = start_server(Db::default());
    let endpoint = EndpointDescriptor::put(format!("http://{addr}/"))
        .path("echo")
        .query("q", "a b")
        .query("limit", 10)
        .header("X-Trace", "abc")
        .body("payload");

    let echo: Echo = ApiClient::new(UreqTransport::new()).execute(&endpoint).unwrap();

    assert_eq!(
        echo.query,
        vec![("q".into(), "a b".into()), ("limit".into(), "10".into())]
    );
    assert_eq!(echo.headers.get("x-trace").map(String::as_str), Some("abc"));
    assert_eq!(echo.body, "payload");
}

#[test]
fn malformed_body_is_decoding_error() {
    let addr = start_server(Db::default());
    let endpoint = EndpointDescriptor::get(format!("http://{addr}")).path("/malformed");

    let err = ApiClient::new(UreqTransport::new())
        .execute::<User, _>(&endpoint)
        .unwrap_err();
    assert!(matches!(err, Error::Decoding(_)));
}

#[test]
fn unreachable_server_is_invalid_response() {
    // Bind then drop to get a port with nothing listening.
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let endpoint = EndpointDescriptor::get(format!("http://{addr}")).path("/users/1");

    let err = ApiClient::<UreqTransport>::default().execute::<User, _>(&endpoint).unwrap_err();
    assert!(matches!(err, Error::InvalidResponse(_)), "{err:?}");
}
