use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub name: String,
}

#[derive(Deserialize)]
pub struct UserFilter {
    pub name: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Default)]
pub struct Db {
    users: RwLock<BTreeMap<u64, User>>,
    next_id: AtomicU64,
}

impl Db {
    /// Database pre-populated with the given names, ids starting at 1.
    pub fn seeded<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let users: BTreeMap<u64, User> = names
            .into_iter()
            .zip(1..)
            .map(|(name, id)| (id, User { id, name: name.to_string() }))
            .collect();
        let next_id = AtomicU64::new(users.len() as u64);
        Self {
            users: RwLock::new(users),
            next_id,
        }
    }
}

pub type SharedDb = Arc<Db>;

pub fn app() -> Router {
    app_with(Db::default())
}

pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).delete(delete_user))
        .route("/echo", get(echo).post(echo).put(echo).patch(echo).delete(echo))
        .route("/malformed", get(malformed))
        .with_state(Arc::new(db))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Db::default()).await
}

pub async fn run_with(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(db)).await
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}

async fn list_users(
    State(db): State<SharedDb>,
    Query(filter): Query<UserFilter>,
) -> Json<Vec<User>> {
    let users = db.users.read().await;
    let matching = users
        .values()
        .filter(|user| filter.name.as_ref().map_or(true, |name| &user.name == name))
        .take(filter.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect();
    Json(matching)
}

async fn create_user(
    State(db): State<SharedDb>,
    Json(input): Json<CreateUser>,
) -> (StatusCode, Json<User>) {
    let id = db.next_id.fetch_add(1, Ordering::Relaxed) + 1;
    let user = User { id, name: input.name };
    db.users.write().await.insert(id, user.clone());
    tracing::debug!(id, "user created");
    (StatusCode::CREATED, Json(user))
}

async fn get_user(
    State(db): State<SharedDb>,
    Path(id): Path<u64>,
) -> Result<Json<User>, (StatusCode, Json<Value>)> {
    let users = db.users.read().await;
    users.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn delete_user(
    State(db): State<SharedDb>,
    Path(id): Path<u64>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    let mut users = db.users.write().await;
    users.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or_else(not_found)
}

/// Reflects the query pairs, headers and body back as JSON.
async fn echo(
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: String,
) -> Json<Value> {
    let headers: BTreeMap<String, String> = headers
        .iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
        .collect();
    Json(json!({
        "query": query,
        "headers": headers,
        "body": body,
    }))
}

async fn malformed() -> &'static str {
    "not-json"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_to_json() {
        let user = User {
            id: 7,
            name: "Ann".to_string(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json, json!({ "id": 7, "name": "Ann" }));
    }

    #[test]
    fn create_user_rejects_missing_name() {
        let result: Result<CreateUser, _> = serde_json::from_str(r#"{"id":3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn filter_fields_optional() {
        let filter: UserFilter = serde_json::from_str(r#"{}"#).unwrap();
        assert!(filter.name.is_none());
        assert!(filter.limit.is_none());
    }

    #[tokio::test]
    async fn seeded_db_assigns_sequential_ids() {
        let db = Db::seeded(["Ann", "Bo"]);
        let users = db.users.read().await;
        assert_eq!(users[&1].name, "Ann");
        assert_eq!(users[&2].name, "Bo");
        assert_eq!(db.next_id.load(Ordering::Relaxed), 2);
    }
}
