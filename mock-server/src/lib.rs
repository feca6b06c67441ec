use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub name: Option<String>,
}

pub const MALFORMED_BODY: &str = "<html>not json</html>";

pub type Db = Arc<RwLock<HashMap<Uuid, User>>>;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/echo", post(echo_body).put(echo_body))
        .route("/headers", get(echo_headers))
        .route("/malformed", get(malformed))
        .route("/empty", get(empty))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "user not found" })))
}

async fn list_users(State(db): State<Db>) -> Json<Vec<User>> {
    let users = db.read().await;
    Json(users.values().cloned().collect())
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<CreateUser>,
) -> (StatusCode, Json<User>) {
    let user = User {
        id: Uuid::new_v4(),
        email: input.email,
        name: input.name,
    };
    tracing::info!(id = %user.id, "created user");
    db.write().await.insert(user.id, user.clone());
    (StatusCode::CREATED, Json(user))
}

async fn get_user(State(db): State<Db>, Path(id): Path<Uuid>) -> ApiResult<User> {
    let users = db.read().await;
    users.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateUser>,
) -> ApiResult<User> {
    let mut users = db.write().await;
    let user = users.get_mut(&id).ok_or_else(not_found)?;
    if let Some(email) = input.email {
        user.email = email;
    }
    if let Some(name) = input.name {
        user.name = Some(name);
    }
    Ok(Json(user.clone()))
}

async fn delete_user(State(db): State<Db>, Path(id): Path<Uuid>) -> ApiResult<User> {
    let mut users = db.write().await;
    let user = users.remove(&id).ok_or_else(not_found)?;
    tracing::info!(%id, "deleted user");
    Ok(Json(user))
}

async fn echo_body(Json(body): Json<Value>) -> Json<Value> {
    Json(body)
}

/// Received headers as a JSON object. Names arrive lowercased.
async fn echo_headers(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    Json(
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect(),
    )
}

async fn malformed() -> &'static str {
    MALFORMED_BODY
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}
