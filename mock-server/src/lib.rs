use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// The `{ status, msg, result }` message every endpoint answers with.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ResponseMessage {
    pub status: u16,
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

#[derive(Default)]
pub struct Collections {
    next_id: u64,
    items: HashMap<String, BTreeMap<u64, Map<String, Value>>>,
}

pub type Db = Arc<RwLock<Collections>>;

#[derive(Clone, Default)]
pub struct AppState {
    db: Db,
    token: Option<Arc<str>>,
}

type Reply = (StatusCode, Json<ResponseMessage>);

pub fn app() -> Router {
    router(AppState::default())
}

/// Like `app`, but every request must carry `Authorization: Bearer {token}`.
pub fn app_with_token(token: &str) -> Router {
    router(AppState {
        db: Db::default(),
        token: Some(Arc::from(token)),
    })
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/{resource}", get(list_items).post(create_item))
        .route(
            "/{resource}/{id}",
            get(get_item)
                .put(update_item)
                .delete(delete_item)
                .post(create_nested),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_token))
        .with_state(state)
}

pub async fn run(listener: TcpListener, token: Option<String>) -> Result<(), std::io::Error> {
    let app = match token {
        Some(token) => app_with_token(&token),
        None => app(),
    };
    axum::serve(listener, app).await
}

fn ok(status: StatusCode, msg: &str, result: Value) -> Reply {
    let body = ResponseMessage {
        status: status.as_u16(),
        msg: msg.to_string(),
        result: Some(result),
    };
    (status, Json(body))
}

fn fail(status: StatusCode, msg: impl Into<String>) -> Reply {
    let body = ResponseMessage {
        status: status.as_u16(),
        msg: msg.into(),
        result: None,
    };
    (status, Json(body))
}

async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(expected) = &state.token {
        let presented = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        if presented != Some(expected.as_ref()) {
            tracing::debug!(uri = %request.uri(), "rejecting unauthenticated request");
            return fail(StatusCode::UNAUTHORIZED, "unauthorized").into_response();
        }
    }
    next.run(request).await
}

fn matches_filter(record: &Map<String, Value>, filter: &HashMap<String, String>) -> bool {
    filter.iter().all(|(key, expected)| match record.get(key) {
        Some(Value::String(s)) => s == expected,
        Some(other) => other.to_string() == *expected,
        None => false,
    })
}

fn parse_id(raw: &str) -> Result<u64, Reply> {
    raw.parse()
        .map_err(|_| fail(StatusCode::BAD_REQUEST, format!("invalid id: {raw}")))
}

async fn list_items(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(filter): Query<HashMap<String, String>>,
) -> Reply {
    let db = state.db.read().await;
    let records: Vec<Value> = db
        .items
        .get(&resource)
        .into_iter()
        .flat_map(|items| items.values())
        .filter(|record| matches_filter(record, &filter))
        .map(|record| Value::Object(record.clone()))
        .collect();
    ok(StatusCode::OK, "listed", Value::Array(records))
}

async fn create_item(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    request: Request,
) -> Reply {
    match read_record(request).await {
        Ok(record) => insert(&state, resource, record).await,
        Err(reply) => reply,
    }
}

async fn create_nested(
    State(state): State<AppState>,
    Path((resource, sub_path)): Path<(String, String)>,
    request: Request,
) -> Reply {
    match read_record(request).await {
        Ok(record) => insert(&state, format!("{resource}/{sub_path}"), record).await,
        Err(reply) => reply,
    }
}

async fn insert(state: &AppState, collection: String, mut record: Map<String, Value>) -> Reply {
    let mut db = state.db.write().await;
    db.next_id += 1;
    let id = db.next_id;
    record.insert("id".to_string(), json!(id));
    db.items
        .entry(collection)
        .or_default()
        .insert(id, record.clone());
    ok(StatusCode::CREATED, "created", Value::Object(record))
}

async fn get_item(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Reply {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    let db = state.db.read().await;
    match db.items.get(&resource).and_then(|items| items.get(&id)) {
        Some(record) => ok(StatusCode::OK, "found", Value::Object(record.clone())),
        None => fail(StatusCode::NOT_FOUND, "not found"),
    }
}

async fn update_item(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    request: Request,
) -> Reply {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    let changes = match read_record(request).await {
        Ok(changes) => changes,
        Err(reply) => return reply,
    };
    let mut db = state.db.write().await;
    let Some(record) = db.items.get_mut(&resource).and_then(|items| items.get_mut(&id)) else {
        return fail(StatusCode::NOT_FOUND, "not found");
    };
    for (key, value) in changes {
        if key != "id" {
            record.insert(key, value);
        }
    }
    ok(StatusCode::OK, "updated", Value::Object(record.clone()))
}

async fn delete_item(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Reply {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    let mut db = state.db.write().await;
    match db.items.get_mut(&resource).and_then(|items| items.remove(&id)) {
        Some(record) => ok(StatusCode::OK, "deleted", Value::Object(record)),
        None => fail(StatusCode::NOT_FOUND, "not found"),
    }
}

/// Reads a JSON object or a multipart form into a record. Multipart text
/// fields become strings; file fields become `{ filename, size }`.
async fn read_record(request: Request) -> Result<Map<String, Value>, Reply> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    if is_multipart {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| fail(e.status(), e.body_text()))?;
        let mut record = Map::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| fail(e.status(), e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| fail(e.status(), e.body_text()))?;
                    record.insert(name, json!({ "filename": filename, "size": bytes.len() }));
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| fail(e.status(), e.body_text()))?;
                    record.insert(name, Value::String(text));
                }
            }
        }
        return Ok(record);
    }

    let Json(value) = Json::<Value>::from_request(request, &())
        .await
        .map_err(|e| fail(e.status(), e.body_text()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(fail(StatusCode::BAD_REQUEST, "expected a JSON object")),
    }
}
