//! HTTP API for the chat assistant.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::ai::local::WELCOME;
use crate::ai::Message;
use crate::core::{ReplyResult, ResponseSelector};
use crate::error::ChatError;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
    pub selector: ResponseSelector,
    pub history_limit: usize,
}

/// Request body for POST /api/chat/message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: Option<String>,
    pub user_id: Option<String>,
    /// Prior turns, oldest first. Anything other than an array is ignored.
    #[serde(default, deserialize_with = "lenient_context")]
    pub context: Vec<Message>,
}

fn lenient_context<'de, D>(deserializer: D) -> Result<Vec<Message>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Response body for POST /api/chat/message.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "is_false")]
    pub is_from_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<ReplyResult> for ChatResponse {
    fn from(reply: ReplyResult) -> Self {
        Self {
            response: reply.text,
            timestamp: reply.timestamp,
            is_from_fallback: reply.is_from_fallback,
            warning: reply.warning,
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = match self {
            ChatError::InvalidInput => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chat/message", post(message_handler))
        .route("/api/chat/history/{user_id}", get(history_handler))
        .route("/api/chat/welcome", get(welcome_handler))
        .route("/api/health", get(health_handler))
        .with_state(state)
}

async fn message_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ChatError> {
    log::debug!(
        "💬 Chat request: user={:?}, context_len={}",
        body.user_id,
        body.context.len()
    );

    let reply = state
        .selector
        .submit_message(body.message.as_deref(), body.user_id.as_deref(), &body.context)
        .await?;

    Ok(Json(reply.into()))
}

async fn history_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Response {
    match state.selector.history(&user_id, state.history_limit).await {
        Ok(history) => Json(history).into_response(),
        Err(e) => {
            log::error!("Chat history error for {}: {}", user_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch chat history" })),
            )
                .into_response()
        }
    }
}

async fn welcome_handler() -> Json<Value> {
    Json(json!({ "response": WELCOME }))
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": VERSION,
        "provider": state.selector.provider_name(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::local::{Topic, CAPABILITIES};
    use crate::services::{ChatRecord, ChatStore, SQLiteStorage};
    use axum::body::Body;
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn local_app(store: Option<Arc<SQLiteStorage>>) -> Router {
        let store = store.map(|s| s as Arc<dyn ChatStore>);
        build_router(Arc::new(AppState {
            selector: ResponseSelector::new(None, store, "persona"),
            history_limit: 2,
        }))
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), 1 << 20).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn post_message(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat/message")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_message_uses_fallback_table() {
        let (status, json) = send(local_app(None), post_message(json!({"message": "weather?"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["response"], Topic::Weather.reply());
        assert_eq!(json["isFromFallback"], true);
        assert!(json.get("warning").is_none());
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_missing_message_is_bad_request() {
        for body in [json!({}), json!({"message": ""}), json!({"message": null})] {
            let (status, json) = send(local_app(None), post_message(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["error"], "Message is required");
        }
    }

    #[tokio::test]
    async fn test_non_array_context_is_ignored() {
        let (status, json) = send(
            local_app(None),
            post_message(json!({
                "message": "tell me a joke",
                "userId": "u1",
                "context": "not a list"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["response"], CAPABILITIES);
    }

    #[test]
    fn test_context_skips_invalid_entries() {
        let req: ChatRequest = serde_json::from_value(json!({
            "message": "hi",
            "context": [
                {"role": "user", "content": "first"},
                {"role": "robot", "content": "bad role"},
                {"role": "assistant", "text": "second"}
            ]
        }))
        .unwrap();
        assert_eq!(
            req.context,
            vec![Message::user("first"), Message::assistant("second")]
        );
    }

    #[tokio::test]
    async fn test_history_is_newest_first_and_limited() {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(SQLiteStorage::new(Some(dir.path().join("chat.db"))).unwrap());
        for (i, message) in ["one", "two", "three"].iter().enumerate() {
            let mut record = ChatRecord::new("u1", message, "reply");
            record.timestamp = Utc::now() - chrono::Duration::minutes(10 - i as i64);
            storage.append(&record).await.unwrap();
        }

        let (status, json) = send(local_app(Some(storage)), get("/api/chat/history/u1")).await;
        assert_eq!(status, StatusCode::OK);
        let items = json.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["message"], "three");
        assert_eq!(items[1]["message"], "two");
        assert_eq!(items[0]["userId"], "u1");
    }

    #[tokio::test]
    async fn test_welcome_and_health() {
        let (_, json) = send(local_app(None), get("/api/chat/welcome")).await;
        assert_eq!(json["response"], WELCOME);

        let (status, json) = send(local_app(None), get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["provider"], "local");
        assert_eq!(json["version"], VERSION);
    }
}
