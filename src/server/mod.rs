
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::chat::{ChatMessage, RagEngine};
use crate::config::ServerConfig;
use crate::{Result, UrsaError};

/// Request body for the chat endpoint. Field names match the browser
/// client's JSON.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

struct ApiError(UrsaError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            UrsaError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            UrsaError::Embedding(_) | UrsaError::Completion(_) => {
                error!("Upstream service failure: {}", self.0);
                (
                    StatusCode::BAD_GATEWAY,
                    "An upstream service is unavailable, please try again".to_string(),
                )
            }
            other => {
                error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Build the HTTP API. CORS is permissive; the chat endpoint is meant to be
/// called from a browser on a different origin.
pub fn router(engine: Arc<RagEngine>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}

/// Bind and serve until the process is stopped
pub async fn serve(engine: Arc<RagEngine>, config: &ServerConfig) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;

    info!("Listening on http://{}", addr);

    axum::serve(listener, router(engine))
        .await
        .map_err(|e| UrsaError::Other(anyhow::anyhow!("Server error: {e}")))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

async fn chat(
    State(engine): State<Arc<RagEngine>>,
    Json(request): Json<ChatRequest>,
) -> std::result::Result<Json<ChatResponse>, ApiError> {
    let answer = engine
        .answer(&request.message, &request.conversation_history)
        .await
        .map_err(ApiError)?;

    Ok(Json(ChatResponse {
        response: answer.text,
    }))
}
