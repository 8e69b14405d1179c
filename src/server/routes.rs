// file: src/server/routes.rs
// description: chat ui routes, shared session state and server bootstrap
// reference: https://docs.rs/axum

use crate::config::ChatConfig;
use crate::error::{PipelineError, Result};
use crate::inference::{ChatExchange, ChatReply, ChatSession, CompletionBackend};
use crate::inference::session::NOTHING_TO_SAVE;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

const INDEX_HTML: &str = include_str!("index.html");

/// One session shared by every browser tab. A query holds the lock until
/// the backend answers.
pub struct ChatState<B> {
    session: Arc<Mutex<ChatSession<B>>>,
    history_dir: Arc<PathBuf>,
    default_temperature: f32,
}

impl<B> Clone for ChatState<B> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            history_dir: Arc::clone(&self.history_dir),
            default_temperature: self.default_temperature,
        }
    }
}

impl<B: CompletionBackend> ChatState<B> {
    pub fn new(backend: B, config: &ChatConfig) -> Self {
        Self {
            session: Arc::new(Mutex::new(ChatSession::new(backend, config.max_tokens))),
            history_dir: Arc::new(config.history_dir.clone()),
            default_temperature: config.temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub history: Vec<ChatExchange>,
    pub status: String,
    pub response_time: String,
}

impl ChatResponse {
    fn new(history: &[ChatExchange], reply: ChatReply) -> Self {
        Self {
            history: history.to_vec(),
            status: reply.status,
            response_time: reply.response_time,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveResponse {
    pub saved: Option<String>,
    pub message: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

struct ApiError(PipelineError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self.0);
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

async fn index<B: CompletionBackend + 'static>(State(state): State<ChatState<B>>) -> Html<String> {
    Html(INDEX_HTML.replace(
        "{{temperature}}",
        &format!("{:.1}", state.default_temperature),
    ))
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn history<B: CompletionBackend + 'static>(
    State(state): State<ChatState<B>>,
) -> Json<ChatResponse> {
    let session = state.session.lock().await;
    Json(ChatResponse::new(session.history(), ChatReply::ready()))
}

async fn chat<B: CompletionBackend + 'static>(
    State(state): State<ChatState<B>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let temperature = request.temperature.unwrap_or(state.default_temperature);
    let mut session = state.session.lock().await;
    let reply = session.respond(&request.message, temperature).await;
    Json(ChatResponse::new(session.history(), reply))
}

async fn clear<B: CompletionBackend + 'static>(
    State(state): State<ChatState<B>>,
) -> Json<ChatResponse> {
    let mut session = state.session.lock().await;
    let reply = session.clear();
    Json(ChatResponse::new(session.history(), reply))
}

async fn save<B: CompletionBackend + 'static>(
    State(state): State<ChatState<B>>,
) -> std::result::Result<Json<SaveResponse>, ApiError> {
    let session = state.session.lock().await;
    let saved = session.save(&state.history_dir).map_err(ApiError)?;

    let response = match saved {
        Some(path) => {
            let path = path.display().to_string();
            SaveResponse {
                message: format!("Chat history saved to {}", path),
                saved: Some(path),
            }
        }
        None => SaveResponse {
            saved: None,
            message: NOTHING_TO_SAVE.to_string(),
        },
    };

    Ok(Json(response))
}

pub fn router<B: CompletionBackend + 'static>(state: ChatState<B>) -> Router {
    Router::new()
        .route("/", get(index::<B>))
        .route("/health", get(health_check))
        .route("/api/history", get(history::<B>))
        .route("/api/chat", post(chat::<B>))
        .route("/api/clear", post(clear::<B>))
        .route("/api/save", post(save::<B>))
        .with_state(state)
}

pub async fn serve<B: CompletionBackend + 'static>(backend: B, config: &ChatConfig) -> Result<()> {
    let host = config
        .host
        .parse()
        .map_err(|e| PipelineError::Config(format!("Invalid chat host {}: {}", config.host, e)))?;
    let addr = SocketAddr::new(host, config.port);

    let app = router(ChatState::new(backend, config)).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("AI Research Assistant listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
