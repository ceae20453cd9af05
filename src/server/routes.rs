use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::logging::Level;
use crate::server::state::ServerState;
use crate::version::VERSION;

/// Build the HTTP router with all routes.
pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/status", get(status))
        .route("/v1/log", post(emit_log))
        .route("/v1/debug", get(get_debug).put(set_debug))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": VERSION,
        "engine": "applog"
    }))
}

async fn status(State(state): State<ServerState>) -> Json<Value> {
    let app = &state.app;
    let logger = app.logger();
    let handlers: Vec<&str> = logger.handler_kinds().iter().map(|k| k.as_str()).collect();

    Json(json!({
        "status": "running",
        "version": VERSION,
        "uptime_seconds": state.uptime_secs(),
        "debug": app.debug(),
        "logger": logger.name(),
        "policy": app.handler_policy().as_str(),
        "handlers": handlers,
        "effective_level": logger.effective_level().as_str(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct LogRequest {
    pub level: String,
    pub message: String,
}

/// Emit a record through the application logger.
async fn emit_log(
    State(state): State<ServerState>,
    Json(body): Json<LogRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let level: Level = body.level.parse().map_err(|e: String| {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": e })))
    })?;

    let logger = state.app.logger();
    let enabled = logger.is_enabled_for(level);
    logger.log(level, &body.message).map_err(|e| {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() })))
    })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "level": level.as_str(), "enabled": enabled })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct DebugRequest {
    pub debug: bool,
}

async fn get_debug(State(state): State<ServerState>) -> Json<Value> {
    Json(json!({ "debug": state.app.debug() }))
}

async fn set_debug(
    State(state): State<ServerState>,
    Json(body): Json<DebugRequest>,
) -> Json<Value> {
    state.app.set_debug(body.debug);
    Json(json!({ "debug": state.app.debug() }))
}
