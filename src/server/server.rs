use axum::{middleware, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::App;
use crate::config;
use crate::error::Result;
use crate::server::{context, routes, state::ServerState};

/// Start the HTTP server for `app`.
pub async fn start_server(app: Arc<App>) -> Result<()> {
    let addr = config::resolve_server_addr(app.config())?;

    let state = ServerState::new(app);
    let router = build_app(state.clone());

    info!("applog server starting on {}", addr);
    info!("  Version: {}", crate::version::VERSION);
    info!("  Logger: {} (policy {})", state.app.logger_name(), state.app.handler_policy());
    info!("  Debug: {}", state.app.debug());

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Build the full application with middleware.
pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn_with_state(
            state,
            context::request_context_middleware,
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, HandlerPolicy};
    use crate::logging::{CaptureBuffer, LoggerRegistry};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn app(policy: HandlerPolicy, debug: bool) -> Arc<App> {
        let config = AppConfig {
            debug,
            logger_handler_policy: policy,
            ..AppConfig::default()
        };
        Arc::new(App::from_config("shop", config).with_registry(Arc::new(LoggerRegistry::new())))
    }

    fn log_request(level: &str, message: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/log")
            .header("content-type", "application/json")
            .body(Body::from(format!(r#"{{"level":"{}","message":"{}"}}"#, level, message)))
            .unwrap()
    }

    #[tokio::test]
    async fn app_serves_health() {
        let state = ServerState::new(app(HandlerPolicy::Always, false));
        let response = build_app(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert!(response.headers().contains_key(context::REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn errors_during_request_go_to_request_stream() {
        let errors = CaptureBuffer::new();
        let state = ServerState::with_request_errors(app(HandlerPolicy::Always, false), errors.stream());

        let response = build_app(state)
            .oneshot(log_request("error", "checkout failed"))
            .await
            .unwrap();
        assert_eq!(response.status(), 202);

        let out = errors.contents();
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("] ERROR in routes: checkout failed"));
    }

    #[tokio::test]
    async fn debug_mode_keeps_request_stream_clean() {
        let errors = CaptureBuffer::new();
        let debug_out = CaptureBuffer::new();
        let app = Arc::new(
            App::from_config(
                "shop",
                AppConfig {
                    debug: true,
                    ..AppConfig::default()
                },
            )
            .with_registry(Arc::new(LoggerRegistry::new()))
            .with_debug_stream(debug_out.stream()),
        );
        let state = ServerState::with_request_errors(app, errors.stream());

        build_app(state)
            .oneshot(log_request("error", "visible in debug block"))
            .await
            .unwrap();

        assert!(errors.contents().is_empty());
        assert!(debug_out.contents().contains("ERROR in routes ["));
        assert!(debug_out.contents().contains("visible in debug block"));
    }

    #[tokio::test]
    async fn never_policy_writes_nothing() {
        let errors = CaptureBuffer::new();
        let state = ServerState::with_request_errors(app(HandlerPolicy::Never, false), errors.stream());

        build_app(state)
            .oneshot(log_request("critical", "dropped"))
            .await
            .unwrap();

        assert!(errors.contents().is_empty());
    }
}
