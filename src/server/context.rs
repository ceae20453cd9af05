use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};

use crate::logging::RequestContext;
use crate::server::state::ServerState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Establishes a [`RequestContext`] for the rest of the request.
///
/// Keeps an incoming `x-request-id` (or generates one) and echoes it back.
pub async fn request_context_middleware(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Response {
    let mut ctx = RequestContext::new(
        request.method().as_str(),
        request.uri().path(),
        state.request_errors.clone(),
    );
    if let Some(id) = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
    {
        ctx = ctx.with_request_id(id);
    }

    let request_id = ctx.request_id().to_string();
    let mut response = ctx.scope(next.run(request)).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
