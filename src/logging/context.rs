use std::future::Future;
use uuid::Uuid;

use crate::logging::stream::ErrorStream;

tokio::task_local! {
    static CURRENT_REQUEST: RequestContext;
}

/// State of the request currently being handled.
///
/// The host establishes it around each request with [`RequestContext::scope`]
/// or [`RequestContext::sync_scope`]. Scopes nest; the innermost is current.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    method: String,
    path: String,
    errors: ErrorStream,
}

impl RequestContext {
    pub fn new(method: &str, path: &str, errors: ErrorStream) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            method: method.to_string(),
            path: path.to_string(),
            errors,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The request's designated error stream.
    pub fn errors(&self) -> &ErrorStream {
        &self.errors
    }

    /// Runs `fut` with this context as the current request.
    pub async fn scope<F: Future>(self, fut: F) -> F::Output {
        CURRENT_REQUEST.scope(self, fut).await
    }

    /// Runs `f` with this context as the current request.
    pub fn sync_scope<R>(self, f: impl FnOnce() -> R) -> R {
        CURRENT_REQUEST.sync_scope(self, f)
    }

    /// Applies `f` to the current request, if one is active.
    pub fn with_current<R>(f: impl FnOnce(&RequestContext) -> R) -> Option<R> {
        CURRENT_REQUEST.try_with(f).ok()
    }

    /// A clone of the current request, if one is active.
    pub fn current() -> Option<RequestContext> {
        Self::with_current(Clone::clone)
    }
}
