use std::sync::Arc;
use chrono::{DateTime, Utc};

use crate::app::App;
use crate::logging::ErrorStream;

/// Shared server state, accessible from all request handlers.
#[derive(Clone)]
pub struct ServerState {
    pub app: Arc<App>,
    /// Error stream handed to every request's context.
    pub request_errors: ErrorStream,
    pub start_time: DateTime<Utc>,
}

impl ServerState {
    pub fn new(app: Arc<App>) -> Self {
        Self::with_request_errors(app, ErrorStream::stderr())
    }

    pub fn with_request_errors(app: Arc<App>, request_errors: ErrorStream) -> Self {
        Self {
            app,
            request_errors,
            start_time: Utc::now(),
        }
    }

    /// Server uptime in seconds.
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_state_creation() {
        let state = ServerState::new(Arc::new(App::new("shop")));
        assert!(state.request_errors.is_stderr());
        assert!(state.uptime_secs() >= 0);
    }
}
