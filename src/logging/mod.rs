pub mod bridge;
pub mod context;
pub mod factory;
pub mod format;
pub mod handler;
pub mod level;
pub mod logger;
pub mod record;
pub mod stream;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::app::App;
use crate::error::{Error, Result};
use bridge::LoggerLayer;

pub use context::RequestContext;
pub use factory::create_logger;
pub use format::{Formatter, DEBUG_LOG_FORMAT, PROD_LOG_FORMAT};
pub use handler::{Handler, HandlerKind};
pub use level::{DebugAwareLevel, DebugFlag, Level, LevelResolver};
pub use logger::{get_logger, Logger, LoggerRegistry};
pub use record::LogRecord;
pub use stream::{resolve_error_stream, CaptureBuffer, ContextStream, ErrorStream, StreamSource};

/// Initialize the tool's own diagnostics output.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("applog=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("applog=info,tower_http=info"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .compact()
        .init();
}

/// Route `tracing` events through the application logger.
///
/// `LOG_FILTER` from the app config selects which events reach the logger;
/// without it everything does and the logger's own level decides.
pub fn init_app_logging(app: &App) -> Result<()> {
    let filter = match app.config().log_filter.as_deref() {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| Error::Config(format!("invalid LOG_FILTER: {}", e)))?,
        None => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(LoggerLayer::new(app.logger()))
        .try_init()
        .map_err(|e| Error::Config(format!("logging already initialized: {}", e)))
}
