use std::sync::{Arc, OnceLock};

use crate::config::{AppConfig, HandlerPolicy};
use crate::logging::factory::create_logger_in;
use crate::logging::level::DebugFlag;
use crate::logging::logger::{global_registry, Logger, LoggerRegistry};
use crate::logging::stream::ErrorStream;

/// The host application the logger is attached to.
pub struct App {
    import_name: String,
    config: AppConfig,
    debug: DebugFlag,
    registry: Arc<LoggerRegistry>,
    debug_stream: ErrorStream,
    logger: OnceLock<Arc<Logger>>,
}

impl App {
    pub fn new(import_name: &str) -> Self {
        Self::from_config(import_name, AppConfig::default())
    }

    pub fn from_config(import_name: &str, config: AppConfig) -> Self {
        Self {
            import_name: import_name.to_string(),
            debug: DebugFlag::new(config.debug),
            config,
            registry: global_registry(),
            debug_stream: ErrorStream::stderr(),
            logger: OnceLock::new(),
        }
    }

    /// Uses `registry` instead of the process-wide one.
    pub fn with_registry(mut self, registry: Arc<LoggerRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Sends debug-mode output to `stream` instead of stderr.
    pub fn with_debug_stream(mut self, stream: ErrorStream) -> Self {
        self.debug_stream = stream;
        self
    }

    pub fn debug_stream(&self) -> &ErrorStream {
        &self.debug_stream
    }

    pub fn import_name(&self) -> &str {
        &self.import_name
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn handler_policy(&self) -> &HandlerPolicy {
        &self.config.logger_handler_policy
    }

    /// `LOGGER_NAME` if configured, otherwise the import name.
    pub fn logger_name(&self) -> &str {
        self.config
            .logger_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.import_name)
    }

    pub fn debug(&self) -> bool {
        self.debug.get()
    }

    pub fn set_debug(&self, enabled: bool) {
        self.debug.set(enabled);
    }

    /// Shared handle to the debug switch.
    pub fn debug_flag(&self) -> DebugFlag {
        self.debug.clone()
    }

    pub fn registry(&self) -> &Arc<LoggerRegistry> {
        &self.registry
    }

    /// The application's logger, configured on first use.
    pub fn logger(&self) -> Arc<Logger> {
        self.logger
            .get_or_init(|| create_logger_in(&self.registry, self))
            .clone()
    }
}
