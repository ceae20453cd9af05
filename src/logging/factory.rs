use std::sync::Arc;
use tracing::debug;

use crate::app::App;
use crate::config::HandlerPolicy;
use crate::logging::format::Formatter;
use crate::logging::handler::{Handler, HandlerKind};
use crate::logging::level::{DebugAwareLevel, DebugFlag, Level};
use crate::logging::logger::{Logger, LoggerRegistry};
use crate::logging::stream::{ContextStream, ErrorStream};

/// Configures the logger named after `app` in the app's registry.
pub fn create_logger(app: &App) -> Arc<Logger> {
    create_logger_in(app.registry(), app)
}

/// Configures the logger named after `app` in `registry`.
///
/// Unless the policy is `never`, the logger gets a debug-aware level
/// resolver and loses every handler attached before, so calling this again
/// replaces handlers instead of stacking them.
pub fn create_logger_in(registry: &LoggerRegistry, app: &App) -> Arc<Logger> {
    let logger = registry.get_logger(app.logger_name());
    let policy = app.handler_policy();

    if *policy != HandlerPolicy::Never {
        logger.set_level_resolver(Some(Arc::new(DebugAwareLevel::new(app.debug_flag()))));
        logger.clear_handlers();
    }

    if policy.wants_debug_handler() {
        logger.add_handler(debug_handler(app.debug_flag(), app.debug_stream().clone()));
    }

    if policy.wants_production_handler() {
        logger.add_handler(production_handler(app.debug_flag()));
    }

    debug!(
        logger = logger.name(),
        policy = %policy,
        handlers = logger.handlers().len(),
        "configured application logger"
    );
    logger
}

/// DEBUG and above to `stream` (stderr unless the app overrides it), only
/// while the app is in debug mode.
pub fn debug_handler(debug: DebugFlag, stream: ErrorStream) -> Handler {
    Handler::new(HandlerKind::Debug, Arc::new(stream))
        .with_level(Level::Debug)
        .with_formatter(Formatter::debug())
        .with_filter(move |_| debug.get())
}

/// ERROR and above to the current request's error stream (or stderr), only
/// while the app is not in debug mode.
pub fn production_handler(debug: DebugFlag) -> Handler {
    Handler::new(HandlerKind::Production, Arc::new(ContextStream))
        .with_level(Level::Error)
        .with_formatter(Formatter::production())
        .with_filter(move |_| !debug.get())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::logging::context::RequestContext;
    use crate::logging::logger::ROOT_LEVEL;
    use crate::logging::record::LogRecord;
    use crate::logging::stream::CaptureBuffer;

    fn app(policy: &str, debug: bool) -> App {
        let config = AppConfig {
            debug,
            logger_handler_policy: HandlerPolicy::from(policy),
            ..AppConfig::default()
        };
        App::from_config("shop", config).with_registry(Arc::new(LoggerRegistry::new()))
    }

    fn handler_of(logger: &Logger, kind: HandlerKind) -> Arc<Handler> {
        logger
            .handlers()
            .into_iter()
            .find(|h| h.kind() == kind)
            .unwrap()
    }

    #[test]
    fn never_attaches_nothing() {
        let app = app("never", false);
        let logger = create_logger(&app);
        assert!(logger.handlers().is_empty());
        assert!(!logger.has_level_resolver());
    }

    #[test]
    fn never_leaves_existing_handlers_alone() {
        let app = app("never", false);
        let logger = app.registry().get_logger("shop");
        logger.add_handler(Handler::new(HandlerKind::Custom, Arc::new(ErrorStream::stderr())));
        let logger = create_logger(&app);
        assert_eq!(logger.handler_kinds(), vec![HandlerKind::Custom]);
    }

    #[test]
    fn always_attaches_both() {
        let logger = create_logger(&app("always", false));
        assert_eq!(
            logger.handler_kinds(),
            vec![HandlerKind::Debug, HandlerKind::Production]
        );
    }

    #[test]
    fn single_handler_policies() {
        let logger = create_logger(&app("debug", false));
        assert_eq!(logger.handler_kinds(), vec![HandlerKind::Debug]);

        let logger = create_logger(&app("production", false));
        assert_eq!(logger.handler_kinds(), vec![HandlerKind::Production]);
    }

    #[test]
    fn unrecognized_policy_clears_but_attaches_nothing() {
        let app = app("sometimes", true);
        let logger = app.registry().get_logger("shop");
        logger.add_handler(Handler::new(HandlerKind::Custom, Arc::new(ErrorStream::stderr())));
        let logger = create_logger(&app);
        assert!(logger.handlers().is_empty());
        assert!(logger.has_level_resolver());
    }

    #[test]
    fn recreation_replaces_handlers() {
        let app = app("always", false);
        let first = create_logger(&app);
        let second = create_logger(&app);
        let third = create_logger(&app);
        assert!(Arc::ptr_eq(&first, &third));
        assert_eq!(second.handlers().len(), 2);
        assert_eq!(third.handlers().len(), 2);
    }

    #[test]
    fn recreation_follows_the_current_policy() {
        let registry = Arc::new(LoggerRegistry::new());
        let configure = |policy: &str| {
            let config = AppConfig {
                logger_handler_policy: HandlerPolicy::from(policy),
                ..AppConfig::default()
            };
            let app = App::from_config("shop", config).with_registry(registry.clone());
            create_logger(&app)
        };

        assert_eq!(
            configure("always").handler_kinds(),
            vec![HandlerKind::Debug, HandlerKind::Production]
        );
        assert_eq!(configure("production").handler_kinds(), vec![HandlerKind::Production]);
        assert_eq!(configure("debug").handler_kinds(), vec![HandlerKind::Debug]);
        assert!(configure("sometimes").handler_kinds().is_empty());
    }

    #[test]
    fn child_of_debug_app_keeps_root_level() {
        let debug_out = CaptureBuffer::new();
        let app = app("always", true).with_debug_stream(debug_out.stream());
        let logger = create_logger(&app);
        let child = app.registry().get_logger("shop.db");

        assert_eq!(logger.effective_level(), Level::Debug);
        assert_eq!(child.effective_level(), ROOT_LEVEL);

        child.debug("child debug").unwrap();
        assert!(debug_out.contents().is_empty());

        child.warning("child warning").unwrap();
        assert!(debug_out.contents().contains("WARNING in factory ["));
    }

    #[test]
    fn handler_levels_and_formats() {
        let logger = create_logger(&app("always", false));
        let debug = handler_of(&logger, HandlerKind::Debug);
        let production = handler_of(&logger, HandlerKind::Production);
        assert_eq!(debug.level(), Level::Debug);
        assert_eq!(debug.formatter().template(), crate::logging::format::DEBUG_LOG_FORMAT);
        assert_eq!(production.level(), Level::Error);
        assert_eq!(production.formatter().template(), crate::logging::format::PROD_LOG_FORMAT);
    }

    #[test]
    fn gating_follows_flag_at_emission_time() {
        let app = app("always", true);
        let logger = create_logger(&app);
        let debug = handler_of(&logger, HandlerKind::Debug);
        let production = handler_of(&logger, HandlerKind::Production);
        let record = LogRecord::new("shop", Level::Critical, "x", "src/app.rs", 1);

        assert!(debug.accepts(&record));
        assert!(!production.accepts(&record));

        app.set_debug(false);
        assert!(!debug.accepts(&record));
        assert!(production.accepts(&record));
    }

    #[test]
    fn effective_level_tracks_debug_flag() {
        let app = app("always", true);
        let logger = create_logger(&app);
        assert_eq!(logger.effective_level(), Level::Debug);
        app.set_debug(false);
        assert_eq!(logger.effective_level(), ROOT_LEVEL);
        logger.set_level(Some(Level::Info));
        app.set_debug(true);
        assert_eq!(logger.effective_level(), Level::Info);
    }

    #[test]
    fn production_output_goes_to_request_stream() {
        let app = app("always", false);
        let logger = create_logger(&app);
        let buffer = CaptureBuffer::new();
        let ctx = RequestContext::new("GET", "/checkout", buffer.stream());

        ctx.sync_scope(|| logger.error("payment failed")).unwrap();

        let out = buffer.contents();
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with('['));
        assert!(out.trim_end().ends_with("] ERROR in factory: payment failed"));
    }

    #[test]
    fn production_drops_below_error() {
        let app = app("production", false);
        let logger = create_logger(&app);
        logger.set_level(Some(Level::Debug));
        let buffer = CaptureBuffer::new();
        let ctx = RequestContext::new("GET", "/", buffer.stream());
        ctx.sync_scope(|| logger.warning("almost")).unwrap();
        assert!(buffer.contents().is_empty());
    }

    #[test]
    fn debug_mode_uses_debug_block_only() {
        let debug_out = CaptureBuffer::new();
        let request_out = CaptureBuffer::new();
        let app = app("always", true).with_debug_stream(debug_out.stream());
        let logger = create_logger(&app);
        let ctx = RequestContext::new("GET", "/", request_out.stream());

        let line = line!() + 1;
        ctx.sync_scope(|| logger.debug("cart loaded")).unwrap();

        let block = debug_out.contents();
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "-".repeat(80));
        assert!(lines[1].starts_with("DEBUG in factory ["));
        assert!(lines[1].ends_with(&format!("factory.rs:{}]:", line)));
        assert_eq!(lines[2], "cart loaded");
        assert_eq!(lines[3], "-".repeat(80));
        assert!(request_out.contents().is_empty());
    }

    #[test]
    fn production_mode_skips_debug_block() {
        let debug_out = CaptureBuffer::new();
        let request_out = CaptureBuffer::new();
        let app = app("always", false).with_debug_stream(debug_out.stream());
        let logger = create_logger(&app);
        let ctx = RequestContext::new("GET", "/", request_out.stream());

        ctx.sync_scope(|| logger.error("db down")).unwrap();

        assert!(debug_out.contents().is_empty());
        assert!(request_out.contents().contains("ERROR in factory: db down"));
    }
}
