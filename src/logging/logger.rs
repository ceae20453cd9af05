use std::collections::HashMap;
use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::error::Result;
use crate::logging::handler::{Handler, HandlerKind};
use crate::logging::level::{Level, LevelResolver};
use crate::logging::record::LogRecord;

/// Level of the root logger.
pub const ROOT_LEVEL: Level = Level::Warning;

const ROOT_NAME: &str = "root";

/// A named log channel.
///
/// Loggers form a dotted-name hierarchy: `app.db` inherits its effective
/// level from `app` and, while `propagate` is set, also hands records to the
/// handlers of its ancestors.
pub struct Logger {
    name: String,
    parent: Option<Arc<Logger>>,
    level: RwLock<Option<Level>>,
    resolver: RwLock<Option<Arc<dyn LevelResolver>>>,
    handlers: RwLock<Vec<Arc<Handler>>>,
    propagate: AtomicBool,
}

impl Logger {
    fn new(name: &str, parent: Option<Arc<Logger>>, level: Option<Level>) -> Self {
        Self {
            name: name.to_string(),
            parent,
            level: RwLock::new(level),
            resolver: RwLock::new(None),
            handlers: RwLock::new(Vec::new()),
            propagate: AtomicBool::new(true),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Arc<Logger>> {
        self.parent.as_ref()
    }

    /// Explicitly set level, if any.
    pub fn level(&self) -> Option<Level> {
        *self.level.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_level(&self, level: Option<Level>) {
        *self.level.write().unwrap_or_else(PoisonError::into_inner) = level;
    }

    pub fn set_level_resolver(&self, resolver: Option<Arc<dyn LevelResolver>>) {
        *self.resolver.write().unwrap_or_else(PoisonError::into_inner) = resolver;
    }

    pub fn has_level_resolver(&self) -> bool {
        self.resolver.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    pub fn propagate(&self) -> bool {
        self.propagate.load(Ordering::Relaxed)
    }

    pub fn set_propagate(&self, propagate: bool) {
        self.propagate.store(propagate, Ordering::Relaxed);
    }

    /// The explicit level, else the resolver's override, else the nearest
    /// explicit level among the ancestors. Ancestors' resolvers are not
    /// consulted.
    pub fn effective_level(&self) -> Level {
        if let Some(level) = self.level() {
            return level;
        }
        let resolved = self
            .resolver
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(|r| r.unset_level());
        if let Some(level) = resolved {
            return level;
        }
        self.level_from_ancestors()
    }

    fn level_from_ancestors(&self) -> Level {
        let mut current = self.parent.as_deref();
        while let Some(logger) = current {
            if let Some(level) = logger.level() {
                return level;
            }
            current = logger.parent.as_deref();
        }
        ROOT_LEVEL
    }

    pub fn is_enabled_for(&self, level: Level) -> bool {
        level >= self.effective_level()
    }

    pub fn add_handler(&self, handler: Handler) -> Arc<Handler> {
        let handler = Arc::new(handler);
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler.clone());
        handler
    }

    pub fn remove_handler(&self, handler: &Arc<Handler>) -> bool {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let before = handlers.len();
        handlers.retain(|h| !Arc::ptr_eq(h, handler));
        handlers.len() != before
    }

    pub fn clear_handlers(&self) {
        self.handlers.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Snapshot of the attached handlers.
    pub fn handlers(&self) -> Vec<Arc<Handler>> {
        self.handlers.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn handler_kinds(&self) -> Vec<HandlerKind> {
        self.handlers().iter().map(|h| h.kind()).collect()
    }

    /// Hands `record` to this logger's handlers, then to its ancestors'
    /// while propagation allows. Every handler is tried; the first write
    /// error is returned afterwards.
    pub fn handle(&self, record: &LogRecord) -> Result<()> {
        let mut first_error = None;
        let mut current = Some(self);
        while let Some(logger) = current {
            for handler in logger.handlers() {
                if let Err(e) = handler.handle(record) {
                    first_error.get_or_insert(e);
                }
            }
            current = if logger.propagate() {
                logger.parent.as_deref()
            } else {
                None
            };
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    #[track_caller]
    pub fn log(&self, level: Level, message: impl fmt::Display) -> Result<()> {
        if !self.is_enabled_for(level) {
            return Ok(());
        }
        let record = LogRecord::at(&self.name, level, message.to_string(), Location::caller());
        self.handle(&record)
    }

    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) -> Result<()> {
        self.log(Level::Debug, message)
    }

    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) -> Result<()> {
        self.log(Level::Info, message)
    }

    #[track_caller]
    pub fn warning(&self, message: impl fmt::Display) -> Result<()> {
        self.log(Level::Warning, message)
    }

    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) -> Result<()> {
        self.log(Level::Error, message)
    }

    #[track_caller]
    pub fn critical(&self, message: impl fmt::Display) -> Result<()> {
        self.log(Level::Critical, message)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("handlers", &self.handler_kinds())
            .field("propagate", &self.propagate())
            .finish()
    }
}

/// Loggers keyed by name; asking twice for a name yields the same logger.
pub struct LoggerRegistry {
    root: Arc<Logger>,
    loggers: RwLock<HashMap<String, Arc<Logger>>>,
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self {
            root: Arc::new(Logger::new(ROOT_NAME, None, Some(ROOT_LEVEL))),
            loggers: RwLock::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> Arc<Logger> {
        self.root.clone()
    }

    /// Looks up `name`, creating it and any missing ancestors. An empty name
    /// or `"root"` yields the root logger.
    pub fn get_logger(&self, name: &str) -> Arc<Logger> {
        if name.is_empty() || name == ROOT_NAME {
            return self.root();
        }
        if let Some(logger) = self.loggers.read().unwrap_or_else(PoisonError::into_inner).get(name) {
            return logger.clone();
        }
        let mut loggers = self.loggers.write().unwrap_or_else(PoisonError::into_inner);
        self.get_or_create(&mut loggers, name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loggers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    fn get_or_create(&self, loggers: &mut HashMap<String, Arc<Logger>>, name: &str) -> Arc<Logger> {
        if let Some(logger) = loggers.get(name) {
            return logger.clone();
        }
        let parent = match name.rsplit_once('.') {
            Some((parent, _)) if !parent.is_empty() => self.get_or_create(loggers, parent),
            _ => self.root(),
        };
        let logger = Arc::new(Logger::new(name, Some(parent), None));
        loggers.insert(name.to_string(), logger.clone());
        logger
    }
}

/// The process-wide registry.
pub fn global_registry() -> Arc<LoggerRegistry> {
    static REGISTRY: OnceLock<Arc<LoggerRegistry>> = OnceLock::new();
    REGISTRY.get_or_init(|| Arc::new(LoggerRegistry::new())).clone()
}

/// Looks up a logger in the process-wide registry.
pub fn get_logger(name: &str) -> Arc<Logger> {
    global_registry().get_logger(name)
}
