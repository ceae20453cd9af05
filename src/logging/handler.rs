use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::logging::format::Formatter;
use crate::logging::level::Level;
use crate::logging::record::LogRecord;
use crate::logging::stream::StreamSource;

/// Predicate deciding whether a handler emits a record.
pub type Filter = Arc<dyn Fn(&LogRecord) -> bool + Send + Sync>;

/// What a handler was attached for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Debug,
    Production,
    Custom,
}

impl HandlerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HandlerKind::Debug => "debug",
            HandlerKind::Production => "production",
            HandlerKind::Custom => "custom",
        }
    }
}

/// Formats qualifying records and writes them to a stream.
pub struct Handler {
    kind: HandlerKind,
    level: Level,
    formatter: Formatter,
    filters: Vec<Filter>,
    source: Arc<dyn StreamSource>,
}

impl Handler {
    pub fn new(kind: HandlerKind, source: Arc<dyn StreamSource>) -> Self {
        Self {
            kind,
            level: Level::Debug,
            formatter: Formatter::new("%(message)s"),
            filters: Vec::new(),
            source,
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_filter(mut self, filter: impl Fn(&LogRecord) -> bool + Send + Sync + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    pub fn kind(&self) -> HandlerKind {
        self.kind
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Level check followed by every filter.
    pub fn accepts(&self, record: &LogRecord) -> bool {
        record.level >= self.level && self.filters.iter().all(|f| f(record))
    }

    /// Emits `record` if accepted. Returns whether it was written.
    pub fn handle(&self, record: &LogRecord) -> Result<bool> {
        if !self.accepts(record) {
            return Ok(false);
        }
        let line = self.formatter.format(record);
        self.source.stream().write_line(&line)?;
        Ok(true)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("kind", &self.kind)
            .field("level", &self.level)
            .field("format", &self.formatter.template())
            .field("filters", &self.filters.len())
            .finish()
    }
}
