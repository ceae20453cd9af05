use std::io;

/// Errors surfaced by applog.
///
/// Logging itself only fails on I/O; the remaining variants come from
/// loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Error for a lock poisoned by a panicking writer.
    pub(crate) fn poisoned(what: &str) -> Self {
        Error::Io(io::Error::other(format!("{} lock poisoned", what)))
    }
}
