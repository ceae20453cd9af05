use serde::{Deserialize, Serialize};
use std::fmt;

/// Which handlers the logger factory attaches.
///
/// Unknown values are kept as-is rather than rejected; they attach nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HandlerPolicy {
    Never,
    Debug,
    Production,
    #[default]
    Always,
    Unrecognized(String),
}

impl HandlerPolicy {
    pub fn as_str(&self) -> &str {
        match self {
            HandlerPolicy::Never => "never",
            HandlerPolicy::Debug => "debug",
            HandlerPolicy::Production => "production",
            HandlerPolicy::Always => "always",
            HandlerPolicy::Unrecognized(other) => other,
        }
    }

    /// Whether the debug handler is attached.
    pub fn wants_debug_handler(&self) -> bool {
        matches!(self, HandlerPolicy::Debug | HandlerPolicy::Always)
    }

    /// Whether the production handler is attached.
    pub fn wants_production_handler(&self) -> bool {
        matches!(self, HandlerPolicy::Production | HandlerPolicy::Always)
    }
}

impl From<&str> for HandlerPolicy {
    fn from(value: &str) -> Self {
        match value {
            "never" => HandlerPolicy::Never,
            "debug" => HandlerPolicy::Debug,
            "production" => HandlerPolicy::Production,
            "always" => HandlerPolicy::Always,
            other => HandlerPolicy::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for HandlerPolicy {
    fn from(value: String) -> Self {
        HandlerPolicy::from(value.as_str())
    }
}

impl From<HandlerPolicy> for String {
    fn from(policy: HandlerPolicy) -> Self {
        policy.as_str().to_string()
    }
}

impl fmt::Display for HandlerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application configuration, keyed the way the host application spells it
/// (`DEBUG`, `LOGGER_NAME`, `LOGGER_HANDLER_POLICY`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct AppConfig {
    pub debug: bool,
    pub logger_name: Option<String>,
    pub logger_handler_policy: HandlerPolicy,
    /// `EnvFilter` directives for events bridged from `tracing`.
    pub log_filter: Option<String>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
}
