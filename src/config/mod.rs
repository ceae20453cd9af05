pub mod types;

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::utils::resolve_config_dir;
pub use types::*;

const DEFAULT_PORT: u16 = 5000;

/// Resolve the path to the config file.
pub fn resolve_config_path() -> PathBuf {
    let dir = resolve_config_dir();
    let json_path = dir.join("applog.json");
    if json_path.exists() {
        return json_path;
    }
    let yaml_path = dir.join("applog.yaml");
    if yaml_path.exists() {
        return yaml_path;
    }
    let yml_path = dir.join("applog.yml");
    if yml_path.exists() {
        return yml_path;
    }
    // Default to JSON
    json_path
}

/// Load configuration from the default config path.
pub fn load_config() -> Result<AppConfig> {
    let config_path = resolve_config_path();
    load_config_from_path(&config_path)
}

/// Load configuration from a specific path; a missing file yields defaults.
pub fn load_config_from_path(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)?;
    let contents = substitute_env_vars(&contents);

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    let config: AppConfig = match ext {
        "yaml" | "yml" => serde_yaml::from_str(&contents)?,
        _ => serde_json::from_str(&contents)?,
    };
    Ok(config)
}

/// Simple ${ENV_VAR} substitution in config strings.
fn substitute_env_vars(input: &str) -> String {
    static ENV_VAR: OnceLock<Regex> = OnceLock::new();
    let re = ENV_VAR.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
    });
    re.replace_all(input, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_default()
    }).into_owned()
}

/// Resolve the server port from config, with default.
pub fn resolve_server_port(config: &AppConfig) -> u16 {
    config.server_port.unwrap_or(DEFAULT_PORT)
}

/// Resolve the server bind host from config. `lan` means all interfaces and
/// `loopback` (the default) means 127.0.0.1; anything else is used as given.
pub fn resolve_server_bind(config: &AppConfig) -> String {
    match config.server_host.as_deref().map(str::trim) {
        Some("lan") => "0.0.0.0".to_string(),
        Some("loopback") | Some("") | None => "127.0.0.1".to_string(),
        Some(host) => host.to_string(),
    }
}

/// Resolve the socket address to listen on. IPv6 hosts such as `::1` are
/// accepted bare or bracketed.
pub fn resolve_server_addr(config: &AppConfig) -> Result<SocketAddr> {
    let host = resolve_server_bind(config);
    let port = resolve_server_port(config);
    let ip: IpAddr = host
        .trim_start_matches('[')
        .trim_end_matches(']')
        .parse()
        .map_err(|e| Error::Config(format!("invalid SERVER_HOST {:?}: {}", host, e)))?;
    Ok(SocketAddr::new(ip, port))
}
