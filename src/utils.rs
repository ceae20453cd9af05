use std::path::{Path, PathBuf};

/// Environment variable overriding the state directory.
pub const STATE_DIR_ENV: &str = "APPLOG_STATE_DIR";

/// Environment variable overriding the home directory.
pub const HOME_ENV: &str = "APPLOG_HOME";

/// Resolve the applog state directory (where the config file lives).
pub fn resolve_config_dir() -> PathBuf {
    if let Ok(override_dir) = std::env::var(STATE_DIR_ENV) {
        let trimmed = override_dir.trim();
        if !trimmed.is_empty() {
            return resolve_user_path(trimmed);
        }
    }
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".applog")
}

/// Resolve the home directory, preferring APPLOG_HOME.
pub fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = std::env::var(HOME_ENV) {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed).canonicalize().unwrap_or_else(|_| PathBuf::from(trimmed)));
        }
    }
    dirs::home_dir()
}

/// Resolve a user path, expanding ~ to home directory.
pub fn resolve_user_path(input: &str) -> PathBuf {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return PathBuf::new();
    }
    if trimmed.starts_with('~') {
        let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
        let rest = trimmed.trim_start_matches('~').trim_start_matches('/');
        if rest.is_empty() {
            return home;
        }
        return home.join(rest);
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(path)
    }
}
