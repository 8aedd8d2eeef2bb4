//! Path utilities for the admin console data directory

use std::path::PathBuf;
use std::sync::OnceLock;

/// Environment variable that overrides the default data directory.
pub const ENV_DATA_DIR: &str = "UNIMAN_DATA_DIR";

/// Global storage for custom data directory path
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Initialize the data directory with an optional custom path.
/// Must be called early in main() before any other path functions are used.
/// If custom_path is None, `UNIMAN_DATA_DIR` is consulted, then ~/.uniman.
pub fn init_data_dir(custom_path: Option<PathBuf>) {
    let path = custom_path
        .or_else(env_data_dir)
        .unwrap_or_else(default_data_dir);
    if DATA_DIR.set(path.clone()).is_err() {
        let existing = DATA_DIR
            .get()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        tracing::debug!(
            path = %path.display(),
            existing = %existing,
            "Data directory already initialized"
        );
    }
}

fn env_data_dir() -> Option<PathBuf> {
    std::env::var(ENV_DATA_DIR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Get the default data directory path (~/.uniman)
fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".uniman"))
        .unwrap_or_else(|| PathBuf::from(".uniman"))
}

/// Get the base data directory.
/// Returns the path set via init_data_dir(), else `UNIMAN_DATA_DIR`, else ~/.uniman
pub fn data_dir() -> PathBuf {
    DATA_DIR
        .get()
        .cloned()
        .or_else(env_data_dir)
        .unwrap_or_else(default_data_dir)
}

/// Get the persisted session record path (~/.uniman/session.json)
pub fn session_path() -> PathBuf {
    data_dir().join("session.json")
}

/// Get the logs directory (~/.uniman/logs)
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Get the default log file path (~/.uniman/logs/uniman.log)
pub fn log_file_path() -> PathBuf {
    logs_dir().join("uniman.log")
}

/// Get the config file path (~/.uniman/config.toml)
pub fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}
