use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::util::paths::config_path;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Environment variable that overrides the configured origin.
pub const ENV_ORIGIN: &str = "UNIMAN_ORIGIN";

const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("origin must not be empty")]
    EmptyOrigin,
    #[error("origin must use http:// or https:// and include a host")]
    InvalidOrigin,
    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server origin every API path is appended to
    pub origin: String,
    /// Dashboard page the navigation URLs are built against
    pub dashboard_path: String,
    /// Re-issues allowed after a successful token refresh
    pub retry_budget: u32,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Role an account must carry to use the console
    pub privileged_role: String,
    /// Delay before the sign-out redirect after a terminal auth failure
    pub sign_out_delay: Duration,
    /// Maximum number of pending toasts
    pub toast_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            dashboard_path: "/dashboard".to_string(),
            retry_budget: 1,
            request_timeout: Duration::from_secs(30),
            privileged_role: "Administrator".to_string(),
            sign_out_delay: Duration::from_millis(2000),
            toast_capacity: 8,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlApiConfig {
    pub retry_budget: Option<u32>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlAuthConfig {
    pub privileged_role: Option<String>,
    pub sign_out_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlUiConfig {
    pub toast_capacity: Option<usize>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub origin: Option<String>,
    pub dashboard_path: Option<String>,
    pub api: Option<TomlApiConfig>,
    pub auth: Option<TomlAuthConfig>,
    pub ui: Option<TomlUiConfig>,
}

impl Config {
    /// Load configuration from ~/.uniman/config.toml, falling back to defaults.
    ///
    /// A malformed file is logged and ignored rather than aborting startup.
    pub fn load() -> Self {
        let config_file = config_path();

        // Create example config on first run
        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        let mut config = Config::default();
        if let Ok(contents) = fs::read_to_string(&config_file) {
            match Self::from_toml_str(&contents) {
                Ok(loaded) => config = loaded,
                Err(e) => {
                    tracing::warn!(
                        path = %config_file.display(),
                        error = %e,
                        "Ignoring invalid config file"
                    );
                }
            }
        }

        config.apply_env_overrides();
        config
    }

    /// Parse a TOML document and merge it on top of the defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let toml_config = toml::from_str::<TomlConfig>(contents)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        let mut config = Config::default();
        config.merge(toml_config)?;
        Ok(config)
    }

    fn merge(&mut self, toml_config: TomlConfig) -> Result<(), ConfigError> {
        if let Some(origin) = toml_config.origin {
            self.origin = normalize_origin(&origin)?;
        }
        if let Some(path) = toml_config.dashboard_path {
            self.dashboard_path = normalize_dashboard_path(&path);
        }

        if let Some(api) = toml_config.api {
            if let Some(retry_budget) = api.retry_budget {
                self.retry_budget = retry_budget;
            }
            if let Some(secs) = api.request_timeout_secs {
                self.request_timeout = Duration::from_secs(secs.max(1));
            }
        }

        if let Some(auth) = toml_config.auth {
            if let Some(role) = auth.privileged_role.filter(|r| !r.trim().is_empty()) {
                self.privileged_role = role.trim().to_string();
            }
            if let Some(ms) = auth.sign_out_delay_ms {
                self.sign_out_delay = Duration::from_millis(ms);
            }
        }

        if let Some(ui) = toml_config.ui {
            if let Some(capacity) = ui.toast_capacity {
                self.toast_capacity = capacity.max(1);
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        let Some(raw) = std::env::var(ENV_ORIGIN)
            .ok()
            .filter(|value| !value.trim().is_empty())
        else {
            return;
        };
        match normalize_origin(&raw) {
            Ok(origin) => self.origin = origin,
            Err(e) => tracing::warn!(value = %raw, error = %e, "Ignoring {ENV_ORIGIN}"),
        }
    }

    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::debug!(error = %e, "Could not create config directory");
                return;
            }
        }
        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::debug!(error = %e, "Could not write example config");
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn with_retry_budget(mut self, retry_budget: u32) -> Self {
        self.retry_budget = retry_budget;
        self
    }

    pub fn with_sign_out_delay(mut self, delay: Duration) -> Self {
        self.sign_out_delay = delay;
        self
    }
}

/// Trim an origin and drop the trailing slash; requires an http(s) scheme and a host.
pub fn normalize_origin(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyOrigin);
    }
    let Some((scheme, remainder)) = trimmed.split_once("://") else {
        return Err(ConfigError::InvalidOrigin);
    };
    if !matches!(scheme, "http" | "https") {
        return Err(ConfigError::InvalidOrigin);
    }
    if remainder.trim().is_empty() || remainder.starts_with('/') {
        return Err(ConfigError::InvalidOrigin);
    }
    Ok(trimmed.to_string())
}

fn normalize_dashboard_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
