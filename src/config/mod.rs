mod settings;

pub use settings::{normalize_origin, Config, ConfigError, TomlConfig, ENV_ORIGIN};
