//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML via the `config`
//! crate, layered with `PETITORIUM__`-prefixed environment variables. Each
//! sub-module represents a logical configuration section.

pub mod hooks;
pub mod logging;
pub mod plugin;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use self::hooks::HookConfig;
pub use self::logging::{LogFormat, LoggingConfig};
pub use self::plugin::{InstalledInfo, PluginConfig, PluginSettings};

use crate::error::AppError;

/// Root configuration of the plugin host.
#[derive(Debug, Clone, Default, PartialEq, Validate, Serialize, Deserialize)]
pub struct AppConfig {
    /// Enabled plugins, installation records, and per-plugin settings.
    #[serde(default)]
    pub plugins: PluginConfig,
    /// Hook dispatch settings.
    #[serde(default)]
    #[validate(nested)]
    pub hooks: HookConfig,
    /// Logging settings.
    #[serde(default)]
    #[validate(nested)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// The file is optional; a missing file yields the defaults. Values are
    /// then overridden by environment variables such as
    /// `PETITORIUM__HOOKS__TIMEOUT_MS=5000`.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("PETITORIUM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        Self::finish(config)
    }

    /// Parse configuration from TOML text, without environment overrides.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        Self::finish(config)
    }

    fn finish(config: config::Config) -> Result<Self, AppError> {
        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        parsed.validate()?;
        Ok(parsed)
    }
}
