//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod accounts;
pub mod campaign;
pub mod database;
pub mod folders;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::accounts::AccountConfig;
pub use self::campaign::CampaignConfig;
pub use self::database::DatabaseConfig;
pub use self::folders::FolderConfig;
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the TOML
/// configuration file merged with `ACCOUNTHUB__*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Folder tree limits.
    #[serde(default)]
    pub folders: FolderConfig,
    /// Account interval range.
    #[serde(default)]
    pub accounts: AccountConfig,
    /// Campaign launch quotas.
    #[serde(default)]
    pub campaign: CampaignConfig,
    /// Per-request limits.
    #[serde(default)]
    pub requests: RequestConfig,
}

/// Per-request execution limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Deadline applied to every store call of a request (0 disables it).
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_request_timeout(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// The file is optional; values from environment variables prefixed
    /// with `ACCOUNTHUB__` (e.g. `ACCOUNTHUB__DATABASE__URL`) override it.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("ACCOUNTHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the services cannot operate with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.folders.max_depth == 0 {
            return Err(AppError::configuration(
                "folders.max_depth must be greater than zero",
            ));
        }
        if self.accounts.interval_min == 0 {
            return Err(AppError::configuration(
                "accounts.interval_min must be greater than zero",
            ));
        }
        if self.accounts.interval_min > self.accounts.interval_max {
            return Err(AppError::configuration(format!(
                "accounts.interval_min ({}) exceeds accounts.interval_max ({})",
                self.accounts.interval_min, self.accounts.interval_max
            )));
        }
        Ok(())
    }
}

fn default_request_timeout() -> u64 {
    30
}
