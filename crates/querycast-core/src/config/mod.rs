//! Configuration schemas.
//!
//! Configuration is deserialized via the `config` crate from optional TOML
//! files plus `QUERYCAST__`-prefixed environment variables. Each sub-module
//! represents a logical configuration section.

pub mod database;
pub mod logging;
pub mod pagination;

use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use self::database::DatabaseConfig;
use self::logging::LoggingConfig;
use self::pagination::PaginationConfig;

use crate::error::AppError;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryCastConfig {
    /// Pagination defaults and limits.
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// PostgreSQL backend settings, when that backend is used.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

impl QueryCastConfig {
    /// Load configuration.
    ///
    /// Merges `config/default`, the environment overlay `config/{env}` and
    /// environment variables such as `QUERYCAST__PAGINATION__MAX_PAGE_SIZE`.
    /// Every source is optional; missing sections fall back to defaults.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("QUERYCAST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.pagination.validate()?;
        if let Some(database) = &loaded.database {
            database.validate()?;
        }
        debug!(
            env,
            default_page_size = loaded.pagination.default_page_size,
            max_page_size = loaded.pagination.max_page_size,
            "Configuration loaded"
        );
        Ok(loaded)
    }
}
