//! PostgreSQL backend configuration.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Settings for the pool behind `PgRepository`.
///
/// Composed queries come from request params, so a per-statement timeout
/// can be set to bound what a single fetch may cost the server.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
#[validate(schema(function = "validate_pool_bounds"))]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    #[validate(length(min = 1))]
    pub url: String,
    #[serde(default = "default_max_connections")]
    #[validate(range(min = 1))]
    pub max_connections: u32,
    #[serde(default)]
    pub min_connections: u32,
    /// Seconds to wait for a free connection before a fetch fails.
    #[serde(default = "default_acquire_timeout")]
    #[validate(range(min = 1))]
    pub acquire_timeout_seconds: u64,
    /// Seconds an unused connection may stay open. `0` keeps it forever.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// `statement_timeout` set on every new connection, in milliseconds.
    #[serde(default)]
    pub statement_timeout_ms: Option<u64>,
}

impl DatabaseConfig {
    /// Configuration for `url` with every other setting at its default.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            min_connections: 0,
            acquire_timeout_seconds: default_acquire_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
            statement_timeout_ms: None,
        }
    }
}

fn validate_pool_bounds(config: &DatabaseConfig) -> Result<(), ValidationError> {
    if config.min_connections > config.max_connections {
        return Err(ValidationError::new("min_connections_exceeds_max"));
    }
    Ok(())
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    5
}

fn default_idle_timeout() -> u64 {
    600
}
