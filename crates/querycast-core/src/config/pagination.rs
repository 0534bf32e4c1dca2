//! Pagination defaults and limits.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::types::pagination::PaginationParams;

/// Pagination defaults applied by callers through
/// `put_default_pagination`, and the page-size ceiling enforced by the stock
/// `max_page_size` validator.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
#[validate(schema(function = "validate_page_sizes"))]
pub struct PaginationConfig {
    /// Page used when a request does not name one.
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub default_page: u64,
    /// Page size used when a request does not name one.
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1))]
    pub default_page_size: u64,
    /// Largest page size a request may ask for.
    #[serde(default = "default_max_page_size")]
    #[validate(range(min = 1))]
    pub max_page_size: u64,
}

impl PaginationConfig {
    /// The configured defaults as builder input.
    pub fn default_params(&self) -> PaginationParams {
        PaginationParams::new(self.default_page, self.default_page_size)
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: default_page(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn validate_page_sizes(config: &PaginationConfig) -> Result<(), ValidationError> {
    if config.default_page_size > config.max_page_size {
        return Err(ValidationError::new("default_page_size_exceeds_max"));
    }
    Ok(())
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    25
}

fn default_max_page_size() -> u64 {
    100
}
