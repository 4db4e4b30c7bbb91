//! Listing configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::recipe::ListingLimits;

/// Page size bounds for every recipe listing
#[derive(Debug, Clone, Deserialize)]
pub struct ListingConfig {
    /// Page size when `limit` is absent
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Larger `limit` values are clamped to this
    #[serde(default = "max_page_size")]
    pub max_page_size: u32,
}

impl ListingConfig {
    pub fn limits(&self) -> ListingLimits {
        ListingLimits {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ValidationError::InvalidPageSize);
        }
        Ok(())
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: max_page_size(),
        }
    }
}

fn default_page_size() -> u32 {
    12
}

fn max_page_size() -> u32 {
    100
}
