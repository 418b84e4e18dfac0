//! Cache configuration
//!
//! Capacity can be set in code or read from the environment.

use std::env;

use crate::error::{Error, Result};

/// Environment variable read by [`CacheConfig::from_env`]
pub const CAPACITY_ENV: &str = "MEMOCACHE_CAPACITY";

/// Default number of entries an LRU cache holds
pub const DEFAULT_CAPACITY: usize = 1000;

/// LRU cache configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries
    pub capacity: usize,
}

impl CacheConfig {
    /// Set the capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Reject settings an LRU cache cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        Ok(())
    }

    /// Load the configuration from `MEMOCACHE_CAPACITY`
    ///
    /// Falls back to [`DEFAULT_CAPACITY`] when the variable is unset. A value
    /// that does not parse is an error rather than a silent default.
    pub fn from_env() -> Result<Self> {
        let capacity = match env::var(CAPACITY_ENV) {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                Error::InvalidConfig(format!("{CAPACITY_ENV}={raw:?} is not a valid capacity"))
            })?,
            Err(_) => DEFAULT_CAPACITY,
        };
        let config = Self { capacity };
        config.validate()?;
        Ok(config)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}
