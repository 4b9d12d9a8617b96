//! Array pool configuration

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlimError};

use super::array_pool::MIN_ARRAY_LENGTH;

/// Configuration for array pools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Largest array length kept in a bucket; bigger rents are not pooled
    pub max_array_length: usize,
    /// Maximum number of idle arrays retained per size class
    pub max_arrays_per_bucket: usize,
    /// Reset every returned array to `T::default()`
    pub clear_on_return: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_array_length: 1024 * 1024,
            max_arrays_per_bucket: 32,
            clear_on_return: false,
        }
    }
}

impl PoolConfig {
    /// Set the largest pooled array length
    pub fn with_max_array_length(mut self, length: usize) -> Self {
        self.max_array_length = length;
        self
    }

    /// Set the number of idle arrays kept per bucket
    pub fn with_max_arrays_per_bucket(mut self, count: usize) -> Self {
        self.max_arrays_per_bucket = count;
        self
    }

    /// Set clear-on-return behavior
    pub fn with_clear_on_return(mut self, clear: bool) -> Self {
        self.clear_on_return = clear;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_array_length < MIN_ARRAY_LENGTH {
            return Err(SlimError::invalid_parameter(
                "max_array_length",
                format!("must be at least {}", MIN_ARRAY_LENGTH),
            ));
        }

        if !self.max_array_length.is_power_of_two() {
            return Err(SlimError::invalid_parameter(
                "max_array_length",
                "must be a power of two",
            ));
        }

        if self.max_arrays_per_bucket == 0 {
            return Err(SlimError::invalid_parameter(
                "max_arrays_per_bucket",
                "cannot be zero",
            ));
        }

        Ok(())
    }

    /// Number of size-class buckets this configuration produces
    pub fn bucket_count(&self) -> usize {
        let max_shift = self.max_array_length.trailing_zeros();
        let min_shift = MIN_ARRAY_LENGTH.trailing_zeros();
        (max_shift.saturating_sub(min_shift) + 1) as usize
    }
}

/// Builder pattern for pool configuration
#[derive(Debug, Default)]
pub struct PoolConfigBuilder {
    config: PoolConfig,
}

impl PoolConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the largest pooled array length
    pub fn max_array_length(mut self, length: usize) -> Self {
        self.config.max_array_length = length;
        self
    }

    /// Set the number of idle arrays kept per bucket
    pub fn max_arrays_per_bucket(mut self, count: usize) -> Self {
        self.config.max_arrays_per_bucket = count;
        self
    }

    /// Reset returned arrays to their default value
    pub fn clear_on_return(mut self, clear: bool) -> Self {
        self.config.clear_on_return = clear;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<PoolConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
