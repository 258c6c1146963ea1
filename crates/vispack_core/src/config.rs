//! # Store Configuration
//!
//! Sizing knobs, loaded once at startup from TOML.
//!
//! ```toml
//! # All keys are optional.
//! initial_capacity = 256
//! max_capacity = 65536
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Configuration for a [`Store`](crate::Store).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Records to allocate up front. Rounded up to a power of two; zero is
    /// treated as one.
    pub initial_capacity: usize,
    /// Hard ceiling on capacity, as a power of two. Growth past it fails
    /// with [`StoreError::AllocationFailure`]. `None` means unbounded.
    pub max_capacity: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1,
            max_capacity: None,
        }
    }
}

impl StoreConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] if the text is not valid TOML,
    /// has unknown keys, or fails [`validate`](Self::validate).
    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|err| StoreError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] if the file cannot be read or
    /// parsed.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            StoreError::InvalidConfig(format!("cannot read {}: {err}", path.display()))
        })?;

        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded store config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Returns the capacity a store built from this config starts with, or
    /// `None` if rounding it up to a power of two overflows.
    #[inline]
    #[must_use]
    pub fn effective_initial_capacity(&self) -> Option<usize> {
        self.initial_capacity.max(1).checked_next_power_of_two()
    }

    /// Checks the configuration for consistency.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] if the initial capacity cannot
    /// be rounded to a power of two, if the ceiling is not a power of two, or
    /// if the ceiling is below the effective initial capacity.
    pub fn validate(&self) -> StoreResult<()> {
        let Some(initial) = self.effective_initial_capacity() else {
            return Err(StoreError::InvalidConfig(format!(
                "initial_capacity {} has no power of two above it",
                self.initial_capacity
            )));
        };

        if let Some(max) = self.max_capacity {
            if !max.is_power_of_two() {
                return Err(StoreError::InvalidConfig(format!(
                    "max_capacity {max} is not a power of two"
                )));
            }
            if max < initial {
                return Err(StoreError::InvalidConfig(format!(
                    "max_capacity {max} is below initial capacity {initial}"
                )));
            }
        }
        Ok(())
    }
}
