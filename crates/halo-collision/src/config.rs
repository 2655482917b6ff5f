// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Checker configuration and the storage port used to persist it.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::error::CollisionError;

/// Store key under which [`CheckerConfig`] is persisted.
pub const CHECKER_CONFIG_KEY: &str = "collision";

/// World geometry the checker is initialised with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// World width in cells.
    pub width: u32,
    /// World height in cells.
    pub height: u32,
    /// Physical units per world unit; applied to centres and radii.
    pub cell_size: f64,
    /// Toroidal world flag. Recorded only; the tree is not topology aware.
    pub wrap: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            cell_size: 1.0,
            wrap: false,
        }
    }
}

impl CheckerConfig {
    /// Rejects empty worlds and non-positive or non-finite cell sizes.
    pub fn validate(&self) -> Result<(), CollisionError> {
        if self.width == 0 || self.height == 0 {
            return Err(CollisionError::InvalidConfig(format!(
                "world must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(CollisionError::InvalidConfig(format!(
                "cell_size must be positive and finite, got {}",
                self.cell_size
            )));
        }
        Ok(())
    }
}

/// Storage port for raw config blobs (keyed by logical name).
pub trait ConfigStore {
    /// Load a raw config blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw config blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Serializes config values as JSON and delegates storage to a [`ConfigStore`].
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: ConfigStore> ConfigService<S> {
    /// Load and deserialize the value stored under `key`; `Ok(None)` if missing
    /// or empty.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        match self.store.load_raw(key) {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Serialize and persist `value` under `key`.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }

    /// Stored checker config, or the defaults when none has been saved.
    pub fn checker_config(&self) -> Result<CheckerConfig, ConfigError> {
        Ok(self.load(CHECKER_CONFIG_KEY)?.unwrap_or_default())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(CheckerConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_geometry() {
        let zero_cell = CheckerConfig {
            cell_size: 0.0,
            ..CheckerConfig::default()
        };
        assert!(matches!(
            zero_cell.validate(),
            Err(CollisionError::InvalidConfig(_))
        ));
        let nan_cell = CheckerConfig {
            cell_size: f64::NAN,
            ..CheckerConfig::default()
        };
        assert!(nan_cell.validate().is_err());
        let empty = CheckerConfig {
            width: 0,
            ..CheckerConfig::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let cfg: CheckerConfig =
            serde_json::from_str(r#"{ "cell_size": 8.0, "wrap": true }"#).expect("parse");
        assert_eq!(cfg.width, 100);
        assert_eq!(cfg.height, 100);
        assert!((cfg.cell_size - 8.0).abs() < f64::EPSILON);
        assert!(cfg.wrap);
    }
}
