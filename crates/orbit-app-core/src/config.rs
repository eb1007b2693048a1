// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config service and storage port for Orbit (levels, prefs).

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Key under which [`PlayerPrefs`](crate::prefs::PlayerPrefs) are stored.
pub const PREFS_KEY: &str = "prefs";

/// Storage key for a named level document.
pub fn level_key(name: &str) -> String {
    format!("level-{name}")
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

    /// Borrow the inner store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and deserialize a config value for `key`. Returns `Ok(None)` if missing.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        match self.store.load_raw(key) {
            Ok(bytes) => {
                if bytes.is_empty() {
                    return Ok(None);
                }
                let value = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Load `key`, falling back to `T::default()` when it is missing.
    pub fn load_or_default<T>(&self, key: &str) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Default,
    {
        Ok(self.load(key)?.unwrap_or_default())
    }

    /// Serialize and persist a config value for `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapStore(RefCell<HashMap<String, Vec<u8>>>);

    impl ConfigStore for MapStore {
        fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
            self.0.borrow().get(key).cloned().ok_or(ConfigError::NotFound)
        }

        fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
            self.0.borrow_mut().insert(key.to_owned(), data.to_vec());
            Ok(())
        }
    }

    #[test]
    fn missing_key_loads_as_none() {
        let service = ConfigService::new(MapStore::default());
        let value: Option<Vec<u32>> = service.load("absent").expect("load");
        assert!(value.is_none());
        let fallback: Vec<u32> = service.load_or_default("absent").expect("load");
        assert!(fallback.is_empty());
    }

    #[test]
    fn empty_blob_loads_as_none() {
        let service = ConfigService::new(MapStore::default());
        service.store().save_raw("blank", &[]).expect("save");
        let value: Option<u32> = service.load("blank").expect("load");
        assert!(value.is_none());
    }

    #[test]
    fn corrupt_blob_is_a_serde_error() {
        let service = ConfigService::new(MapStore::default());
        service.store().save_raw("bad", b"{not json").expect("save");
        let err = service.load::<u32>("bad").expect_err("should fail");
        assert!(matches!(err, ConfigError::Serde(_)));
    }

    #[test]
    fn level_keys_are_prefixed() {
        assert_eq!(level_key("aries"), "level-aries");
    }
}
