//! Key-value persistence with JSON (de)serialization and safe fallback.
//!
//! # Responsibility
//! - Define the `KeyValueStore` capability used by the notes manager.
//! - Wrap any backend in `PersistentStore`, which turns storage and JSON
//!   failures into logged fallbacks instead of caller-visible errors.
//!
//! # Invariants
//! - `PersistentStore::load` never fails: absent, unreadable or malformed
//!   values resolve to the caller-supplied default.
//! - `PersistentStore::save` never fails: write errors are logged and
//!   reported as `false`; the caller's in-memory value stays authoritative.
//! - No transactional guarantee across keys.

use crate::db::DbError;
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer failure for key-value reads and writes.
#[derive(Debug)]
pub enum StoreError {
    /// Backend database failure.
    Db(DbError),
    /// Connection is missing a table the backend requires.
    MissingRequiredTable(&'static str),
    /// Write rejected because the backend is out of space.
    QuotaExceeded {
        key: String,
        required_bytes: usize,
        quota_bytes: usize,
    },
    /// Stored text is not valid JSON for the requested type.
    Decode { key: String, source: serde_json::Error },
    /// Value could not be rendered as JSON.
    Encode { key: String, source: serde_json::Error },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::QuotaExceeded {
                key,
                required_bytes,
                quota_bytes,
            } => write!(
                f,
                "quota exceeded writing `{key}`: {required_bytes} bytes required, {quota_bytes} available"
            ),
            Self::Decode { key, source } => write!(f, "malformed value under `{key}`: {source}"),
            Self::Encode { key, source } => write!(f, "cannot encode value for `{key}`: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MissingRequiredTable(_) | Self::QuotaExceeded { .. } => None,
            Self::Decode { source, .. } | Self::Encode { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Raw string key-value capability.
///
/// Implementations only move text; JSON handling lives in
/// `PersistentStore`.
pub trait KeyValueStore {
    /// Returns the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

/// JSON adapter over a `KeyValueStore` backend.
#[derive(Debug)]
pub struct PersistentStore<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> PersistentStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    pub fn into_backend(self) -> S {
        self.backend
    }

    /// Reads and decodes `key`, surfacing every failure.
    ///
    /// Returns `Ok(None)` when the key is absent.
    pub fn try_load<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        let Some(raw) = self.backend.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Decode {
                key: key.to_string(),
                source,
            })
    }

    /// Reads `key`, falling back to `default` on absence or any failure.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!("event=store_load module=store status=miss key={key}");
                default
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=fallback key={key} error={err}"
                );
                default
            }
        }
    }

    /// Encodes and writes `value` under `key`, surfacing every failure.
    pub fn try_save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> StoreResult<()> {
        let encoded = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.backend.set(key, &encoded)
    }

    /// Writes `value` under `key`; returns `false` when persistence failed.
    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> bool {
        match self.try_save(key, value) {
            Ok(()) => true,
            Err(err) => {
                error!("event=store_save module=store status=error key={key} error={err}");
                false
            }
        }
    }
}
