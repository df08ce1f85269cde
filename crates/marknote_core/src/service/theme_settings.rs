//! Persisted theme preference as an explicit context object.
//!
//! # Invariants
//! - Only `{ isDark }` is written to storage; nothing else leaks in.
//! - Missing or malformed stored state falls back to the light theme.

use crate::store::{KeyValueStore, PersistentStore};
use serde::{Deserialize, Serialize};

/// Storage key holding the theme preference.
pub const THEME_STORAGE_KEY: &str = "theme-storage";

/// The persisted subset of theme state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePreference {
    #[serde(default)]
    pub is_dark: bool,
}

/// Theme state bound to the store it persists into.
pub struct ThemeSettings<S: KeyValueStore> {
    store: PersistentStore<S>,
    preference: ThemePreference,
}

impl<S: KeyValueStore> ThemeSettings<S> {
    /// Initializes from storage.
    pub fn load(backend: S) -> Self {
        let store = PersistentStore::new(backend);
        let preference = store.load(THEME_STORAGE_KEY, ThemePreference::default());
        Self { store, preference }
    }

    pub fn is_dark(&self) -> bool {
        self.preference.is_dark
    }

    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    /// Flips the theme and persists it. Returns the new `is_dark` value.
    pub fn toggle(&mut self) -> bool {
        self.set_dark(!self.preference.is_dark);
        self.preference.is_dark
    }

    pub fn set_dark(&mut self, is_dark: bool) {
        self.preference.is_dark = is_dark;
        self.store.save(THEME_STORAGE_KEY, &self.preference);
    }

    pub fn into_store(self) -> PersistentStore<S> {
        self.store
    }
}
