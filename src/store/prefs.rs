//! Preference-file persistence.
//!
//! A [`PrefStore`] is a fixed-name JSON key-value file standing in for the
//! platform preference store: string and boolean values keyed by name, with
//! every mutation rewriting the whole blob. [`HabitStore`] layers the habit
//! list on top, serialized as a JSON-array text blob under a single key.
//!
//! Loading tolerates an absent file (empty store) and malformed content
//! (logged and discarded); neither surfaces to the caller.

use crate::store::habit::Habit;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fixed preference-file name.
pub const PREFS_FILE: &str = "HabitusPrefs.json";

const HABITS_KEY: &str = "habits";
const NIGHT_MODE_KEY: &str = "night_mode";
const FOCUS_MODE_KEY: &str = "focus_mode";

/// Errors raised by store writes. Reads never fail; they degrade to defaults.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not write preference file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A JSON key-value file with whole-blob replace semantics.
#[derive(Debug)]
pub struct PrefStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl PrefStore {
    /// Open the store at `path`. A missing file yields an empty store; a
    /// malformed one is logged and discarded.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Map<String, Value>>(&content) {
                Ok(values) => values,
                Err(e) => {
                    log::warn!("malformed preference file {path:?}, starting empty: {e}");
                    Map::new()
                }
            },
            Err(_) => Map::new(),
        };
        Self { path, values }
    }

    /// Open the store under its fixed file name inside `dir`.
    pub fn open_in(dir: &Path) -> Self {
        Self::open(dir.join(PREFS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn put_string(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), Value::from(value));
        self.save()
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    pub fn put_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), Value::from(value));
        self.save()
    }

    /// Remove every stored value and rewrite the blob.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.values.clear();
        self.save()
    }

    fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&Value::Object(self.values.clone()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Habit persistence on top of a [`PrefStore`].
#[derive(Debug)]
pub struct HabitStore {
    prefs: PrefStore,
}

impl HabitStore {
    pub fn new(prefs: PrefStore) -> Self {
        Self { prefs }
    }

    /// Open the habit store under the fixed preference file inside `dir`.
    pub fn open_in(dir: &Path) -> Self {
        Self::new(PrefStore::open_in(dir))
    }

    /// Load the habit list. An absent blob yields an empty list; a malformed
    /// one is logged and discarded.
    pub fn load(&self) -> Vec<Habit> {
        match self.prefs.get_string(HABITS_KEY) {
            Some(blob) => match serde_json::from_str(blob) {
                Ok(habits) => habits,
                Err(e) => {
                    log::warn!("malformed habit list in preference store, discarding: {e}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        }
    }

    /// Serialize the full list back as a text blob. No partial updates.
    pub fn save(&mut self, habits: &[Habit]) -> Result<(), StoreError> {
        let blob = serde_json::to_string(habits)?;
        self.prefs.put_string(HABITS_KEY, &blob)
    }

    pub fn night_mode(&self) -> bool {
        self.prefs.get_bool(NIGHT_MODE_KEY, false)
    }

    pub fn set_night_mode(&mut self, on: bool) -> Result<(), StoreError> {
        self.prefs.put_bool(NIGHT_MODE_KEY, on)
    }

    pub fn focus_mode(&self) -> bool {
        self.prefs.get_bool(FOCUS_MODE_KEY, false)
    }

    pub fn set_focus_mode(&mut self, on: bool) -> Result<(), StoreError> {
        self.prefs.put_bool(FOCUS_MODE_KEY, on)
    }

    /// Drop everything: habits and theme flags.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.prefs.clear()
    }

    pub fn path(&self) -> &Path {
        self.prefs.path()
    }
}
