//! Durable key-value persistence for the few scalars that outlive a session.
//!
//! The store is injected behind `KeyValueStore` so scoring and session bootstrap can run
//! against `MemoryStore` in tests and `FileStore` (one JSON object on disk) in production.
//! Concurrent writers are not coordinated: the last write wins.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::domain::Theme;
use crate::error::TrainerError;

pub const CURRENCY_KEY: &str = "study-mode-currency";
pub const PLAYER_A_NAME_KEY: &str = "versus-player-a-name";
pub const PLAYER_B_NAME_KEY: &str = "versus-player-b-name";
pub const THEME_KEY: &str = "app-theme";
const STUDY_SESSION_PREFIX: &str = "study-session:";

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), TrainerError>;
    fn remove(&self, key: &str) -> Result<(), TrainerError>;
}

/// Process-local store; nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TrainerError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), TrainerError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

/// All entries in a single JSON object file, rewritten on every change.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`. An unreadable or corrupted file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    warn!(target: "trainer_backend", path = %path.display(), error = %e, "Store file is corrupted; starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(target: "trainer_backend", path = %path.display(), error = %e, "Store file unreadable; starting empty");
                BTreeMap::new()
            }
        };
        Self { path, entries: Mutex::new(entries) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), TrainerError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, raw)?;
        debug!(target: "trainer_backend", path = %self.path.display(), entries = entries.len(), "Store flushed");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TrainerError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), TrainerError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

//
// Typed accessors. Reads never fail: missing or corrupted values fall back to defaults.
//

pub fn load_currency(store: &dyn KeyValueStore, default: i64) -> i64 {
    match store.get(CURRENCY_KEY) {
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(v) => v.max(0),
            Err(e) => {
                warn!(target: "study", raw = %raw, error = %e, "Stored currency unparsable; using default");
                default
            }
        },
        None => default,
    }
}

pub fn save_currency(store: &dyn KeyValueStore, currency: i64) -> Result<(), TrainerError> {
    store.set(CURRENCY_KEY, &currency.to_string())
}

/// `(player A, player B)` display names; empty when never set.
pub fn load_player_names(store: &dyn KeyValueStore) -> (String, String) {
    (
        store.get(PLAYER_A_NAME_KEY).unwrap_or_default(),
        store.get(PLAYER_B_NAME_KEY).unwrap_or_default(),
    )
}

pub fn player_name_key(slot_index: usize) -> &'static str {
    if slot_index == 0 { PLAYER_A_NAME_KEY } else { PLAYER_B_NAME_KEY }
}

pub fn save_player_name(store: &dyn KeyValueStore, slot_index: usize, name: &str) -> Result<(), TrainerError> {
    store.set(player_name_key(slot_index), name.trim())
}

pub fn load_theme(store: &dyn KeyValueStore) -> Theme {
    store.get(THEME_KEY).map(|v| Theme::parse_lenient(&v)).unwrap_or_default()
}

pub fn save_theme(store: &dyn KeyValueStore, theme: Theme) -> Result<(), TrainerError> {
    store.set(THEME_KEY, theme.as_str())
}

pub fn study_session_key(id: &uuid::Uuid) -> String {
    format!("{STUDY_SESSION_PREFIX}{id}")
}
