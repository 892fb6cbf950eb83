//! Application state: case repository, persistent store, tunables, and live sessions.
//!
//! This module owns:
//!   - the read-only case repository (config bank first, then built-in seeds)
//!   - the injected key-value store (file-backed unless configured in-memory)
//!   - Study sessions (mirrored to the store so they survive a restart)
//!   - Versus sessions (memory only; the countdown makes them short-lived)

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::{load_config_from_env, TrainerConfig};
use crate::error::TrainerError;
use crate::repository::CaseRepository;
use crate::seeds::{seed_cases, seed_rubrics};
use crate::session::study::StudySession;
use crate::session::versus::VersusSession;
use crate::store::{load_currency, load_player_names, study_session_key, FileStore, KeyValueStore, MemoryStore};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<CaseRepository>,
    pub store: Arc<dyn KeyValueStore>,
    pub config: TrainerConfig,
    pub study: Arc<RwLock<HashMap<Uuid, StudySession>>>,
    pub versus: Arc<RwLock<HashMap<Uuid, VersusSession>>>,
}

impl AppState {
    /// Build state from env: load config, open the store, merge the case bank with seeds.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let config = load_config_from_env().unwrap_or_default();
        let store: Arc<dyn KeyValueStore> = if config.storage.in_memory() {
            info!(target: "trainer_backend", "Storage path empty; using in-memory store");
            Arc::new(MemoryStore::new())
        } else {
            let fs = FileStore::open(config.storage.path.clone());
            info!(target: "trainer_backend", path = %fs.path().display(), "Using file-backed store");
            Arc::new(fs)
        };
        Self::with_parts(config, store)
    }

    /// Build state from explicit parts. Config-bank cases win over seeds with the same id.
    pub fn with_parts(config: TrainerConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let (mut cases, bank_rubrics) = config.bank();
        let from_bank = cases.len();
        cases.extend(seed_cases());

        let mut rubrics = seed_rubrics();
        rubrics.extend(bank_rubrics);

        let repo = CaseRepository::new(cases, rubrics);
        if repo.is_empty() {
            error!(target: "trainer_backend", "No valid cases available; sessions cannot be started");
        }
        info!(
            target: "trainer_backend",
            from_bank,
            total = repo.len(),
            starting_currency = config.study.starting_currency,
            turn_seconds = config.versus.turn_seconds,
            "Startup case inventory"
        );

        Self {
            repo: Arc::new(repo),
            store,
            config,
            study: Arc::new(RwLock::new(HashMap::new())),
            versus: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn ensure_cases(&self) -> Result<(), TrainerError> {
        if self.repo.is_empty() {
            return Err(TrainerError::EmptyRepository);
        }
        Ok(())
    }

    /// Store write on the blocking pool; `FileStore` rewrites its file on every change.
    async fn store_set(&self, key: String, value: String) -> Result<(), TrainerError> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.set(&key, &value))
            .await
            .map_err(|e| TrainerError::StoreIo(std::io::Error::new(std::io::ErrorKind::Other, e)))?
    }

    async fn store_remove(&self, key: String) -> Result<(), TrainerError> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.remove(&key))
            .await
            .map_err(|e| TrainerError::StoreIo(std::io::Error::new(std::io::ErrorKind::Other, e)))?
    }

    /// Mirror a serialized session to the store. Failures are logged; the live session stays valid.
    async fn persist_study(&self, id: Uuid, encoded: Result<String, serde_json::Error>) {
        let written = match encoded {
            Ok(raw) => self.store_set(study_session_key(&id), raw).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = written {
            warn!(target: "study", %id, error = %e, "Failed to persist study session");
        }
    }

    fn restore_study(&self, id: Uuid) -> Option<StudySession> {
        let raw = self.store.get(&study_session_key(&id))?;
        match serde_json::from_str::<StudySession>(&raw) {
            Ok(session) => {
                info!(target: "study", %id, "Restored study session from store");
                Some(session)
            }
            Err(e) => {
                warn!(target: "study", %id, error = %e, "Stored study session is corrupted; ignoring");
                None
            }
        }
    }

    /// Start a Study session with the persisted currency (or the configured default).
    #[instrument(level = "info", skip(self))]
    pub async fn create_study(&self) -> Result<StudySession, TrainerError> {
        self.ensure_cases()?;
        let currency = load_currency(self.store.as_ref(), self.config.study.starting_currency);
        let session = StudySession::new(Uuid::new_v4(), self.repo.len(), currency);
        self.persist_study(session.id, serde_json::to_string(&session)).await;
        self.study.write().await.insert(session.id, session.clone());
        info!(target: "study", id = %session.id, currency, cases = self.repo.len(), "Study session created");
        Ok(session)
    }

    /// Snapshot of a Study session, falling back to the store for sessions from a previous run.
    pub async fn study_session(&self, id: Uuid) -> Result<StudySession, TrainerError> {
        if let Some(s) = self.study.read().await.get(&id).cloned() {
            return Ok(s);
        }
        let restored = self.restore_study(id).ok_or(TrainerError::UnknownSession(id))?;
        self.study.write().await.entry(id).or_insert_with(|| restored.clone());
        Ok(restored)
    }

    /// Run `f` against a Study session under the write lock. On success the session is
    /// serialized under the lock and written to the store after the lock is released.
    pub async fn update_study<T, F>(&self, id: Uuid, f: F) -> Result<T, TrainerError>
    where
        F: FnOnce(&mut StudySession, &CaseRepository) -> Result<T, TrainerError>,
    {
        let (out, encoded) = {
            let mut sessions = self.study.write().await;
            if !sessions.contains_key(&id) {
                let restored = self.restore_study(id).ok_or(TrainerError::UnknownSession(id))?;
                sessions.insert(id, restored);
            }
            let session = sessions.get_mut(&id).ok_or(TrainerError::UnknownSession(id))?;
            let out = f(&mut *session, self.repo.as_ref())?;
            (out, serde_json::to_string(&*session))
        };
        self.persist_study(id, encoded).await;
        Ok(out)
    }

    /// Drop a Study session from memory and from the store.
    #[instrument(level = "info", skip(self))]
    pub async fn remove_study(&self, id: Uuid) -> Result<(), TrainerError> {
        let key = study_session_key(&id);
        let in_memory = self.study.write().await.remove(&id).is_some();
        let stored = self.store.get(&key).is_some();
        if !in_memory && !stored {
            return Err(TrainerError::UnknownSession(id));
        }
        if stored {
            self.store_remove(key).await?;
        }
        info!(target: "study", %id, "Study session removed");
        Ok(())
    }

    /// Start a Versus session with player names from the store.
    #[instrument(level = "info", skip(self))]
    pub async fn create_versus(&self) -> Result<VersusSession, TrainerError> {
        self.ensure_cases()?;
        let names = load_player_names(self.store.as_ref());
        let session = VersusSession::new(Uuid::new_v4(), self.config.versus.turn_seconds, names);
        self.versus.write().await.insert(session.id, session.clone());
        info!(target: "versus", id = %session.id, turn_seconds = session.turn_seconds(), "Versus session created");
        Ok(session)
    }

    pub async fn versus_session(&self, id: Uuid) -> Result<VersusSession, TrainerError> {
        self.versus.read().await.get(&id).cloned().ok_or(TrainerError::UnknownSession(id))
    }

    /// Drop a Versus session. Its countdown task, if any, stops on the next tick.
    #[instrument(level = "info", skip(self))]
    pub async fn remove_versus(&self, id: Uuid) -> Result<(), TrainerError> {
        self.versus.write().await.remove(&id).ok_or(TrainerError::UnknownSession(id))?;
        info!(target: "versus", %id, "Versus session removed");
        Ok(())
    }

    /// Run `f` against a Versus session under the write lock.
    pub async fn update_versus<T, F>(&self, id: Uuid, f: F) -> Result<T, TrainerError>
    where
        F: FnOnce(&mut VersusSession, &CaseRepository) -> Result<T, TrainerError>,
    {
        let mut sessions = self.versus.write().await;
        let session = sessions.get_mut(&id).ok_or(TrainerError::UnknownSession(id))?;
        f(session, self.repo.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::store::{save_currency, CURRENCY_KEY};

    fn state_with(store: Arc<dyn KeyValueStore>) -> AppState {
        AppState::with_parts(TrainerConfig::default(), store)
    }

    #[tokio::test]
    async fn study_session_starts_with_stored_currency() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        save_currency(store.as_ref(), 17).unwrap();
        let state = state_with(store);
        let s = state.create_study().await.unwrap();
        assert_eq!(s.currency(), 17);
        assert_eq!(s.total_cases(), state.repo.len());
    }

    #[tokio::test]
    async fn study_session_survives_a_fresh_state() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let first = state_with(store.clone());
        let id = first.create_study().await.unwrap().id;
        let first_option = first.repo.cycled(0).unwrap().options[0].id.clone();
        first.update_study(id, |s, repo| s.select(repo, &first_option)).await.unwrap();

        let second = state_with(store);
        let restored = second.study_session(id).await.unwrap();
        assert_eq!(restored.selected_id(), Some(first_option.as_str()));
    }

    /// Records whether the Study map was locked while the store was written.
    #[derive(Default)]
    struct LockAwareStore {
        inner: MemoryStore,
        sessions: std::sync::OnceLock<Arc<RwLock<HashMap<Uuid, StudySession>>>>,
        written_under_lock: std::sync::atomic::AtomicBool,
    }

    impl KeyValueStore for LockAwareStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), TrainerError> {
            if let Some(sessions) = self.sessions.get() {
                if sessions.try_write().is_err() {
                    self.written_under_lock.store(true, std::sync::atomic::Ordering::SeqCst);
                }
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), TrainerError> {
            self.inner.remove(key)
        }
    }

    #[tokio::test]
    async fn study_writes_happen_outside_the_session_lock() {
        let store = Arc::new(LockAwareStore::default());
        let state = state_with(store.clone());
        let _ = store.sessions.set(state.study.clone());

        let id = state.create_study().await.unwrap().id;
        let first_option = state.repo.cycled(0).unwrap().options[0].id.clone();
        state.update_study(id, |s, repo| s.select(repo, &first_option)).await.unwrap();

        assert!(!store.written_under_lock.load(std::sync::atomic::Ordering::SeqCst));
        let restored = state_with(store).study_session(id).await.unwrap();
        assert_eq!(restored.selected_id(), Some(first_option.as_str()));
    }

    #[tokio::test]
    async fn corrupted_study_snapshot_is_unknown() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let id = Uuid::new_v4();
        store.set(&study_session_key(&id), "{broken").unwrap();
        let state = state_with(store);
        assert!(matches!(state.study_session(id).await, Err(TrainerError::UnknownSession(_))));
    }

    #[tokio::test]
    async fn failed_update_leaves_session_untouched() {
        let state = state_with(Arc::new(MemoryStore::new()));
        let id = state.create_study().await.unwrap().id;
        let err = state.update_study(id, |s, repo| s.lock(repo, 200)).await.unwrap_err();
        assert!(matches!(err, TrainerError::SelectionRequired));
        assert!(state.study_session(id).await.unwrap().last_snapshot().is_none());
    }

    #[tokio::test]
    async fn config_bank_overrides_seed_with_same_id() {
        let raw = r#"
[[cases]]
id = 1
patient_stem_short = "Override"
correct_option_id = "A"
options = [{ id = "A", label = "One" }, { id = "B", label = "Two" }, { id = "C", label = "Three" }]
[cases.metrics]
a1c = "7.0%"
egfr = "90 mL/min"
bmi = "25 kg/m²"
"#;
        let state = AppState::with_parts(parse_config(raw).unwrap(), Arc::new(MemoryStore::new()));
        assert_eq!(state.repo.get(1).unwrap().patient_stem_short, "Override");
        assert_eq!(state.repo.cases()[0].id, 1);
        assert!(state.store.get(CURRENCY_KEY).is_none());
    }

    #[tokio::test]
    async fn removed_study_session_is_gone_from_memory_and_store() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let state = state_with(store.clone());
        let id = state.create_study().await.unwrap().id;
        assert!(store.get(&study_session_key(&id)).is_some());

        state.remove_study(id).await.unwrap();
        assert!(store.get(&study_session_key(&id)).is_none());
        assert!(state.study.read().await.is_empty());
        assert!(matches!(state.study_session(id).await, Err(TrainerError::UnknownSession(_))));
        assert!(matches!(state.remove_study(id).await, Err(TrainerError::UnknownSession(_))));
    }

    #[tokio::test]
    async fn removing_versus_twice_is_unknown() {
        let state = state_with(Arc::new(MemoryStore::new()));
        let id = state.create_versus().await.unwrap().id;
        state.remove_versus(id).await.unwrap();
        assert!(matches!(state.remove_versus(id).await, Err(TrainerError::UnknownSession(_))));
    }

    #[tokio::test]
    async fn versus_names_come_from_store() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set(crate::store::PLAYER_A_NAME_KEY, "Ana").unwrap();
        let state = state_with(store);
        let v = state.create_versus().await.unwrap();
        assert_eq!(v.players()[0].name, "Ana");
        assert_eq!(v.players()[1].name, "");
        assert_eq!(v.turn_seconds(), 60);
    }
}
