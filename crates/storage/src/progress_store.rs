use std::sync::Arc;

use trainer_core::model::ProgressState;

use crate::repository::{KeyValueStore, StorageError};

/// Key the progress blob is stored under. Kept from earlier versions so
/// existing data stays loadable.
pub const PROGRESS_KEY: &str = "telc_b1_progress";

/// Key of the show-translations preference flag (`"1"` / `"0"`).
pub const TRANSLATION_PREF_KEY: &str = "telc_b1_show_translation";

/// Repository for the persisted `ProgressState` blob and the translation
/// preference flag.
///
/// Loading never fails: missing or corrupt data degrades to the default
/// state, with the corruption surfaced through the logger.
#[derive(Clone)]
pub struct ProgressRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ProgressRepository {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the progress state, falling back to defaults on missing or
    /// corrupt data.
    #[must_use]
    pub fn load(&self) -> ProgressState {
        let raw = match self.store.get(PROGRESS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return ProgressState::default(),
            Err(err) => {
                log::warn!("failed to read progress blob, starting fresh: {err}");
                return ProgressState::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(err) => {
                log::warn!("corrupt progress blob, starting fresh: {err}");
                ProgressState::default()
            }
        }
    }

    /// Persist the progress state synchronously.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the backend write fails;
    /// the failure is also logged, since callers on accrual paths may drop
    /// the result.
    pub fn save(&self, progress: &ProgressState) -> Result<(), StorageError> {
        let blob = serde_json::to_string(progress)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(PROGRESS_KEY, &blob).inspect_err(|err| {
            log::error!("failed to persist progress: {err}");
        })
    }

    /// Whether option translations are enabled. Missing or unreadable flags
    /// default to off.
    #[must_use]
    pub fn translation_enabled(&self) -> bool {
        matches!(
            self.store.get(TRANSLATION_PREF_KEY),
            Ok(Some(flag)) if flag == "1"
        )
    }

    /// Persist the translation preference flag.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend write fails.
    pub fn set_translation_enabled(&self, enabled: bool) -> Result<(), StorageError> {
        self.store
            .set(TRANSLATION_PREF_KEY, if enabled { "1" } else { "0" })
    }
}
