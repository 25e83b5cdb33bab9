//! UI preferences persisted in local storage and published to subscribers.

use std::{sync::Arc, time::Duration};

use tokio::sync::watch;
use tracing::debug;
use utils::storage::{LocalStorage, StorageError};

pub const DARK_MODE_KEY: &str = "darkMode";
pub const PROMO_MODAL_KEY: &str = "asesoriaModalLastClosed";

/// Dark-mode preference. Every component holding a receiver from
/// [`PreferenceStore::subscribe`] observes changes as they happen.
#[derive(Debug)]
pub struct PreferenceStore {
    storage: Arc<LocalStorage>,
    dark_mode: watch::Sender<bool>,
}

impl PreferenceStore {
    pub fn load(storage: Arc<LocalStorage>) -> Self {
        let initial = storage.get::<bool>(DARK_MODE_KEY).unwrap_or(false);
        let (dark_mode, _) = watch::channel(initial);
        Self { storage, dark_mode }
    }

    pub fn dark_mode(&self) -> bool {
        *self.dark_mode.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.dark_mode.subscribe()
    }

    /// Persists first, then notifies subscribers only when the value changed.
    pub fn set_dark_mode(&self, enabled: bool) -> Result<(), StorageError> {
        self.storage.set(DARK_MODE_KEY, &enabled)?;
        let changed = self.dark_mode.send_if_modified(|current| {
            let changed = *current != enabled;
            *current = enabled;
            changed
        });
        debug!(enabled, changed, "dark mode preference updated");
        Ok(())
    }

    pub fn toggle_dark_mode(&self) -> Result<bool, StorageError> {
        let enabled = !self.dark_mode();
        self.set_dark_mode(enabled)?;
        Ok(enabled)
    }
}

/// Throttles the promotional "asesoría" modal: it reappears only once the
/// interval has passed since the user last closed it.
#[derive(Debug)]
pub struct ModalThrottle {
    storage: Arc<LocalStorage>,
    interval: Duration,
}

impl ModalThrottle {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

    pub fn new(storage: Arc<LocalStorage>) -> Self {
        Self::with_interval(storage, Self::DEFAULT_INTERVAL)
    }

    pub fn with_interval(storage: Arc<LocalStorage>, interval: Duration) -> Self {
        Self { storage, interval }
    }

    pub fn should_show(&self, now_ms: i64) -> bool {
        match self.storage.get::<i64>(PROMO_MODAL_KEY) {
            None => true,
            Some(closed_at) => {
                now_ms.saturating_sub(closed_at) >= self.interval.as_millis() as i64
            }
        }
    }

    pub fn mark_closed(&self, now_ms: i64) -> Result<(), StorageError> {
        self.storage.set(PROMO_MODAL_KEY, &now_ms)
    }
}
