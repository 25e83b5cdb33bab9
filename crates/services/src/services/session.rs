//! Bearer token handling. The token lives in local storage under `token`;
//! its presence is also what marks an admin session.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use secrecy::{ExposeSecret, SecretString};
use tracing::info;
use utils::storage::{LocalStorage, StorageError};

pub const TOKEN_KEY: &str = "token";

#[derive(Debug)]
pub struct Session {
    storage: Arc<LocalStorage>,
    override_token: RwLock<Option<SecretString>>,
}

impl Session {
    pub fn new(storage: Arc<LocalStorage>) -> Self {
        Self {
            storage,
            override_token: RwLock::new(None),
        }
    }

    /// A token given on the command line or environment wins over the stored one.
    pub fn with_override(storage: Arc<LocalStorage>, token: Option<String>) -> Self {
        let session = Self::new(storage);
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            *session.override_write() = Some(SecretString::from(token));
        }
        session
    }

    pub fn token(&self) -> Option<SecretString> {
        if let Some(token) = self.override_read().clone() {
            return Some(token);
        }
        self.storage
            .get::<String>(TOKEN_KEY)
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from)
    }

    pub fn is_admin(&self) -> bool {
        self.token().is_some()
    }

    pub fn set_token(&self, token: &SecretString) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, &token.expose_secret())
    }

    /// Forgets both the stored and the override token.
    pub fn clear(&self) -> Result<(), StorageError> {
        *self.override_write() = None;
        if self.storage.remove(TOKEN_KEY)? {
            info!("session token cleared");
        }
        Ok(())
    }

    fn override_read(&self) -> RwLockReadGuard<'_, Option<SecretString>> {
        self.override_token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn override_write(&self) -> RwLockWriteGuard<'_, Option<SecretString>> {
        self.override_token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
