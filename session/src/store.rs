//! Durable key-value persistence for the session.
//!
//! Two keys are used: the raw token and a JSON `{username, role}` record.
//! Anything short of both keys holding valid data reads back as "signed out",
//! and the leftovers are removed so a corrupt entry cannot fail repeatedly.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::model::{Session, User};

pub const TOKEN_KEY: &str = "clinicSysToken";
pub const USER_KEY: &str = "clinicSysUser";

/// Error returned by [`KeyValueStore`] writes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backing storage cannot be reached at all (no window, no file system access).
    #[error("session storage unavailable: {0}")]
    Unavailable(String),
    /// A single key could not be written or removed.
    #[error("failed to write `{key}`: {message}")]
    Write { key: String, message: String },
    /// The user record could not be serialized.
    #[error("failed to encode session: {0}")]
    Encode(String),
}

/// Minimal string storage the session is persisted into.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns an error when the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error when the key cannot be removed.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-process store, shared between clones.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).remove(key);
        Ok(())
    }
}

/// Session persistence on top of any [`KeyValueStore`].
#[derive(Clone, Debug, Default)]
pub struct SessionStore<S> {
    backend: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Write token and user. On a failed second write the first is rolled
    /// back, so readers never see one key without the other.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered.
    pub fn save(&self, session: &Session) -> Result<(), StoreError> {
        let user = serde_json::to_string(&session.user).map_err(|e| StoreError::Encode(e.to_string()))?;
        self.backend.set(USER_KEY, &user)?;
        if let Err(err) = self.backend.set(TOKEN_KEY, &session.token) {
            self.discard("rolling back partial save");
            return Err(err);
        }
        Ok(())
    }

    /// Read the persisted session, clearing any partial or corrupt data.
    pub fn load(&self) -> Option<Session> {
        let token = self.backend.get(TOKEN_KEY).filter(|token| !token.is_empty());
        let user = self.backend.get(USER_KEY);
        match (token, user) {
            (Some(token), Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(Session { token, user }),
                Err(err) => {
                    log::warn!("stored user record is corrupt: {err}");
                    self.discard("corrupt user record");
                    None
                }
            },
            (None, None) => None,
            _ => {
                log::warn!("stored session is incomplete");
                self.discard("incomplete session");
                None
            }
        }
    }

    /// Remove both keys. Both removals are attempted even if the first fails.
    ///
    /// # Errors
    ///
    /// Returns the first removal error.
    pub fn clear(&self) -> Result<(), StoreError> {
        let token = self.backend.remove(TOKEN_KEY);
        let user = self.backend.remove(USER_KEY);
        token.and(user)
    }

    fn discard(&self, reason: &str) {
        if let Err(err) = self.clear() {
            log::warn!("{reason}: failed to clear session storage: {err}");
        }
    }
}
