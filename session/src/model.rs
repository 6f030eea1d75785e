//! Session model and the handle that keeps persisted and in-memory state in step.
//!
//! DESIGN
//! ======
//! The persisted copy lives in a [`SessionStore`]; the in-memory copy lives in
//! a [`SessionCell`] so a UI can back it with a reactive signal while the cli
//! and tests use [`SharedSession`]. [`SessionHandle`] is the only type that
//! writes either copy, and it always writes the store first.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::role::Role;
use crate::store::{KeyValueStore, SessionStore, StoreError};

/// Identity persisted next to the token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub role: Role,
}

/// Bearer token and the user it was issued to. Never exists half-populated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// What the rest of the application observes about the current session.
///
/// `loading` is `true` only until the first restore from storage finishes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub session: Option<Session>,
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::restoring()
    }
}

impl SessionState {
    /// State before `initialize()` has read storage.
    #[must_use]
    pub fn restoring() -> Self {
        Self { session: None, loading: true }
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self { session: None, loading: false }
    }

    #[must_use]
    pub fn signed_in(session: Session) -> Self {
        Self { session: Some(session), loading: false }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Exact role match; `false` whenever no session is active.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.user().is_some_and(|user| user.role == role)
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|session| &session.user)
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.token.as_str())
    }
}

/// Holder for the in-memory session state.
pub trait SessionCell {
    fn get(&self) -> SessionState;
    fn set(&self, state: SessionState);
}

/// Thread-safe cell for native front ends and tests.
#[derive(Clone, Debug, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<SessionState>>,
}

impl SessionCell for SharedSession {
    fn get(&self) -> SessionState {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set(&self, state: SessionState) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

/// Pairs the persisted store with the in-memory cell.
#[derive(Clone, Debug)]
pub struct SessionHandle<S, C> {
    store: SessionStore<S>,
    cell: C,
}

impl<S: KeyValueStore, C: SessionCell> SessionHandle<S, C> {
    pub fn new(store: SessionStore<S>, cell: C) -> Self {
        Self { store, cell }
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    pub fn cell(&self) -> &C {
        &self.cell
    }

    pub fn state(&self) -> SessionState {
        self.cell.get()
    }

    /// Populate the cell from storage and finish the loading phase.
    pub fn restore(&self) -> SessionState {
        let state = match self.store.load() {
            Some(session) => SessionState::signed_in(session),
            None => SessionState::signed_out(),
        };
        self.cell.set(state.clone());
        state
    }

    /// Persist `session` and publish it.
    ///
    /// A failed write rolls storage back to the previously persisted session.
    /// If that cannot be rewritten either, the cell is signed out so memory
    /// never claims a session storage does not hold.
    ///
    /// # Errors
    ///
    /// Returns the storage error when either key cannot be written.
    pub fn establish(&self, session: Session) -> Result<(), StoreError> {
        let previous = self.store.load();
        if let Err(err) = self.store.save(&session) {
            self.reinstate(previous);
            return Err(err);
        }
        self.cell.set(SessionState::signed_in(session));
        Ok(())
    }

    fn reinstate(&self, previous: Option<Session>) {
        let Some(previous) = previous else {
            if self.cell.get().is_authenticated() {
                self.cell.set(SessionState::signed_out());
            }
            return;
        };
        match self.store.save(&previous) {
            Ok(()) => self.cell.set(SessionState::signed_in(previous)),
            Err(err) => {
                log::warn!("could not restore previous session after failed save: {err}");
                self.cell.set(SessionState::signed_out());
            }
        }
    }

    /// Drop the session from both storage and memory.
    pub fn invalidate(&self) {
        if let Err(err) = self.store.clear() {
            log::warn!("failed to clear persisted session: {err}");
        }
        self.cell.set(SessionState::signed_out());
    }

    /// Token currently persisted, read fresh on every call.
    pub fn stored_token(&self) -> Option<String> {
        self.store.load().map(|session| session.token)
    }
}
