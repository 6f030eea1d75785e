//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` installs one [`SessionContext`] for the whole tree. Route guards,
//! the login page and dashboards read it through [`use_session`], which panics
//! when called outside the provider so a missing provider is caught at once
//! instead of silently rendering a signed-out UI.
//!
//! The in-memory session lives in an `RwSignal`, so every view that reads
//! [`SessionContext::state`] re-renders when the session changes.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use session::{
    AuthError, HttpAuthService, RequestAuthenticator, Role, Session, SessionCell, SessionHandle, SessionProvider,
    SessionState, SessionStore, User,
};

use crate::net::api::BrowserTransport;
use crate::util::navigation::BrowserNavigator;
use crate::util::storage::LocalStorage;

/// [`SessionCell`] backed by a reactive signal.
#[derive(Clone, Copy, Debug)]
pub struct SignalCell(RwSignal<SessionState>);

impl SignalCell {
    pub fn new(signal: RwSignal<SessionState>) -> Self {
        Self(signal)
    }

    pub fn signal(&self) -> RwSignal<SessionState> {
        self.0
    }
}

impl SessionCell for SignalCell {
    fn get(&self) -> SessionState {
        self.0.get()
    }

    fn set(&self, state: SessionState) {
        self.0.set(state);
    }
}

pub type ClientProvider = SessionProvider<LocalStorage, SignalCell, HttpAuthService<BrowserTransport>>;
pub type ClientApi = RequestAuthenticator<BrowserTransport, LocalStorage, SignalCell, BrowserNavigator>;

/// Session provider plus the authenticated API client that shares its state.
#[derive(Clone, Debug)]
pub struct SessionContext {
    provider: ClientProvider,
    api: ClientApi,
    state: RwSignal<SessionState>,
}

impl SessionContext {
    fn new(state: RwSignal<SessionState>) -> Self {
        let handle = SessionHandle::new(SessionStore::new(LocalStorage), SignalCell::new(state));
        let transport = BrowserTransport::default();
        Self {
            provider: SessionProvider::new(handle.clone(), HttpAuthService::new(transport)),
            api: RequestAuthenticator::new(transport, handle, BrowserNavigator),
            state,
        }
    }

    /// Read-only signal for use inside `move` closures.
    pub fn state_signal(&self) -> ReadSignal<SessionState> {
        self.state.read_only()
    }

    /// Tracked read of the current state.
    pub fn state(&self) -> SessionState {
        self.provider.state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.provider.is_authenticated()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.provider.has_role(role)
    }

    pub fn user(&self) -> Option<User> {
        self.provider.user()
    }

    pub fn loading(&self) -> bool {
        self.provider.loading()
    }

    pub fn initialize(&self) -> SessionState {
        self.provider.initialize()
    }

    /// # Errors
    ///
    /// Propagates [`AuthError`] from the login exchange unchanged.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        self.provider.login(username, password).await
    }

    pub fn logout(&self) {
        self.provider.logout();
    }

    /// Authenticated client for backend calls.
    pub fn api(&self) -> &ClientApi {
        &self.api
    }
}

/// Create the session context, expose it to descendants and schedule the
/// one-time restore from `localStorage` after hydration.
pub fn provide_session() -> SessionContext {
    let ctx = SessionContext::new(RwSignal::new(SessionState::restoring()));
    provide_context(ctx.clone());

    let restore = ctx.clone();
    Effect::new(move || {
        untrack(|| restore.initialize());
    });
    ctx
}

/// The session context installed by [`provide_session`].
///
/// # Panics
///
/// Panics when no ancestor called [`provide_session`].
pub fn use_session() -> SessionContext {
    expect_context::<SessionContext>()
}
