//! Session provider: login, logout and the authentication queries the UI uses.
//!
//! SYSTEM CONTEXT
//! ==============
//! The provider is installed once per application instance. `initialize()`
//! runs at startup and is a local storage read, not a network call. Login
//! delegates the credential exchange to an [`AuthService`] and only touches
//! session state once the exchange succeeded.

#![allow(async_fn_in_trait)]

#[cfg(test)]
#[path = "provider_test.rs"]
mod provider_test;

use serde::{Deserialize, Serialize};

use crate::authenticator::{ApiRequest, Transport, TransportError, error_message};
use crate::model::{Session, SessionCell, SessionHandle, SessionState, User};
use crate::role::{Role, UnknownRole};
use crate::store::{KeyValueStore, StoreError};

pub const LOGIN_ENDPOINT: &str = "/auth/login";

/// Reply of the backend's login endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginGrant {
    pub token: String,
    pub username: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Why a login attempt failed. Passed to the caller untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("login request failed: {0}")]
    Network(String),
    #[error("login rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("login response could not be decoded: {0}")]
    Decode(String),
    #[error("login response carried an empty token")]
    MissingToken,
    #[error(transparent)]
    UnknownRole(#[from] UnknownRole),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl From<TransportError> for AuthError {
    fn from(err: TransportError) -> Self {
        Self::Network(err.to_string())
    }
}

/// Credential exchange with the backend.
pub trait AuthService {
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] on rejected credentials and
    /// [`AuthError::Network`] when the backend cannot be reached.
    async fn login(&self, username: &str, password: &str) -> Result<LoginGrant, AuthError>;
}

/// [`AuthService`] that posts credentials to `/auth/login` over a [`Transport`].
///
/// The request is sent without a bearer token and bypasses the request
/// authenticator, so a rejected login never clears an existing session.
#[derive(Clone, Debug)]
pub struct HttpAuthService<T> {
    transport: T,
}

impl<T: Transport> HttpAuthService<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }
}

impl<T: Transport> AuthService for HttpAuthService<T> {
    async fn login(&self, username: &str, password: &str) -> Result<LoginGrant, AuthError> {
        let body = serde_json::to_value(LoginRequest { username, password })
            .map_err(|e| AuthError::Decode(e.to_string()))?;
        let response = self.transport.send(ApiRequest::post(LOGIN_ENDPOINT, body)).await?;
        match response.status {
            400 | 401 | 403 => Err(AuthError::InvalidCredentials),
            status if !response.is_success() => Err(AuthError::Rejected {
                status,
                message: error_message(&response),
            }),
            _ => response.json().map_err(|e| AuthError::Decode(e.to_string())),
        }
    }
}

/// Single source of truth for the current session.
#[derive(Clone, Debug)]
pub struct SessionProvider<S, C, A> {
    handle: SessionHandle<S, C>,
    auth: A,
}

impl<S, C, A> SessionProvider<S, C, A>
where
    S: KeyValueStore,
    C: SessionCell,
    A: AuthService,
{
    pub fn new(handle: SessionHandle<S, C>, auth: A) -> Self {
        Self { handle, auth }
    }

    pub fn handle(&self) -> &SessionHandle<S, C> {
        &self.handle
    }

    /// Restore the persisted session. Always ends the loading phase.
    pub fn initialize(&self) -> SessionState {
        let state = self.handle.restore();
        match state.user() {
            Some(user) => log::info!("restored session for {} ({})", user.username, user.role),
            None => log::debug!("no persisted session"),
        }
        state
    }

    /// Exchange credentials, persist the resulting session and publish it.
    ///
    /// # Errors
    ///
    /// Propagates the [`AuthService`] failure unchanged. Also fails when the
    /// backend returns an unknown role or an empty token, or when the session
    /// cannot be persisted; in all cases the current session is left as it was.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let grant = self.auth.login(username, password).await?;
        if grant.token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        let role: Role = grant.role.parse()?;
        let session = Session {
            token: grant.token,
            user: User { username: grant.username, role },
        };
        self.handle.establish(session.clone())?;
        log::info!("signed in as {} ({role})", session.user.username);
        Ok(session)
    }

    /// Forget the session. Calling it while signed out is harmless.
    pub fn logout(&self) {
        if let Some(user) = self.handle.state().user() {
            log::info!("signing out {}", user.username);
        }
        self.handle.invalidate();
    }

    pub fn state(&self) -> SessionState {
        self.handle.state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.handle.state().is_authenticated()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.handle.state().has_role(role)
    }

    pub fn user(&self) -> Option<User> {
        self.handle.state().user().cloned()
    }

    pub fn loading(&self) -> bool {
        self.handle.state().loading
    }
}
