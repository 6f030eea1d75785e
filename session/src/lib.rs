//! Session and access-control core for the ClinicSys front end.
//!
//! This crate owns the session model shared by `client` and `cli`. It knows
//! nothing about browsers or HTTP stacks: persistence, transport, navigation
//! and the in-memory session cell are traits implemented by each front end.
//!
//! ARCHITECTURE
//! ============
//! - `store` persists `{token, user}` under two keys and self-heals on corruption.
//! - `provider` is the single source of truth for login/logout and role checks.
//! - `authenticator` attaches bearer tokens and reacts to 401/403 replies.
//! - `guard` decides per navigation whether a protected view renders.

pub mod authenticator;
pub mod guard;
pub mod model;
pub mod provider;
pub mod role;
pub mod routes;
pub mod store;

pub use authenticator::{ApiError, ApiRequest, ApiResponse, Method, Navigator, RequestAuthenticator, Transport, TransportError};
pub use guard::{GuardDecision, ProtectedRoute, RoleRequirement};
pub use model::{Session, SessionCell, SessionHandle, SessionState, SharedSession, User};
pub use provider::{AuthError, AuthService, HttpAuthService, LoginGrant, SessionProvider};
pub use role::{Role, UnknownRole};
pub use store::{KeyValueStore, MemoryStore, SessionStore, StoreError};
