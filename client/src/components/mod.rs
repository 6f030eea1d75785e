//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the session through `state::auth::use_session` and never
//! hold a copy of it.

pub mod logout_button;
pub mod protected_route;
