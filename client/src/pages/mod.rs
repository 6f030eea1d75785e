//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates shared chrome and
//! guarding to `components`.

pub mod dashboard;
pub mod home;
pub mod login;
