//! Browser bindings for the session core.
//!
//! `storage` is the `localStorage` backend of the session store.
//! `navigation` reads the current path and performs the sign-out redirect.
//! `auth` holds the location and error-text helpers shared by pages.

pub mod auth;
pub mod navigation;
pub mod storage;
