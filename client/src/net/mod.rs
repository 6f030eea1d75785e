//! Networking for the REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` provides the browser transport and endpoint paths; authentication
//! policy lives in the `session` crate and wraps this transport.

pub mod api;
