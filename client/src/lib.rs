//! # client
//!
//! Leptos + WASM front end for the ClinicSys administration dashboards.
//!
//! The crate wires the platform-neutral `session` core to the browser:
//! `localStorage` persistence, `gloo-net` HTTP, reactive session context,
//! route guarding, the login page and the per-role dashboards.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("console logger unavailable: {err}").into());
    }
    leptos::mount::hydrate_body(app::App);
}
