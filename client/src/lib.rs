//! # client
//!
//! Leptos + WASM frontend for the Forgeboard CI dashboard.
//!
//! This crate contains pages, application state, network types, and the
//! websocket channel client that keeps every view synchronized with the CI
//! server's push protocol: a snapshot on subscribe, then ordered incremental
//! events, with automatic reconnection.

pub mod app;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: install the panic hook and logger, then mount the
/// application.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(app::App);
}
