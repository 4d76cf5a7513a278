//! # client
//!
//! Leptos + WASM frontend for the parley chat application.
//!
//! This crate contains pages, components, client state, store-facing
//! services, and the browser adapter for the hosted backend (REST tables,
//! password auth and realtime change feeds).

#![recursion_limit = "256"]
pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod services;
pub mod state;
pub mod util;

/// WASM entry point: install logging and hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    log::info!("parley client starting");
    leptos::mount::hydrate_body(app::App);
}
