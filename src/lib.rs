//! # bolt-web
//!
//! Leptos + WASM client for the TelegrammBolt web panel. Runs on top of
//! server-rendered pages: wraps the REST API with a loading overlay and toast
//! feedback, formats timestamps, drives the chat panel, triggers report
//! exports and wires page-level behaviour.
//!
//! Browser-only code sits behind the `csr` feature; without it every seam is a
//! no-op so the crate builds and tests natively.

pub mod app;
pub mod bridge;
pub mod components;
pub mod config;
pub mod net;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_support;

/// WASM entry point: install logging, build services, expose `window.bolt`
/// and mount the chrome.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    use leptos::prelude::*;

    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::warn!("console logger already installed: {e}");
    }

    let config = config::ClientConfig::from_document();
    log::info!("bolt-web starting, api base {:?}", config.api_base);
    let services = app::Services::new(config);
    bridge::expose(&services);
    leptos::mount::mount_to_body(move || view! { <app::App services/> });
}
