pub mod audio;
pub mod components;
pub mod config;
pub mod cookies;
pub mod session;
pub mod state;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Audio denoiser using {}", config::endpoint());

    leptos::mount::mount_to_body(components::app::App);
}
