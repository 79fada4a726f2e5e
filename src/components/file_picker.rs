use leptos::prelude::*;
use wasm_bindgen::JsCast;
use denoiser_core::is_accepted_file_name;
use crate::session;
use crate::state::AppState;

#[component]
pub fn FilePicker() -> impl IntoView {
    let state = expect_context::<AppState>();

    let on_change = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(file) = input.files().and_then(|list| list.get(0)) else {
            return;
        };
        // Without this, picking the same file again fires no change event
        input.set_value("");
        if !is_accepted_file_name(&file.name()) {
            log::warn!("Ignoring {}: only .wav files are accepted", file.name());
            return;
        }
        wasm_bindgen_futures::spawn_local(async move {
            session::select_file(state, file).await;
        });
    };

    view! {
        <input type="file" accept=".wav" on:change=on_change />
    }
}
