use leptos::prelude::*;
use denoiser_core::{RequestState, Stream};
use crate::components::file_picker::FilePicker;
use crate::components::player::{AudioPlayer, PlayToggle};
use crate::session;
use crate::state::AppState;

#[component]
pub fn App() -> impl IntoView {
    let state = AppState::new();
    provide_context(state);

    view! {
        <div class="audio-interface-container">
            <div class="header-container">
                <h2 class="audio-denoiser-header">"Audio Denoiser"</h2>
            </div>
            <FilePicker />
            <MainArea />
        </div>
    }
}

#[component]
fn MainArea() -> impl IntoView {
    let state = expect_context::<AppState>();
    let has_file = move || state.file_name.get().is_some();
    let has_result = move || state.output_url.get().is_some();

    view! {
        <div class="main">
            {move || has_file().then(|| view! { <InputSection /> })}
            {move || state.is_loading().then(|| view! {
                <p class="status">"Processing..."</p>
            })}
            {move || state.error_message.get().map(|msg| view! {
                <p class="status error">{msg}</p>
            })}
            {move || state.client_error.get().map(|msg| view! {
                <p class="status error">{msg}</p>
            })}
            {move || has_result().then(|| view! { <OutputSection /> })}
        </div>
    }
}

#[component]
fn InputSection() -> impl IntoView {
    let state = expect_context::<AppState>();
    let submit_disabled = move || {
        state.file_name.get().is_none() || state.request_state.get() == RequestState::Loading
    };

    view! {
        <div class="audio-player">
            // A new generation rebuilds the element, even for the same file
            {move || {
                let generation = state.generation.get();
                view! { <AudioPlayer stream=Stream::Input generation=generation /> }
            }}
            <div class="audio-control-container">
                <PlayToggle stream=Stream::Input />
                <button
                    class="submit-button"
                    disabled=submit_disabled
                    on:click=move |_| session::submit(state)
                >
                    "Submit"
                </button>
            </div>
        </div>
    }
}

#[component]
fn OutputSection() -> impl IntoView {
    let state = expect_context::<AppState>();
    let download_name = move || {
        state.output_name.get().unwrap_or_else(|| "denoised.wav".to_string())
    };

    view! {
        <div class="audio-player">
            <AudioPlayer stream=Stream::Output generation=state.generation.get_untracked() />
            <div class="audio-control-container">
                <PlayToggle stream=Stream::Output />
                <a
                    class="download-link"
                    href=move || state.output_url.get()
                    download=download_name
                >
                    "Download"
                </a>
            </div>
        </div>
    }
}
