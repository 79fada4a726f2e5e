use leptos::html::Audio;
use leptos::prelude::*;
use denoiser_core::Stream;
use crate::session;
use crate::state::AppState;

/// `<audio>` element for one stream. Registers itself with the session once
/// mounted; native control events are folded back into the session.
#[component]
pub fn AudioPlayer(stream: Stream, generation: u64) -> impl IntoView {
    let state = expect_context::<AppState>();
    let node_ref = NodeRef::<Audio>::new();

    Effect::new(move |_| {
        if let Some(element) = node_ref.get() {
            session::attach(state, stream, element);
        }
    });

    let info = move || state.info(stream).get().map(|i| i.describe());

    view! {
        <audio
            node_ref=node_ref
            controls=true
            data-generation=generation.to_string()
            src=move || state.url(stream).get()
            on:play=move |_| session::sync(state, stream)
            on:pause=move |_| session::sync(state, stream)
            on:ended=move |_| session::sync(state, stream)
        >
            "Your browser does not support the audio element."
        </audio>
        <div class="audio-info">{info}</div>
    }
}

#[component]
pub fn PlayToggle(stream: Stream) -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <button
            class="play-button"
            on:click=move |_| session::toggle(state, stream)
        >
            {move || state.playback(stream).get().button_label()}
        </button>
    }
}
