//! Glue between the browser and the denoise session.
//!
//! The session and the blob URLs it hands to `<audio>` elements are not
//! `Send`, so they live in thread-locals; `AppState` signals mirror what the
//! view needs and are refreshed by [`publish`] after every transition.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use leptos::prelude::*;
use wasm_bindgen_futures::JsFuture;
use denoiser_client::{ClientConfig, DenoiseClient};
use denoiser_core::{Completion, DenoiseSession, DenoiseTransport, Stream};
use crate::audio::media::AudioElement;
use crate::audio::object_url::ObjectUrl;
use crate::audio::wav_info;
use crate::config;
use crate::cookies::DocumentCookies;
use crate::state::AppState;

thread_local! {
    static SESSION: RefCell<DenoiseSession<AudioElement>> = RefCell::new(DenoiseSession::new());
    static OBJECT_URLS: RefCell<HashMap<Stream, ObjectUrl>> = RefCell::new(HashMap::new());
    static PICKS: Cell<u64> = const { Cell::new(0) };
}

fn with_session<R>(f: impl FnOnce(&mut DenoiseSession<AudioElement>) -> R) -> R {
    SESSION.with(|s| f(&mut s.borrow_mut()))
}

/// Install (or with `None`, revoke) the blob URL for a stream and mirror it
/// into the view.
fn set_object_url(state: AppState, stream: Stream, url: Option<ObjectUrl>) {
    let href = url.as_ref().map(|u| u.href().to_string());
    OBJECT_URLS.with(|urls| {
        let mut urls = urls.borrow_mut();
        match url {
            Some(url) => urls.insert(stream, url),
            None => urls.remove(&stream),
        }
    });
    state.url(stream).set(href);
}

/// Copy the session's current state into the signals.
pub fn publish(state: AppState) {
    let (request_state, error, input, output) = with_session(|s| {
        (
            s.request_state(),
            s.last_error().map(|e| e.to_string()),
            s.playback_state(Stream::Input),
            s.playback_state(Stream::Output),
        )
    });
    state.request_state.set(request_state);
    state.error_message.set(error);
    state.input_playback.set(input);
    state.output_playback.set(output);
}

/// Make a picked file the current input.
pub async fn select_file(state: AppState, file: web_sys::File) {
    let pick = PICKS.with(|p| {
        p.set(p.get() + 1);
        p.get()
    });
    let name = file.name();

    let buffer = match JsFuture::from(file.array_buffer()).await {
        Ok(b) => b,
        Err(e) => {
            log::error!("Failed to read {}: {:?}", name, e);
            return;
        }
    };
    // A later pick finished reading first
    if PICKS.with(|p| p.get()) != pick {
        log::debug!("Dropping superseded pick of {}", name);
        return;
    }

    let url = match ObjectUrl::from_blob(&file) {
        Ok(u) => u,
        Err(e) => {
            log::error!("Failed to create object URL for {}: {:?}", name, e);
            return;
        }
    };
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    let info = wav_info::probe(&bytes);
    log::info!("Selected {} ({} bytes)", name, bytes.len());

    let generation = with_session(|s| s.select_file(name.clone(), bytes));

    set_object_url(state, Stream::Output, None);
    state.output_name.set(None);
    state.output_info.set(None);
    set_object_url(state, Stream::Input, Some(url));
    state.input_info.set(info);
    state.file_name.set(Some(name));
    state.generation.set(generation.0);
    publish(state);
}

/// Start a submission for the current file. The request runs in the
/// background; its outcome is applied only if nothing superseded it.
pub fn submit(state: AppState) {
    let Some(client) = build_client(state, config::endpoint()) else {
        return;
    };

    let pending = match with_session(|s| s.begin_submit(&DocumentCookies)) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("Submit rejected: {}", e);
            return;
        }
    };
    set_object_url(state, Stream::Output, None);
    state.output_name.set(None);
    state.output_info.set(None);
    publish(state);

    wasm_bindgen_futures::spawn_local(async move {
        let outcome = client.send(pending.request).await;
        let completion = with_session(|s| s.complete_submit(pending.ticket, outcome));

        if completion == Completion::Succeeded {
            show_result(state);
        } else if let Completion::Failed(e) = &completion {
            log::error!("Denoising failed: {}", e);
        }
        publish(state);
    });
}

/// Client for `base_url`. A failure is kept in `client_error`, which
/// [`publish`] leaves alone, and cleared by the next successful build.
fn build_client(state: AppState, base_url: &str) -> Option<DenoiseClient> {
    match DenoiseClient::new(ClientConfig::new(base_url)) {
        Ok(client) => {
            state.client_error.set(None);
            Some(client)
        }
        Err(e) => {
            log::error!("Cannot build client: {}", e);
            state.client_error.set(Some(e.to_string()));
            None
        }
    }
}

fn show_result(state: AppState) {
    let prepared = with_session(|s| {
        s.result().map(|r| {
            (
                ObjectUrl::from_bytes(&r.bytes, &r.content_type),
                r.suggested_name.clone(),
                wav_info::probe(&r.bytes),
            )
        })
    });
    let Some((url, name, info)) = prepared else {
        return;
    };
    match url {
        Ok(url) => {
            state.output_name.set(name);
            state.output_info.set(info);
            set_object_url(state, Stream::Output, Some(url));
        }
        Err(e) => log::error!("Failed to create object URL for result: {:?}", e),
    }
}

/// Bind a freshly mounted `<audio>` element to its stream.
pub fn attach(state: AppState, stream: Stream, element: web_sys::HtmlAudioElement) {
    let handle = AudioElement::new(element, stream, state);
    if !with_session(|s| s.attach_media(stream, handle)) {
        log::debug!("{:?} element mounted with nothing to play", stream);
    }
    publish(state);
}

/// Play/pause button.
pub fn toggle(state: AppState, stream: Stream) {
    if let Err(e) = with_session(|s| s.toggle(stream)) {
        log::warn!("{:?} toggle failed: {}", stream, e);
    }
    publish(state);
}

/// The element changed state on its own (native controls, reached the end).
pub fn sync(state: AppState, stream: Stream) {
    with_session(|s| s.sync_playback(stream));
    publish(state);
}
