use leptos::prelude::*;
use denoiser_core::{PlaybackState, RequestState, Stream};
use crate::audio::wav_info::WavInfo;

/// Reactive mirror of the denoise session for the view layer. The session
/// itself lives in `crate::session`; these signals are only written from
/// there.
#[derive(Clone, Copy)]
pub struct AppState {
    pub file_name: RwSignal<Option<String>>,
    pub generation: RwSignal<u64>,
    pub input_url: RwSignal<Option<String>>,
    pub input_info: RwSignal<Option<WavInfo>>,

    pub request_state: RwSignal<RequestState>,
    pub error_message: RwSignal<Option<String>>,
    /// Set when no HTTP client could be built; not part of the session.
    pub client_error: RwSignal<Option<String>>,

    pub output_url: RwSignal<Option<String>>,
    pub output_name: RwSignal<Option<String>>,
    pub output_info: RwSignal<Option<WavInfo>>,

    pub input_playback: RwSignal<PlaybackState>,
    pub output_playback: RwSignal<PlaybackState>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            file_name: RwSignal::new(None),
            generation: RwSignal::new(0),
            input_url: RwSignal::new(None),
            input_info: RwSignal::new(None),
            request_state: RwSignal::new(RequestState::Idle),
            error_message: RwSignal::new(None),
            client_error: RwSignal::new(None),
            output_url: RwSignal::new(None),
            output_name: RwSignal::new(None),
            output_info: RwSignal::new(None),
            input_playback: RwSignal::new(PlaybackState::Paused),
            output_playback: RwSignal::new(PlaybackState::Paused),
        }
    }

    pub fn playback(&self, stream: Stream) -> RwSignal<PlaybackState> {
        match stream {
            Stream::Input => self.input_playback,
            Stream::Output => self.output_playback,
        }
    }

    pub fn url(&self, stream: Stream) -> RwSignal<Option<String>> {
        match stream {
            Stream::Input => self.input_url,
            Stream::Output => self.output_url,
        }
    }

    pub fn info(&self, stream: Stream) -> RwSignal<Option<WavInfo>> {
        match stream {
            Stream::Input => self.input_info,
            Stream::Output => self.output_info,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.request_state.get() == RequestState::Loading
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
