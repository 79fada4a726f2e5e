use denoiser_core::{MediaHandle, PlaybackError, Stream};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;
use crate::session;
use crate::state::AppState;

/// An `<audio>` element bound to one stream.
pub struct AudioElement {
    element: HtmlAudioElement,
    stream: Stream,
    state: AppState,
}

impl AudioElement {
    pub fn new(element: HtmlAudioElement, stream: Stream, state: AppState) -> Self {
        Self { element, stream, state }
    }
}

impl MediaHandle for AudioElement {
    fn play(&self) -> Result<(), PlaybackError> {
        let promise = self
            .element
            .play()
            .map_err(|e| PlaybackError::PlayRejected(format!("{e:?}")))?;

        // play() settles later; a rejection (autoplay policy, unsupported
        // source) leaves the element paused, so re-read its state.
        let (state, stream) = (self.state, self.stream);
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("{:?} playback rejected: {:?}", stream, e);
                session::sync(state, stream);
            }
        });
        Ok(())
    }

    fn pause(&self) -> Result<(), PlaybackError> {
        self.element
            .pause()
            .map_err(|e| PlaybackError::PauseFailed(format!("{e:?}")))
    }

    fn is_paused(&self) -> bool {
        self.element.paused()
    }
}
