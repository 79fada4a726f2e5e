use std::sync::Arc;

use crate::cookie::CookieTokenProvider;
use crate::error::{PlaybackError, SubmitError, TransportError};
use crate::playback::{MediaHandle, PlaybackCoordinator, PlaybackState, Stream};
use crate::selection::{FileSelectionTracker, Generation, InputAudio};
use crate::submission::{
    Completion, DenoiseResponse, DenoiseResult, DenoiseTransport, PendingSubmission,
    RequestState, SubmissionController, Ticket,
};

/// One user's select → submit → compare workflow.
pub struct DenoiseSession<H> {
    tracker: FileSelectionTracker,
    controller: SubmissionController,
    playback: PlaybackCoordinator<H>,
}

impl<H> Default for DenoiseSession<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> DenoiseSession<H> {
    pub fn new() -> Self {
        Self {
            tracker: FileSelectionTracker::new(),
            controller: SubmissionController::new(),
            playback: PlaybackCoordinator::new(),
        }
    }

    /// Make `name`/`bytes` the input. Any result, outstanding request and
    /// playback state from the previous file is dropped.
    pub fn select_file(&mut self, name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Generation {
        let generation = self.tracker.select_file(name, bytes);
        self.controller.invalidate();
        self.playback.detach(Stream::Output);
        self.playback.detach(Stream::Input);
        generation
    }

    pub fn input(&self) -> Option<&InputAudio> {
        self.tracker.current()
    }

    pub fn generation(&self) -> Generation {
        self.tracker.generation()
    }

    pub fn request_state(&self) -> RequestState {
        self.controller.state()
    }

    pub fn result(&self) -> Option<&DenoiseResult> {
        self.controller.result()
    }

    pub fn last_error(&self) -> Option<&SubmitError> {
        self.controller.last_error()
    }

    pub fn can_submit(&self) -> bool {
        self.tracker.current().is_some() && self.controller.state().can_submit()
    }

    /// First half of a submission; hand the request to a transport and pass
    /// its outcome to [`complete_submit`](Self::complete_submit).
    pub fn begin_submit(
        &mut self,
        cookies: &dyn CookieTokenProvider,
    ) -> Result<PendingSubmission, SubmitError> {
        let pending = self.controller.begin(self.tracker.current(), cookies)?;
        self.playback.detach(Stream::Output);
        Ok(pending)
    }

    pub fn complete_submit(
        &mut self,
        ticket: Ticket,
        outcome: Result<DenoiseResponse, TransportError>,
    ) -> Completion {
        // A ticket from an older selection can only be stale
        if !self.tracker.is_current(ticket.generation) {
            log::info!(
                "Ignoring response for generation {}, current is {}",
                ticket.generation,
                self.tracker.generation()
            );
            return Completion::Discarded;
        }
        self.controller.complete(ticket, outcome)
    }

    /// Both halves in one call, for callers that own the session outright.
    pub async fn submit<T>(
        &mut self,
        transport: &T,
        cookies: &dyn CookieTokenProvider,
    ) -> Result<Completion, SubmitError>
    where
        T: DenoiseTransport + ?Sized,
    {
        let PendingSubmission { ticket, request } = self.begin_submit(cookies)?;
        let outcome = transport.send(request).await;
        Ok(self.complete_submit(ticket, outcome))
    }

    pub fn playback_state(&self, stream: Stream) -> PlaybackState {
        self.playback.state(stream)
    }

    /// Bind the media element for `stream`. The Output element is only
    /// accepted while a result exists.
    pub fn attach_media(&mut self, stream: Stream, handle: H) -> bool {
        let allowed = match stream {
            Stream::Input => self.tracker.current().is_some(),
            Stream::Output => self.controller.result().is_some(),
        };
        if allowed {
            self.playback.attach(stream, handle);
        } else {
            log::debug!("Not attaching {:?}: nothing to play", stream);
        }
        allowed
    }
}

impl<H: MediaHandle> DenoiseSession<H> {
    pub fn toggle(&mut self, stream: Stream) -> Result<PlaybackState, PlaybackError> {
        self.playback.toggle(stream)
    }

    pub fn sync_playback(&mut self, stream: Stream) -> PlaybackState {
        self.playback.sync(stream)
    }
}
