//! Request lifecycle for one denoising submission at a time.
//!
//! A submission is split around its single suspension point: [`begin`]
//! prepares the request and moves to `Loading`, the caller awaits the
//! transport, and [`complete`] applies the outcome if its [`Ticket`] is still
//! the outstanding one. Nothing is borrowed across the await, so the rest of
//! the session stays usable while a request is in flight.
//!
//! [`begin`]: SubmissionController::begin
//! [`complete`]: SubmissionController::complete

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::cookie::{CookieTokenProvider, CSRF_COOKIE_NAME};
use crate::error::{SubmitError, TransportError};
use crate::selection::{Generation, InputAudio};

/// Path of the denoising endpoint, relative to the service base URL.
pub const DENOISE_PATH: &str = "/api/denoise/";
/// Multipart field carrying the audio file.
pub const AUDIO_FIELD_NAME: &str = "audio_file";
/// Header carrying the CSRF token.
pub const CSRF_HEADER_NAME: &str = "X-CSRFToken";

const DEFAULT_CONTENT_TYPE: &str = "audio/wav";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl RequestState {
    pub fn can_submit(self) -> bool {
        self != RequestState::Loading
    }
}

/// Identifies one issued submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Ticket {
    pub request_id: u64,
    pub generation: Generation,
}

/// Everything a transport needs to issue the POST.
#[derive(Clone, Debug)]
pub struct DenoiseRequest {
    pub file_name: String,
    pub audio: Arc<[u8]>,
    pub csrf_token: Option<String>,
}

/// Raw HTTP response as seen by the controller. Transports only need to read
/// the body for 2xx responses.
#[derive(Clone, Debug, Default)]
pub struct DenoiseResponse {
    pub status: u16,
    pub status_text: String,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
}

impl DenoiseResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Processed audio returned by the service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DenoiseResult {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub suggested_name: Option<String>,
}

impl DenoiseResult {
    fn from_response(response: DenoiseResponse) -> Self {
        let content_type = response
            .content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        if !content_type.starts_with("audio/") {
            log::warn!("Unexpected result content type: {}", content_type);
        }
        let suggested_name = response
            .content_disposition
            .as_deref()
            .and_then(suggested_file_name);

        Self {
            bytes: response.body,
            content_type,
            suggested_name,
        }
    }
}

/// File name from a `Content-Disposition` header, reduced to its last path
/// component.
pub fn suggested_file_name(disposition: &str) -> Option<String> {
    let raw = disposition
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))?;
    let unquoted = raw.trim().trim_matches('"');
    let base = unquoted.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default().trim();
    if base.is_empty() || base == "." || base == ".." {
        None
    } else {
        Some(base.to_string())
    }
}

/// Issues one denoising request. Implementations make exactly one attempt.
#[async_trait(?Send)]
pub trait DenoiseTransport {
    /// Resolve to the response for any HTTP status; `Err` only for
    /// network-level failures.
    async fn send(&self, request: DenoiseRequest) -> Result<DenoiseResponse, TransportError>;
}

/// A submission that has been started and awaits its transport.
#[derive(Debug)]
pub struct PendingSubmission {
    pub ticket: Ticket,
    pub request: DenoiseRequest,
}

/// What happened when an outcome was handed back to the controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    Succeeded,
    Failed(SubmitError),
    /// The ticket was no longer outstanding; the outcome was ignored.
    Discarded,
}

#[derive(Debug, Default)]
pub struct SubmissionController {
    state: RequestState,
    result: Option<DenoiseResult>,
    last_error: Option<SubmitError>,
    issued: u64,
    outstanding: Option<Ticket>,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn result(&self) -> Option<&DenoiseResult> {
        self.result.as_ref()
    }

    pub fn last_error(&self) -> Option<&SubmitError> {
        self.last_error.as_ref()
    }

    pub fn outstanding(&self) -> Option<Ticket> {
        self.outstanding
    }

    /// Start a submission for `input`. Rejections leave every field as it
    /// was.
    pub fn begin(
        &mut self,
        input: Option<&InputAudio>,
        cookies: &dyn CookieTokenProvider,
    ) -> Result<PendingSubmission, SubmitError> {
        let input = input.ok_or(SubmitError::MissingFile)?;
        if !self.state.can_submit() {
            return Err(SubmitError::Busy);
        }

        self.result = None;
        self.last_error = None;
        self.state = RequestState::Loading;
        self.issued += 1;
        let ticket = Ticket {
            request_id: self.issued,
            generation: input.generation(),
        };
        self.outstanding = Some(ticket);

        let csrf_token = cookies.token(CSRF_COOKIE_NAME);
        if csrf_token.is_none() {
            log::warn!("No {} cookie; sending without {}", CSRF_COOKIE_NAME, CSRF_HEADER_NAME);
        }
        log::debug!(
            "Submitting {} as request {} (generation {})",
            input.name(),
            ticket.request_id,
            ticket.generation
        );

        Ok(PendingSubmission {
            ticket,
            request: DenoiseRequest {
                file_name: input.name().to_string(),
                audio: Arc::clone(input.bytes()),
                csrf_token,
            },
        })
    }

    /// Apply a transport outcome. Outcomes for anything but the outstanding
    /// ticket are discarded without touching state.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<DenoiseResponse, TransportError>,
    ) -> Completion {
        if self.outstanding != Some(ticket) {
            log::info!(
                "Discarding stale response for request {} (generation {})",
                ticket.request_id,
                ticket.generation
            );
            return Completion::Discarded;
        }
        self.outstanding = None;

        let error = match outcome {
            Ok(response) if response.is_success() => {
                log::info!(
                    "Request {} succeeded: {} bytes",
                    ticket.request_id,
                    response.body.len()
                );
                self.result = Some(DenoiseResult::from_response(response));
                self.state = RequestState::Succeeded;
                return Completion::Succeeded;
            }
            Ok(response) => SubmitError::Server {
                status: response.status,
                status_text: response.status_text,
            },
            Err(e) => SubmitError::from(e),
        };

        log::error!("Request {} failed: {}", ticket.request_id, error);
        self.state = RequestState::Failed;
        self.last_error = Some(error.clone());
        Completion::Failed(error)
    }

    /// Forget the outstanding request and any result, back to `Idle`.
    pub fn invalidate(&mut self) {
        if let Some(ticket) = self.outstanding.take() {
            log::debug!("Request {} superseded", ticket.request_id);
        }
        self.result = None;
        self.last_error = None;
        self.state = RequestState::Idle;
    }
}
