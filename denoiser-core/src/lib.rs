//! Client-side coordinator for a remote audio denoising service.
//!
//! The crate holds no I/O of its own. Network access goes through a
//! [`DenoiseTransport`], cookie access through a [`CookieTokenProvider`] and
//! media playback through a [`MediaHandle`], so the same state machine drives
//! the browser front end, the command line tool and the tests.

pub mod cookie;
pub mod error;
pub mod playback;
pub mod selection;
pub mod session;
pub mod submission;

pub use cookie::{parse_cookie, CookieString, CookieTokenProvider, NoCookies, CSRF_COOKIE_NAME};
pub use error::{PlaybackError, SubmitError, TransportError};
pub use playback::{MediaHandle, PlaybackCoordinator, PlaybackState, Stream};
pub use selection::{is_accepted_file_name, FileSelectionTracker, Generation, InputAudio};
pub use session::DenoiseSession;
pub use submission::{
    Completion, DenoiseRequest, DenoiseResponse, DenoiseResult, DenoiseTransport,
    PendingSubmission, RequestState, SubmissionController, Ticket, AUDIO_FIELD_NAME,
    CSRF_HEADER_NAME, DENOISE_PATH,
};
