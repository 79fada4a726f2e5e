use thiserror::Error;

/// Why a submission did not produce a result.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("no audio file selected")]
    MissingFile,

    #[error("a submission is already in flight")]
    Busy,

    #[error("server returned {status} {status_text}")]
    Server { status: u16, status_text: String },

    #[error("request failed: {0}")]
    Transport(String),
}

/// Network-level failure reported by a transport: unreachable host, aborted
/// request, unreadable body.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<TransportError> for SubmitError {
    fn from(e: TransportError) -> Self {
        SubmitError::Transport(e.0)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("media element refused to play: {0}")]
    PlayRejected(String),

    #[error("media element failed to pause: {0}")]
    PauseFailed(String),
}
