//! Comic pipeline errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

use dprovider::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComicErrorKind {
    /// Rejected before any stream started.
    InvalidRequest,
    /// The generative model failed, or the producer sent an `error` frame.
    Upstream,
    /// The generation endpoint answered with a non-success status.
    Http,
    /// Reading the byte stream failed mid-flight.
    Transport,
    /// A frame could not be decoded.
    Decode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComicError {
    pub kind: ComicErrorKind,
    pub message: String,
    pub status: Option<u16>,
}

impl ComicError {
    pub fn new(kind: ComicErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ComicErrorKind::InvalidRequest, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ComicErrorKind::Upstream, message)
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            ..Self::new(ComicErrorKind::Http, message)
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ComicErrorKind::Transport, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ComicErrorKind::Decode, message)
    }
}

impl Display for ComicError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ComicError {}

impl From<ProviderError> for ComicError {
    fn from(value: ProviderError) -> Self {
        ComicError::upstream(value.to_string())
    }
}
