//! Provider error kinds and error value helpers.
//!
//! ```rust
//! use dprovider::{ProviderError, ProviderErrorKind};
//!
//! let quota = ProviderError::from_status(429, "quota exhausted");
//! assert_eq!(quota.kind, ProviderErrorKind::RateLimited);
//! assert!(quota.is_retryable());
//! assert_eq!(quota.status, Some(429));
//!
//! let bad = ProviderError::invalid_request("prompt must not be empty");
//! assert!(!bad.is_retryable());
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Authentication,
    RateLimited,
    InvalidRequest,
    Timeout,
    Transport,
    Unavailable,
    MalformedResponse,
    Other,
}

impl ProviderErrorKind {
    /// Kind for a non-success upstream HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Authentication,
            429 => Self::RateLimited,
            408 | 504 => Self::Timeout,
            400 | 422 => Self::InvalidRequest,
            502 | 503 => Self::Unavailable,
            _ => Self::Transport,
        }
    }

    /// Whether the same request may succeed if sent again later.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::Timeout | Self::Transport | Self::Unavailable
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    /// HTTP status returned by the upstream service, when the failure came from one.
    pub status: Option<u16>,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::from_status(status), message).with_status(status)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Authentication, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimited, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidRequest, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unavailable, message)
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::MalformedResponse, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Other, message)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{:?} ({status}): {}", self.kind, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ProviderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_statuses_map_to_kinds() {
        let cases = [
            (403, ProviderErrorKind::Authentication),
            (429, ProviderErrorKind::RateLimited),
            (400, ProviderErrorKind::InvalidRequest),
            (504, ProviderErrorKind::Timeout),
            (503, ProviderErrorKind::Unavailable),
            (500, ProviderErrorKind::Transport),
        ];

        for (status, kind) in cases {
            let error = ProviderError::from_status(status, "boom");
            assert_eq!(error.kind, kind, "status {status}");
            assert_eq!(error.status, Some(status));
        }
    }

    #[test]
    fn retryability_follows_kind() {
        assert!(!ProviderError::authentication("bad key").is_retryable());
        assert!(!ProviderError::malformed_response("junk").is_retryable());
        assert!(ProviderError::timeout("slow").is_retryable());
        assert!(ProviderError::from_status(502, "gateway").is_retryable());
    }

    #[test]
    fn display_includes_status_when_present() {
        let plain = ProviderError::transport("connection reset");
        assert_eq!(plain.to_string(), "Transport: connection reset");

        let with_status = ProviderError::unavailable("overloaded").with_status(503);
        assert_eq!(with_status.to_string(), "Unavailable (503): overloaded");
    }
}
