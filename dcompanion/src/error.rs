//! Companion-layer errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanionErrorKind {
    InvalidRequest,
    Provider,
    Store,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionError {
    pub kind: CompanionErrorKind,
    pub message: String,
}

impl CompanionError {
    pub fn new(kind: CompanionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(CompanionErrorKind::InvalidRequest, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(CompanionErrorKind::Provider, message)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(CompanionErrorKind::Store, message)
    }
}

impl Display for CompanionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for CompanionError {}

impl From<dprovider::ProviderError> for CompanionError {
    fn from(value: dprovider::ProviderError) -> Self {
        CompanionError::provider(value.to_string())
    }
}
