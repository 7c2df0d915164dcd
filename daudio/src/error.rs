use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackErrorKind {
    EmptyPlaylist,
    TrackOutOfRange,
    Backend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackError {
    pub kind: PlaybackErrorKind,
    pub message: String,
}

impl PlaybackError {
    pub fn new(kind: PlaybackErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn empty_playlist() -> Self {
        Self::new(
            PlaybackErrorKind::EmptyPlaylist,
            "playlist needs at least one track",
        )
    }

    pub fn track_out_of_range(index: usize, len: usize) -> Self {
        Self::new(
            PlaybackErrorKind::TrackOutOfRange,
            format!("track index {index} is outside 0..{len}"),
        )
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(PlaybackErrorKind::Backend, message)
    }
}

impl Display for PlaybackError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for PlaybackError {}
