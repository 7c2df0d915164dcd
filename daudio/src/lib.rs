//! Cyclic playlist over a fixed track list, driving an injected playback backend.
//!
//! ```rust
//! use daudio::{NullBackend, Playlist};
//!
//! let mut playlist = Playlist::with_default_tracks(NullBackend).expect("tracks are present");
//! assert_eq!(playlist.current_track().title, "Track 1");
//!
//! playlist.previous().expect("paused navigation cannot fail");
//! assert_eq!(playlist.current_track().title, "Track 4");
//! assert!(!playlist.is_playing());
//!
//! assert_eq!(playlist.set_volume(1.7), 1.0);
//! ```

mod backend;
mod error;
mod playlist;

pub use backend::{NullBackend, PlaybackBackend};
pub use error::{PlaybackError, PlaybackErrorKind};
pub use playlist::{DEFAULT_VOLUME, Playlist, Track, default_tracks};
