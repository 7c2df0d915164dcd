//! Playback resource seam.

use crate::{PlaybackError, Track};

/// The audio resource a playlist drives. Implementations own decoding and
/// output; the playlist owns ordering and play/pause state.
pub trait PlaybackBackend: Send {
    fn load(&mut self, track: &Track) -> Result<(), PlaybackError>;

    /// May fail, e.g. when the platform blocks autoplay.
    fn play(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self);

    fn set_volume(&mut self, volume: f32);
}

/// Backend that accepts every command and produces no sound.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl PlaybackBackend for NullBackend {
    fn load(&mut self, _track: &Track) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn set_volume(&mut self, _volume: f32) {}
}
