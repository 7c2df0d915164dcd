//! Playlist state: current index, play/pause flag and volume.

use crate::{PlaybackBackend, PlaybackError};

pub const DEFAULT_VOLUME: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub src: String,
}

impl Track {
    pub fn new(title: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            src: src.into(),
        }
    }
}

pub fn default_tracks() -> Vec<Track> {
    vec![
        Track::new("Track 1", "/first_song.mp3"),
        Track::new("Track 2", "/second_song.mp3"),
        Track::new("Track 3", "/third_song.mp3"),
        Track::new("Track 4", "/fourth_song.mp3"),
    ]
}

/// Index moves are modular over the track list. Moving while playing loads
/// the new track and resumes; moving while paused only loads it.
#[derive(Debug)]
pub struct Playlist<B> {
    tracks: Vec<Track>,
    index: usize,
    playing: bool,
    volume: f32,
    backend: B,
}

impl<B: PlaybackBackend> Playlist<B> {
    pub fn new(tracks: Vec<Track>, mut backend: B) -> Result<Self, PlaybackError> {
        let Some(first) = tracks.first() else {
            return Err(PlaybackError::empty_playlist());
        };

        backend.load(first)?;
        backend.set_volume(DEFAULT_VOLUME);

        Ok(Self {
            tracks,
            index: 0,
            playing: false,
            volume: DEFAULT_VOLUME,
            backend,
        })
    }

    pub fn with_default_tracks(backend: B) -> Result<Self, PlaybackError> {
        Self::new(default_tracks(), backend)
    }

    pub fn current_track(&self) -> &Track {
        &self.tracks[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn next(&mut self) -> Result<(), PlaybackError> {
        let index = (self.index + 1) % self.tracks.len();
        self.change_track(index)
    }

    pub fn previous(&mut self) -> Result<(), PlaybackError> {
        let len = self.tracks.len();
        let index = (self.index + len - 1) % len;
        self.change_track(index)
    }

    /// The current track finished on its own.
    pub fn track_ended(&mut self) -> Result<(), PlaybackError> {
        self.next()
    }

    pub fn select(&mut self, index: usize) -> Result<(), PlaybackError> {
        if index >= self.tracks.len() {
            return Err(PlaybackError::track_out_of_range(index, self.tracks.len()));
        }
        self.change_track(index)
    }

    pub fn toggle_play_pause(&mut self) -> Result<(), PlaybackError> {
        if self.playing {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    pub fn play(&mut self) -> Result<(), PlaybackError> {
        match self.backend.play() {
            Ok(()) => {
                self.playing = true;
                Ok(())
            }
            Err(err) => {
                self.playing = false;
                tracing::warn!(
                    phase = "playback",
                    event = "play_failed",
                    track = %self.current_track().title,
                    error = %err,
                    "Playback could not start"
                );
                Err(err)
            }
        }
    }

    pub fn pause(&mut self) {
        self.backend.pause();
        self.playing = false;
    }

    /// Clamps to `[0, 1]` and returns the applied value. `NaN` is ignored.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        if !volume.is_nan() {
            self.volume = volume.clamp(0.0, 1.0);
            self.backend.set_volume(self.volume);
        }
        self.volume
    }

    fn change_track(&mut self, index: usize) -> Result<(), PlaybackError> {
        self.index = index;
        let track = &self.tracks[self.index];
        tracing::debug!(
            phase = "playback",
            event = "track_changed",
            index,
            track = %track.title,
            "Track changed"
        );

        if let Err(err) = self.backend.load(track) {
            self.playing = false;
            return Err(err);
        }

        if self.playing {
            self.play()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlaybackErrorKind;

    #[derive(Debug, Default)]
    struct RecordingBackend {
        calls: Vec<String>,
        refuse_play: bool,
    }

    impl PlaybackBackend for RecordingBackend {
        fn load(&mut self, track: &Track) -> Result<(), PlaybackError> {
            self.calls.push(format!("load {}", track.src));
            Ok(())
        }

        fn play(&mut self) -> Result<(), PlaybackError> {
            self.calls.push("play".to_string());
            if self.refuse_play {
                return Err(PlaybackError::backend("autoplay blocked"));
            }
            Ok(())
        }

        fn pause(&mut self) {
            self.calls.push("pause".to_string());
        }

        fn set_volume(&mut self, volume: f32) {
            self.calls.push(format!("volume {volume}"));
        }
    }

    fn playlist() -> Playlist<RecordingBackend> {
        Playlist::with_default_tracks(RecordingBackend::default()).expect("default tracks")
    }

    #[test]
    fn starts_paused_on_first_track_at_half_volume() {
        let playlist = playlist();

        assert_eq!(playlist.index(), 0);
        assert!(!playlist.is_playing());
        assert_eq!(playlist.volume(), 0.5);
        assert_eq!(
            playlist.backend().calls,
            vec!["load /first_song.mp3", "volume 0.5"]
        );
    }

    #[test]
    fn next_and_previous_wrap_around() {
        let mut playlist = playlist();

        playlist.previous().expect("previous");
        assert_eq!(playlist.index(), 3);
        playlist.next().expect("next");
        assert_eq!(playlist.index(), 0);

        for _ in 0..5 {
            playlist.next().expect("next");
        }
        assert_eq!(playlist.current_track().src, "/second_song.mp3");
    }

    #[test]
    fn changing_track_while_paused_does_not_start_playback() {
        let mut playlist = playlist();
        playlist.next().expect("next");

        assert!(!playlist.is_playing());
        assert!(!playlist.backend().calls.contains(&"play".to_string()));
    }

    #[test]
    fn changing_track_while_playing_loads_and_resumes() {
        let mut playlist = playlist();
        playlist.toggle_play_pause().expect("play");
        playlist.track_ended().expect("ended");

        assert!(playlist.is_playing());
        assert_eq!(playlist.index(), 1);
        let calls = &playlist.backend().calls;
        assert_eq!(
            calls[calls.len() - 2..],
            ["load /second_song.mp3".to_string(), "play".to_string()]
        );
    }

    #[test]
    fn toggle_flips_between_play_and_pause() {
        let mut playlist = playlist();

        playlist.toggle_play_pause().expect("play");
        assert!(playlist.is_playing());
        playlist.toggle_play_pause().expect("pause");
        assert!(!playlist.is_playing());
        assert_eq!(playlist.backend().calls.last().map(String::as_str), Some("pause"));
    }

    #[test]
    fn refused_playback_leaves_playlist_paused() {
        let backend = RecordingBackend {
            refuse_play: true,
            ..RecordingBackend::default()
        };
        let mut playlist = Playlist::with_default_tracks(backend).expect("tracks");

        let err = playlist.toggle_play_pause().expect_err("play refused");

        assert_eq!(err.kind, PlaybackErrorKind::Backend);
        assert!(!playlist.is_playing());
    }

    #[test]
    fn volume_is_clamped_on_every_set() {
        let mut playlist = playlist();

        assert_eq!(playlist.set_volume(-0.3), 0.0);
        assert_eq!(playlist.set_volume(2.0), 1.0);
        assert_eq!(playlist.set_volume(0.25), 0.25);
        assert_eq!(playlist.set_volume(f32::NAN), 0.25);
        assert_eq!(playlist.backend().calls.last().map(String::as_str), Some("volume 0.25"));
    }

    #[test]
    fn select_rejects_out_of_range_index() {
        let mut playlist = playlist();

        let err = playlist.select(4).expect_err("out of range");
        assert_eq!(err.kind, PlaybackErrorKind::TrackOutOfRange);

        playlist.select(2).expect("in range");
        assert_eq!(playlist.current_track().title, "Track 3");
    }

    #[test]
    fn empty_track_list_is_rejected() {
        let err = Playlist::new(Vec::new(), RecordingBackend::default()).expect_err("empty");
        assert_eq!(err.kind, PlaybackErrorKind::EmptyPlaylist);
    }
}
