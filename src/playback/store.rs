use std::time::Duration;

use crate::error::PlayerError;

use super::mode::PlayMode;

/// A copy of the player's state at one instant. Observers only ever see these.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlayerState {
    pub index: usize,
    pub mode: PlayMode,
    pub playing: bool,
    pub time: Duration,
    pub volume: f32,
}

/// Clamp any input, NaN included, into `0.0..=1.0`.
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// The single authoritative record of playback state.
pub struct PlayerStateStore {
    state: PlayerState,
    durations: Vec<Duration>,
}

impl PlayerStateStore {
    /// `durations` holds one entry per catalog track and must not be empty.
    /// An out-of-range `index` falls back to the first track.
    pub fn new(durations: Vec<Duration>, index: usize, mode: PlayMode, volume: f32) -> Self {
        let index = if index < durations.len() { index } else { 0 };
        Self {
            state: PlayerState {
                index,
                mode,
                playing: false,
                time: Duration::ZERO,
                volume: clamp_volume(volume),
            },
            durations,
        }
    }

    pub fn snapshot(&self) -> PlayerState {
        self.state
    }

    pub fn track_count(&self) -> usize {
        self.durations.len()
    }

    /// Length of the active track.
    pub fn duration(&self) -> Duration {
        self.durations
            .get(self.state.index)
            .copied()
            .unwrap_or(Duration::ZERO)
    }

    pub fn set_index(&mut self, index: usize) -> Result<(), PlayerError> {
        if index >= self.durations.len() {
            return Err(PlayerError::IndexOutOfRange {
                index: index as i64,
                len: self.durations.len(),
            });
        }
        self.state.index = index;
        self.state.time = self.state.time.min(self.duration());
        Ok(())
    }

    pub fn set_mode(&mut self, mode: PlayMode) {
        self.state.mode = mode;
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.state.playing = playing;
    }

    /// Store `time` clamped to the active track's length; returns what was stored.
    pub fn set_time(&mut self, time: Duration) -> Duration {
        self.state.time = time.min(self.duration());
        self.state.time
    }

    /// Store `volume` clamped to `0.0..=1.0`; returns what was stored.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        self.state.volume = clamp_volume(volume);
        self.state.volume
    }
}
