use std::time::Duration;

use crate::catalog::TrackDescriptor;
use crate::error::PlayerError;

/// Whether a freshly bound resource can start playing without a wait.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Readiness {
    /// Decoded far enough to play.
    Ready,
    /// Still loading; a ready signal will follow.
    Pending,
    /// The backend cannot tell; callers fall back to a fixed settle delay.
    #[default]
    NoSignal,
}

/// Opens audio resources. The engine owns at most one of them at a time.
pub trait AudioBackend {
    type Resource: AudioResource;

    fn open(&mut self, track: &TrackDescriptor) -> Result<Self::Resource, PlayerError>;
}

/// A single bound audio source.
pub trait AudioResource {
    fn play(&mut self) -> Result<(), PlayerError>;
    fn pause(&mut self);
    fn seek(&mut self, to: Duration) -> Result<(), PlayerError>;
    fn set_volume(&mut self, volume: f32);
    fn position(&self) -> Duration;
    /// The source has no more audio to give.
    fn finished(&self) -> bool;
    fn readiness(&self) -> Readiness {
        Readiness::NoSignal
    }
    /// Stop output and free the underlying device handle.
    fn release(&mut self);
}
