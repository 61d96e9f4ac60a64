use std::time::Duration;

use tracing::{debug, warn};

use crate::catalog::TrackDescriptor;
use crate::error::PlayerError;

use super::backend::{AudioBackend, AudioResource, Readiness};

struct Bound<R> {
    index: usize,
    resource: R,
}

/// Sole owner of the live audio resource.
///
/// Holds no playback flags of its own; whether the player is "playing" lives
/// in the state store.
pub struct PlaybackEngine<B: AudioBackend> {
    backend: B,
    bound: Option<Bound<B::Resource>>,
}

impl<B: AudioBackend> PlaybackEngine<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            bound: None,
        }
    }

    /// Release whatever is bound, then bind `track` at `volume`.
    ///
    /// On failure nothing is bound.
    pub fn load(
        &mut self,
        index: usize,
        track: &TrackDescriptor,
        volume: f32,
    ) -> Result<(), PlayerError> {
        self.release();

        let mut resource = self.backend.open(track)?;
        resource.set_volume(volume);
        self.bound = Some(Bound { index, resource });
        debug!(index, path = %track.audio.display(), "bound audio resource");
        Ok(())
    }

    pub fn release(&mut self) {
        if let Some(mut bound) = self.bound.take() {
            bound.resource.release();
            debug!(index = bound.index, "released audio resource");
        }
    }

    /// Start playback. Failures are logged and reported as `false`.
    pub fn play(&mut self) -> bool {
        let Some(bound) = self.bound.as_mut() else {
            warn!("play requested with no audio resource bound");
            return false;
        };
        match bound.resource.play() {
            Ok(()) => true,
            Err(e) => {
                warn!(index = bound.index, error = %e, "playback did not start");
                false
            }
        }
    }

    pub fn pause(&mut self) {
        if let Some(bound) = self.bound.as_mut() {
            bound.resource.pause();
        }
    }

    /// Move the playhead. `to` must already be clamped to the track length.
    pub fn seek(&mut self, to: Duration) {
        if let Some(bound) = self.bound.as_mut() {
            if let Err(e) = bound.resource.seek(to) {
                warn!(index = bound.index, error = %e, "seek failed");
            }
        }
    }

    /// `volume` must already be clamped to `0.0..=1.0`.
    pub fn set_volume(&mut self, volume: f32) {
        if let Some(bound) = self.bound.as_mut() {
            bound.resource.set_volume(volume);
        }
    }

    /// Current playback position, or zero with nothing bound.
    pub fn tick(&self) -> Duration {
        self.bound
            .as_ref()
            .map_or(Duration::ZERO, |b| b.resource.position())
    }

    pub fn finished(&self) -> bool {
        self.bound.as_ref().is_some_and(|b| b.resource.finished())
    }

    pub fn readiness(&self) -> Readiness {
        self.bound
            .as_ref()
            .map_or(Readiness::NoSignal, |b| b.resource.readiness())
    }

    pub fn bound_index(&self) -> Option<usize> {
        self.bound.as_ref().map(|b| b.index)
    }
}

impl<B: AudioBackend> Drop for PlaybackEngine<B> {
    fn drop(&mut self) {
        self.release();
    }
}
