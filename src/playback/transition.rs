//! Ordered track switching.
//!
//! A switch pauses the engine, moves the store to the new index with the
//! time reset, rebinds the resource and, when playback was running, queues a
//! deferred resume. Resumes fire once the engine reports the resource ready,
//! or after the settle delay when it cannot tell. Every switch bumps a
//! generation counter; a resume queued under an older generation is dropped
//! instead of applied.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::error::PlayerError;

use super::backend::{AudioBackend, Readiness};
use super::engine::PlaybackEngine;
use super::mode::{Direction, SequentialBoundary, Target, resolve};
use super::store::PlayerStateStore;

#[derive(Debug, Copy, Clone)]
struct DeferredResume {
    generation: u64,
    due: Instant,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The target is bound. `resume_pending` is set when playback will restart.
    Switched {
        from: usize,
        to: usize,
        resume_pending: bool,
    },
    /// The store moved to `to` but nothing could be bound; playback is stopped.
    LoadFailed { from: usize, to: usize },
}

impl SwitchOutcome {
    pub fn from(&self) -> usize {
        match *self {
            SwitchOutcome::Switched { from, .. } | SwitchOutcome::LoadFailed { from, .. } => from,
        }
    }

    pub fn to(&self) -> usize {
        match *self {
            SwitchOutcome::Switched { to, .. } | SwitchOutcome::LoadFailed { to, .. } => to,
        }
    }
}

pub struct TransitionCoordinator {
    generation: u64,
    deferred: VecDeque<DeferredResume>,
    settle_delay: Duration,
    boundary: SequentialBoundary,
}

impl TransitionCoordinator {
    pub fn new(settle_delay: Duration, boundary: SequentialBoundary) -> Self {
        Self {
            generation: 0,
            deferred: VecDeque::new(),
            settle_delay,
            boundary,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A resume for the current generation is still waiting.
    pub fn resume_pending(&self) -> bool {
        self.deferred.iter().any(|d| d.generation == self.generation)
    }

    /// Invalidate any queued resume without switching tracks.
    pub fn supersede(&mut self) {
        self.generation += 1;
    }

    /// Switch to whatever `target` resolves to under the current play mode.
    ///
    /// An out-of-range target leaves everything untouched.
    pub fn switch<B: AudioBackend, R: Rng + ?Sized>(
        &mut self,
        target: Target,
        store: &mut PlayerStateStore,
        engine: &mut PlaybackEngine<B>,
        catalog: &Catalog,
        rng: &mut R,
        now: Instant,
    ) -> Result<SwitchOutcome, PlayerError> {
        let before = store.snapshot();
        let len = store.track_count();

        let Some(to) = resolve(before.mode, before.index, target, len, self.boundary, rng) else {
            let index = match target {
                Target::Index(i) => i as i64,
                Target::Step(Direction::Forward) => before.index as i64 + 1,
                Target::Step(Direction::Backward) => before.index as i64 - 1,
            };
            return Err(PlayerError::IndexOutOfRange { index, len });
        };
        let Some(track) = catalog.get(to) else {
            return Err(PlayerError::IndexOutOfRange {
                index: to as i64,
                len: catalog.len(),
            });
        };

        // A resume still waiting from the previous switch counts as playing.
        let was_playing = before.playing || self.resume_pending();
        self.generation += 1;
        let generation = self.generation;

        engine.pause();
        store.set_playing(false);
        store.set_index(to)?;
        store.set_time(Duration::ZERO);

        if let Err(e) = engine.load(to, track, before.volume) {
            warn!(from = before.index, to, error = %e, "switched to a track that failed to load");
            return Ok(SwitchOutcome::LoadFailed {
                from: before.index,
                to,
            });
        }

        if was_playing {
            self.deferred.push_back(DeferredResume {
                generation,
                due: now + self.settle_delay,
            });
        }

        debug!(generation, from = before.index, to, was_playing, "switched track");
        Ok(SwitchOutcome::Switched {
            from: before.index,
            to,
            resume_pending: was_playing,
        })
    }

    /// Run queued resumes that are due at `now`.
    ///
    /// Returns `Some(started)` when a resume ran, `None` otherwise.
    pub fn service<B: AudioBackend>(
        &mut self,
        store: &mut PlayerStateStore,
        engine: &mut PlaybackEngine<B>,
        now: Instant,
    ) -> Option<bool> {
        let mut outcome = None;

        while let Some(front) = self.deferred.front().copied() {
            if front.generation != self.generation {
                self.deferred.pop_front();
                debug!(
                    stale = front.generation,
                    current = self.generation,
                    "discarding superseded resume"
                );
                continue;
            }
            if now < front.due && engine.readiness() != Readiness::Ready {
                break;
            }

            self.deferred.pop_front();
            let started = engine.play();
            store.set_playing(started);
            outcome = Some(started);
        }

        outcome
    }
}
