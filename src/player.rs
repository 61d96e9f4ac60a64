//! The player: one catalog, one engine, one state store.
//!
//! Every command source ends up calling into [`Player`], which routes track
//! changes through the transition coordinator, watches the playhead for the
//! end of a track, and remembers the active index across runs.

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, TrackDescriptor};
use crate::playback::{
    AudioBackend, Direction, IndexStore, PlayMode, PlaybackEngine, PlayerState, PlayerStateStore,
    SequentialBoundary, SwitchOutcome, Target, TransitionCoordinator,
};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlayerOptions {
    pub mode: PlayMode,
    pub boundary: SequentialBoundary,
    pub settle_delay: Duration,
    pub volume: f32,
    pub autoplay: bool,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            mode: PlayMode::Sequential,
            boundary: SequentialBoundary::Wrap,
            settle_delay: Duration::from_millis(1000),
            volume: 1.0,
            autoplay: false,
        }
    }
}

/// What a position sample led to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    /// The track ended and the player moved on.
    Advanced,
    /// The track ended with nowhere to go; playback stopped.
    Ended,
}

pub struct Player<B: AudioBackend> {
    catalog: Catalog,
    store: PlayerStateStore,
    engine: PlaybackEngine<B>,
    transitions: TransitionCoordinator,
    index_store: Box<dyn IndexStore>,
    rng: StdRng,
    /// Generation at which the last end-of-track advance fired.
    advanced_at: Option<u64>,
}

impl<B: AudioBackend> Player<B> {
    pub fn new(
        catalog: Catalog,
        backend: B,
        options: PlayerOptions,
        index_store: Box<dyn IndexStore>,
    ) -> Self {
        Self::with_rng(catalog, backend, options, index_store, StdRng::from_entropy())
    }

    /// Like [`Player::new`] with a caller-supplied shuffle source.
    pub fn with_rng(
        catalog: Catalog,
        backend: B,
        options: PlayerOptions,
        index_store: Box<dyn IndexStore>,
        rng: StdRng,
    ) -> Self {
        let index = match index_store.load() {
            Some(i) if i < catalog.len() => i,
            Some(i) => {
                debug!(index = i, len = catalog.len(), "ignoring stale remembered index");
                0
            }
            None => 0,
        };

        let store = PlayerStateStore::new(catalog.durations(), index, options.mode, options.volume);
        let mut engine = PlaybackEngine::new(backend);
        let volume = store.snapshot().volume;
        if let Some(track) = catalog.get(index) {
            if let Err(e) = engine.load(index, track, volume) {
                warn!(index, error = %e, "initial track failed to load");
            }
        }

        let mut player = Self {
            catalog,
            store,
            engine,
            transitions: TransitionCoordinator::new(options.settle_delay, options.boundary),
            index_store,
            rng,
            advanced_at: None,
        };
        info!(index, tracks = player.catalog.len(), mode = %options.mode, "player ready");

        if options.autoplay {
            player.play();
        }
        player
    }

    pub fn snapshot(&self) -> PlayerState {
        self.store.snapshot()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current_track(&self) -> Option<&TrackDescriptor> {
        self.catalog.get(self.store.snapshot().index)
    }

    /// Playing, or about to resume after a switch.
    pub fn is_active(&self) -> bool {
        self.store.snapshot().playing || self.transitions.resume_pending()
    }

    /// Start the active track now. Cancels any pending resume.
    pub fn play(&mut self) -> bool {
        self.transitions.supersede();
        if self.store.snapshot().playing {
            return true;
        }

        // Nothing bound after a failed load or the end of the catalog, or a drained source.
        let index = self.store.snapshot().index;
        if self.engine.bound_index() != Some(index) || self.engine.finished() {
            self.rebind(index);
        }
        let started = self.engine.play();
        self.store.set_playing(started);
        started
    }

    /// Stop at the current position. Cancels any pending resume.
    pub fn pause(&mut self) {
        self.transitions.supersede();
        self.engine.pause();
        self.store.set_time(self.engine.tick());
        self.store.set_playing(false);
    }

    /// Returns whether the player is playing afterwards.
    pub fn toggle_play(&mut self) -> bool {
        if self.is_active() {
            self.pause();
            false
        } else {
            self.play()
        }
    }

    pub fn next(&mut self, now: Instant) -> Option<SwitchOutcome> {
        self.switch(Target::Step(Direction::Forward), now)
    }

    pub fn previous(&mut self, now: Instant) -> Option<SwitchOutcome> {
        self.switch(Target::Step(Direction::Backward), now)
    }

    /// Jump to catalog entry `index`, subject to the play mode.
    pub fn select(&mut self, index: usize, now: Instant) -> Option<SwitchOutcome> {
        self.switch(Target::Index(index), now)
    }

    pub fn set_volume(&mut self, volume: f32) -> f32 {
        let volume = self.store.set_volume(volume);
        self.engine.set_volume(volume);
        volume
    }

    pub fn adjust_volume(&mut self, delta: f32) -> f32 {
        self.set_volume(self.store.snapshot().volume + delta)
    }

    pub fn cycle_mode(&mut self) -> PlayMode {
        let mode = self.store.snapshot().mode.cycle();
        self.store.set_mode(mode);
        info!(%mode, "play mode changed");
        mode
    }

    pub fn seek_to(&mut self, to: Duration) {
        let to = self.store.set_time(to);
        self.engine.seek(to);
    }

    /// Move the playhead by `seconds` from where it is now, clamped to the track.
    pub fn seek_by(&mut self, seconds: i64) {
        let now = match self.engine.bound_index() {
            Some(_) => self.store.set_time(self.engine.tick()),
            None => self.store.snapshot().time,
        };
        let delta = Duration::from_secs(seconds.unsigned_abs());
        let to = if seconds < 0 {
            now.saturating_sub(delta)
        } else {
            now + delta
        };
        self.seek_to(to);
    }

    /// Run any deferred resume that is due.
    pub fn service(&mut self, now: Instant) -> Option<bool> {
        let started = self
            .transitions
            .service(&mut self.store, &mut self.engine, now);
        if started == Some(false) {
            warn!(index = self.store.snapshot().index, "deferred resume failed");
        }
        started
    }

    /// Sample the playhead and advance once the active track has ended.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        let position = self.engine.tick();
        self.store.set_time(position);

        let state = self.store.snapshot();
        if !state.playing || !self.reached_end(position) {
            return TickOutcome::Idle;
        }

        let generation = self.transitions.generation();
        if self.advanced_at == Some(generation) {
            return TickOutcome::Idle;
        }
        self.advanced_at = Some(generation);

        debug!(index = state.index, "track reached its end");
        match self.switch(Target::Step(Direction::Forward), now) {
            Some(_) => TickOutcome::Advanced,
            None => {
                // A rounded end can leave a tail buffered; the next play starts over.
                self.engine.release();
                self.store.set_time(Duration::ZERO);
                self.store.set_playing(false);
                info!(index = state.index, "end of catalog");
                TickOutcome::Ended
            }
        }
    }

    fn reached_end(&self, position: Duration) -> bool {
        if self.engine.finished() {
            return true;
        }
        let duration = self.store.duration();
        !duration.is_zero() && position.as_secs_f64().round() >= duration.as_secs_f64()
    }

    fn switch(&mut self, target: Target, now: Instant) -> Option<SwitchOutcome> {
        match self.transitions.switch(
            target,
            &mut self.store,
            &mut self.engine,
            &self.catalog,
            &mut self.rng,
            now,
        ) {
            Ok(outcome) => {
                if outcome.to() != outcome.from() {
                    self.remember(outcome.to());
                }
                Some(outcome)
            }
            Err(e) => {
                debug!(?target, error = %e, "switch ignored");
                None
            }
        }
    }

    fn rebind(&mut self, index: usize) {
        let Some(track) = self.catalog.get(index) else {
            return;
        };
        let volume = self.store.snapshot().volume;
        self.store.set_time(Duration::ZERO);
        if let Err(e) = self.engine.load(index, track, volume) {
            warn!(index, error = %e, "track failed to load");
        }
    }

    fn remember(&mut self, index: usize) {
        if let Err(e) = self.index_store.save(index) {
            warn!(index, error = %e, "could not remember the active track");
        }
    }
}
