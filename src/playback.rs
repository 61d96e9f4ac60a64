//! The playback core: play-mode policy, the single-resource engine, the
//! authoritative state store and the transition coordinator that ties them
//! together when switching tracks.

mod backend;
mod engine;
mod mode;
mod persist;
mod rodio_backend;
mod store;
mod transition;

pub use backend::{AudioBackend, AudioResource, Readiness};
pub use engine::PlaybackEngine;
pub use mode::{Direction, PlayMode, SequentialBoundary, Target, resolve};
pub use persist::{FileIndexStore, IndexStore};
pub use rodio_backend::RodioBackend;
pub use store::{PlayerState, PlayerStateStore, clamp_volume};
pub use transition::{SwitchOutcome, TransitionCoordinator};

#[cfg(test)]
pub(crate) mod fake;

#[cfg(test)]
mod tests;
