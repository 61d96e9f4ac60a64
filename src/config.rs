//! Configuration loader and schema types.
//!
//! This module exposes the settings that tune playback, controls, library
//! scanning, state persistence and logging, plus helpers to load them from
//! disk and the environment.

mod load;
mod schema;

pub use load::state_dir;
pub use schema::*;
