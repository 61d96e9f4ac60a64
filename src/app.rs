//! Application module: UI-side state for the terminal front end.
//!
//! Playback state lives in the player; `App` only tracks the list cursor,
//! the details popup and short-lived status messages.

mod model;

pub use model::*;
