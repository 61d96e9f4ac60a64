//! Everything that can ask the player to do something.
//!
//! The keyboard and the desktop media session each hold one binding into a
//! shared command channel; the event loop drains that channel and applies
//! each command to the player.

mod dispatch;
mod keys;

pub use dispatch::{Command, CommandSender, ControlDispatch, Flow, Registration, Source, apply};
pub use keys::{KeyAction, map_key};
