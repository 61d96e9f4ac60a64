//! Track selection policy.
//!
//! Everything here is pure: given the current index, the requested target and
//! the catalog size, decide which index plays next. Only shuffle consumes
//! randomness, and the caller supplies the generator.

use std::fmt;

use rand::Rng;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlayMode {
    /// Step through the catalog in order.
    #[default]
    Sequential,
    /// Restart the current track instead of moving.
    Repeat,
    /// Pick any track at random (the current one included).
    Shuffle,
}

impl PlayMode {
    /// `Sequential -> Repeat -> Shuffle -> Sequential`.
    pub fn cycle(self) -> Self {
        match self {
            PlayMode::Sequential => PlayMode::Repeat,
            PlayMode::Repeat => PlayMode::Shuffle,
            PlayMode::Shuffle => PlayMode::Sequential,
        }
    }
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayMode::Sequential => "normal",
            PlayMode::Repeat => "repeat",
            PlayMode::Shuffle => "shuffle",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

/// What happens when sequential stepping runs off either end of the catalog.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SequentialBoundary {
    /// Continue from the other end.
    #[default]
    Wrap,
    /// Refuse the step; the switch becomes a no-op.
    Stop,
}

/// A switch request before the play mode has had its say.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Target {
    /// Move one track relative to the current one.
    Step(Direction),
    /// Jump to a specific catalog index.
    Index(usize),
}

/// Resolve `target` into the index that should become active.
///
/// Returns `None` when the request lands outside `0..len`: an explicit index
/// past the end (any mode), or a sequential step past an end under
/// [`SequentialBoundary::Stop`].
pub fn resolve<R: Rng + ?Sized>(
    mode: PlayMode,
    current: usize,
    target: Target,
    len: usize,
    boundary: SequentialBoundary,
    rng: &mut R,
) -> Option<usize> {
    if len == 0 {
        return None;
    }
    if let Target::Index(i) = target {
        if i >= len {
            return None;
        }
    }

    match mode {
        PlayMode::Repeat => Some(current),
        PlayMode::Shuffle => Some(rng.gen_range(0..len)),
        PlayMode::Sequential => match target {
            Target::Index(i) => Some(i),
            Target::Step(direction) => step(current, direction, len, boundary),
        },
    }
}

fn step(current: usize, direction: Direction, len: usize, boundary: SequentialBoundary) -> Option<usize> {
    match (direction, boundary) {
        (Direction::Forward, SequentialBoundary::Wrap) => Some((current + 1) % len),
        (Direction::Backward, SequentialBoundary::Wrap) => Some((current + len - 1) % len),
        (Direction::Forward, SequentialBoundary::Stop) => {
            Some(current + 1).filter(|&next| next < len)
        }
        (Direction::Backward, SequentialBoundary::Stop) => current.checked_sub(1),
    }
}
