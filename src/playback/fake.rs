//! In-memory audio backend for tests.
//!
//! All resources share one `Deck` so a test can move the playhead, make
//! loads or playback fail, and inspect what is bound.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use crate::catalog::{Catalog, TrackDescriptor};
use crate::error::PlayerError;

use super::backend::{AudioBackend, AudioResource, Readiness};

#[derive(Debug, Default)]
pub struct Deck {
    /// Every path ever opened, in order.
    pub opened: Vec<PathBuf>,
    /// Path of the resource currently bound, if any.
    pub bound: Option<PathBuf>,
    /// Number of resources opened and not yet released.
    pub live: usize,
    /// Highest `live` ever observed.
    pub peak_live: usize,
    pub playing: bool,
    pub position: Duration,
    pub volume: f32,
    pub finished: bool,
    pub readiness: Readiness,
    pub fail_open: HashSet<PathBuf>,
    pub fail_play: bool,
    pub play_calls: usize,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    pub deck: Rc<RefCell<Deck>>,
}

impl FakeBackend {
    pub fn new() -> (Self, Rc<RefCell<Deck>>) {
        let backend = Self::default();
        let deck = backend.deck.clone();
        (backend, deck)
    }
}

impl AudioBackend for FakeBackend {
    type Resource = FakeResource;

    fn open(&mut self, track: &TrackDescriptor) -> Result<FakeResource, PlayerError> {
        let mut deck = self.deck.borrow_mut();
        if deck.fail_open.contains(&track.audio) {
            return Err(PlayerError::ResourceLoad {
                path: track.audio.clone(),
                reason: "missing".to_string(),
            });
        }
        deck.opened.push(track.audio.clone());
        deck.bound = Some(track.audio.clone());
        deck.live += 1;
        deck.peak_live = deck.peak_live.max(deck.live);
        deck.position = Duration::ZERO;
        deck.finished = false;
        deck.playing = false;
        Ok(FakeResource {
            deck: self.deck.clone(),
            path: track.audio.clone(),
        })
    }
}

pub struct FakeResource {
    deck: Rc<RefCell<Deck>>,
    path: PathBuf,
}

impl AudioResource for FakeResource {
    fn play(&mut self) -> Result<(), PlayerError> {
        let mut deck = self.deck.borrow_mut();
        deck.play_calls += 1;
        if deck.fail_play {
            return Err(PlayerError::ResourceLoad {
                path: self.path.clone(),
                reason: "autoplay blocked".to_string(),
            });
        }
        deck.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.deck.borrow_mut().playing = false;
    }

    fn seek(&mut self, to: Duration) -> Result<(), PlayerError> {
        self.deck.borrow_mut().position = to;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.deck.borrow_mut().volume = volume;
    }

    fn position(&self) -> Duration {
        self.deck.borrow().position
    }

    fn finished(&self) -> bool {
        self.deck.borrow().finished
    }

    fn readiness(&self) -> Readiness {
        self.deck.borrow().readiness
    }

    fn release(&mut self) {
        let mut deck = self.deck.borrow_mut();
        deck.live -= 1;
        deck.playing = false;
        if deck.bound.as_ref() == Some(&self.path) {
            deck.bound = None;
        }
    }
}

/// `name(seconds)` tracks with audio paths `/music/<name>.mp3`.
pub fn catalog(tracks: &[(&str, u64)]) -> Catalog {
    let tracks = tracks
        .iter()
        .map(|&(name, secs)| {
            TrackDescriptor::new(
                name,
                "Artist",
                format!("https://covers/{name}.png"),
                format!("/music/{name}.mp3"),
                format!("{}:{:02}", secs / 60, secs % 60),
            )
            .unwrap()
        })
        .collect();
    Catalog::new(tracks).unwrap()
}

pub fn path(name: &str) -> PathBuf {
    PathBuf::from(format!("/music/{name}.mp3"))
}
