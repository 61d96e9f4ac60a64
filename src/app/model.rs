//! The `App` model: cursor, popup and transient message.

use std::time::Instant;

pub struct App {
    pub selected: usize,
    track_count: usize,
    /// Keep the cursor on the active track until the user moves it.
    pub follow_playback: bool,
    pub details: bool,
    message: Option<(String, Instant)>,
}

impl App {
    /// Create an `App` over `track_count` entries with the cursor at `selected`.
    pub fn new(track_count: usize, selected: usize) -> Self {
        Self {
            selected: selected.min(track_count.saturating_sub(1)),
            track_count,
            follow_playback: true,
            details: false,
            message: None,
        }
    }

    /// Move the cursor to the next entry, wrapping to the top.
    pub fn next(&mut self) {
        if self.track_count == 0 {
            return;
        }
        self.follow_playback = false;
        self.selected = (self.selected + 1) % self.track_count;
    }

    /// Move the cursor to the previous entry, wrapping to the bottom.
    pub fn prev(&mut self) {
        if self.track_count == 0 {
            return;
        }
        self.follow_playback = false;
        self.selected = match self.selected {
            0 => self.track_count - 1,
            i => i - 1,
        };
    }

    /// The active track changed; move the cursor along if following.
    pub fn follow(&mut self, index: usize) {
        if self.follow_playback && index < self.track_count {
            self.selected = index;
        }
    }

    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    pub fn toggle_details(&mut self) {
        self.details = !self.details;
    }

    pub fn show_message(&mut self, text: impl Into<String>, until: Instant) {
        self.message = Some((text.into(), until));
    }

    /// The message still on screen at `now`, if any.
    pub fn message(&self, now: Instant) -> Option<&str> {
        match &self.message {
            Some((text, until)) if now < *until => Some(text.as_str()),
            _ => None,
        }
    }
}
