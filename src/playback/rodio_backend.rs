//! `rodio` implementation of the audio backend.
//!
//! Every track gets its own paused `Sink` on the shared output stream; the
//! engine drops the previous sink before asking for the next one.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};

use crate::catalog::TrackDescriptor;
use crate::error::PlayerError;

use super::backend::{AudioBackend, AudioResource, Readiness};

pub struct RodioBackend {
    stream: OutputStream,
}

impl RodioBackend {
    /// Open the default output device.
    pub fn open_default() -> Result<Self, PlayerError> {
        let mut stream =
            OutputStreamBuilder::open_default_stream().map_err(|e| PlayerError::Unsupported {
                feature: "audio output",
                reason: e.to_string(),
            })?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);
        Ok(Self { stream })
    }
}

fn load_error(track: &TrackDescriptor, reason: impl ToString) -> PlayerError {
    PlayerError::ResourceLoad {
        path: track.audio.clone(),
        reason: reason.to_string(),
    }
}

impl AudioBackend for RodioBackend {
    type Resource = RodioResource;

    /// Create a paused `Sink` for `track`.
    fn open(&mut self, track: &TrackDescriptor) -> Result<RodioResource, PlayerError> {
        let file = File::open(&track.audio).map_err(|e| load_error(track, e))?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| load_error(track, e))?;

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.pause();

        Ok(RodioResource {
            sink,
            path: track.audio.clone(),
        })
    }
}

pub struct RodioResource {
    sink: Sink,
    path: PathBuf,
}

impl AudioResource for RodioResource {
    fn play(&mut self) -> Result<(), PlayerError> {
        if self.sink.empty() {
            return Err(PlayerError::ResourceLoad {
                path: self.path.clone(),
                reason: "source has nothing left to play".to_string(),
            });
        }
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn seek(&mut self, to: Duration) -> Result<(), PlayerError> {
        self.sink
            .try_seek(to)
            .map_err(|e| PlayerError::ResourceLoad {
                path: self.path.clone(),
                reason: format!("seek failed: {e:?}"),
            })
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn finished(&self) -> bool {
        self.sink.empty()
    }

    // Decoder::new has already probed the stream by the time the sink exists.
    fn readiness(&self) -> Readiness {
        Readiness::Ready
    }

    fn release(&mut self) {
        self.sink.stop();
    }
}
