use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::debug;

use crate::config::ControlsSettings;
use crate::playback::AudioBackend;
use crate::player::Player;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    TogglePlay,
    Play,
    Pause,
    Previous,
    Next,
    /// Jump to a catalog entry.
    Select(usize),
    VolumeUp,
    VolumeDown,
    CycleMode,
    /// Move the playhead by this many seconds.
    SeekBy(i64),
    Quit,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    Keyboard,
    MediaSession,
}

#[derive(Debug, Default)]
struct Bindings {
    next_id: u64,
    active: HashMap<Source, u64>,
}

/// Owner of the command channel and of the one live binding per source.
pub struct ControlDispatch {
    bindings: Arc<Mutex<Bindings>>,
    tx: Sender<Command>,
    rx: Receiver<Command>,
}

impl Default for ControlDispatch {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlDispatch {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            bindings: Arc::new(Mutex::new(Bindings::default())),
            tx,
            rx,
        }
    }

    /// Bind `source`, replacing any earlier binding for it.
    ///
    /// Senders from a replaced or dropped registration stop delivering.
    pub fn register(&self, source: Source) -> Registration {
        let mut id = 0;
        if let Ok(mut bindings) = self.bindings.lock() {
            bindings.next_id += 1;
            id = bindings.next_id;
            if bindings.active.insert(source, id).is_some() {
                debug!(?source, "replacing command binding");
            }
        }
        Registration {
            sender: CommandSender {
                source,
                id,
                bindings: self.bindings.clone(),
                tx: self.tx.clone(),
            },
        }
    }

    /// Commands received since the last call, oldest first.
    pub fn drain(&self) -> Vec<Command> {
        self.rx.try_iter().collect()
    }
}

/// A live binding. Dropping it unbinds the source.
pub struct Registration {
    sender: CommandSender,
}

impl Registration {
    pub fn sender(&self) -> CommandSender {
        self.sender.clone()
    }

    pub fn is_active(&self) -> bool {
        self.sender.is_active()
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        let sender = &self.sender;
        if let Ok(mut bindings) = sender.bindings.lock() {
            if bindings.active.get(&sender.source) == Some(&sender.id) {
                bindings.active.remove(&sender.source);
                debug!(source = ?sender.source, "released command binding");
            }
        }
    }
}

#[derive(Clone)]
pub struct CommandSender {
    source: Source,
    id: u64,
    bindings: Arc<Mutex<Bindings>>,
    tx: Sender<Command>,
}

impl CommandSender {
    /// Queue `cmd`. Returns `false` if the binding is gone or the loop has exited.
    pub fn send(&self, cmd: Command) -> bool {
        if !self.is_active() {
            debug!(source = ?self.source, ?cmd, "dropping command from a released binding");
            return false;
        }
        self.tx.send(cmd).is_ok()
    }

    fn is_active(&self) -> bool {
        self.bindings
            .lock()
            .map(|b| b.active.get(&self.source) == Some(&self.id))
            .unwrap_or(false)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Apply one command to the player.
pub fn apply<B: AudioBackend>(
    player: &mut Player<B>,
    cmd: Command,
    controls: &ControlsSettings,
    now: Instant,
) -> Flow {
    debug!(?cmd, "applying command");
    match cmd {
        Command::TogglePlay => {
            player.toggle_play();
        }
        Command::Play => {
            player.play();
        }
        Command::Pause => player.pause(),
        Command::Previous => {
            player.previous(now);
        }
        Command::Next => {
            player.next(now);
        }
        Command::Select(index) => {
            player.select(index, now);
        }
        Command::VolumeUp => {
            player.adjust_volume(controls.volume_step);
        }
        Command::VolumeDown => {
            player.adjust_volume(-controls.volume_step);
        }
        Command::CycleMode => {
            player.cycle_mode();
        }
        Command::SeekBy(seconds) => player.seek_by(seconds),
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}
