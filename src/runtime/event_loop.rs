use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::App;
use crate::config;
use crate::control::{self, Command, CommandSender, ControlDispatch, Flow, KeyAction};
use crate::mpris::MprisHandle;
use crate::playback::AudioBackend;
use crate::player::{Player, TickOutcome};
use crate::runtime::mpris_sync::{Published, update_mpris};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// What the media session currently shows.
    pub published: Published,
    /// Active index the cursor last followed.
    last_index: usize,
    next_sample: Instant,
}

impl EventLoopState {
    pub fn new<B: AudioBackend>(player: &Player<B>) -> Self {
        Self {
            published: Published::default(),
            last_index: player.snapshot().index,
            next_sample: Instant::now(),
        }
    }
}

/// Main terminal event loop: samples playback, keeps MPRIS and the screen in
/// sync, and applies commands from every source. Returns `Ok(())` when
/// shutdown is requested.
#[allow(clippy::too_many_arguments)]
pub fn run<B: AudioBackend>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player<B>,
    dispatch: &ControlDispatch,
    keyboard: &CommandSender,
    mpris: &MprisHandle,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let sample_every = Duration::from_millis(settings.playback.poll_interval_ms);
    let message_for = Duration::from_millis(settings.ui.message_ms);

    loop {
        let now = Instant::now();
        player.service(now);
        if now >= state.next_sample {
            if player.tick(now) != TickOutcome::Idle {
                debug!(index = player.snapshot().index, "end of track handled");
            }
            state.next_sample = now + sample_every;
        }

        let index = player.snapshot().index;
        if index != state.last_index {
            app.follow(index);
            state.last_index = index;
        }

        // Covers changes from media keys and auto-advance too.
        update_mpris(mpris, player, &mut state.published);

        let snapshot = player.snapshot();
        let active = player.is_active();
        terminal.draw(|f| {
            ui::draw(
                f,
                app,
                player.catalog(),
                &snapshot,
                active,
                &settings.ui,
                &settings.controls,
                now,
            )
        })?;

        for cmd in dispatch.drain() {
            if control::apply(player, cmd, &settings.controls, Instant::now()) == Flow::Quit {
                return Ok(());
            }
            if cmd == Command::CycleMode {
                let mode = player.snapshot().mode;
                app.show_message(format!(" mode: {mode} "), Instant::now() + message_for);
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_key_event(key, settings, app, keyboard);
            }
        }
    }
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    keyboard: &CommandSender,
) {
    let Some(action) = control::map_key(&key, settings.controls.scrub_seconds) else {
        return;
    };
    match action {
        KeyAction::Command(cmd) => {
            if matches!(cmd, Command::Next | Command::Previous) {
                app.follow_playback_on();
            }
            keyboard.send(cmd);
        }
        KeyAction::CursorUp => app.prev(),
        KeyAction::CursorDown => app.next(),
        KeyAction::PlaySelected => {
            app.follow_playback_on();
            keyboard.send(Command::Select(app.selected));
        }
        KeyAction::ToggleDetails => app.toggle_details(),
    }
}
