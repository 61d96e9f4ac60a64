use std::env;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, warn};

use crate::app::App;
use crate::control::{ControlDispatch, Source};
use crate::logging;
use crate::playback::RodioBackend;
use crate::player::Player;

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_warning) = settings::load_settings();
    let log_path = logging::init(&settings.logging);
    if let Some(msg) = config_warning {
        warn!("{msg}");
        if log_path.is_none() {
            eprintln!("segue: {msg}");
        }
    }
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let source = startup::catalog_source(env::args().nth(1), &settings.library);
    let catalog = startup::load_catalog(&source, &settings.library).inspect_err(|e| {
        error!(error = %e, "no catalog to play");
    })?;

    let backend = RodioBackend::open_default().inspect_err(|e| {
        error!(error = %e, "cannot start audio");
    })?;

    let mut player = Player::new(
        catalog,
        backend,
        startup::player_options(&settings.playback),
        Box::new(startup::index_store(&settings.state)),
    );
    let mut app = App::new(player.catalog().len(), player.snapshot().index);

    let dispatch = ControlDispatch::new();
    let keyboard = dispatch.register(Source::Keyboard);
    let media = dispatch.register(Source::MediaSession);
    let mpris = crate::mpris::spawn_mpris(media.sender());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new(&player);
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut player,
            &dispatch,
            &keyboard.sender(),
            &mpris,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        error!(error = %e, "event loop failed");
    }
    info!("shutting down");
    run_result
}
