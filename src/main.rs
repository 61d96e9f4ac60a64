mod app;
mod catalog;
mod config;
mod control;
mod error;
mod logging;
mod mpris;
mod playback;
mod player;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
