mod cli;
mod config;
mod models;
mod player;
mod provider;
mod schedule;
mod tui;
mod utils;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use cli::args::{Cli, Commands, Overrides};
use cli::handlers;
use config::{AppConfig, PlaybackBackend};
use schedule::{PrayerService, PrayerStore, Scheduler, SystemClock};
use tui::app::AnnouncingPlayer;
use tui::events::SchedulerEvent;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The dashboard owns the terminal, so it only logs when RUST_LOG asks for it
    match cli.command {
        None => env_logger::init(),
        Some(_) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .init()
        }
    }

    let mut config = AppConfig::load().context("Loading config")?;
    handlers::apply_overrides(&mut config, &cli.overrides);

    match cli.command {
        Some(Commands::Run) => handlers::handle_run(&config, &cli.overrides)?,
        Some(Commands::Times { json }) => handlers::handle_times(&config, &cli.overrides, json)?,
        Some(Commands::Config { init }) => handlers::handle_config(&config, init)?,
        None => run_dashboard(&config, &cli.overrides)?,
    }

    Ok(())
}

/// Scheduler on a background thread, dashboard in the foreground.
fn run_dashboard(config: &AppConfig, overrides: &Overrides) -> Result<()> {
    let request = handlers::month_request(config, overrides, Local::now().date_naive());
    let location = format!("{}, {}", request.city, request.country);

    let store = Arc::new(PrayerStore::new());
    let service = PrayerService::new(Arc::clone(&store));
    let (tx, rx) = mpsc::channel();

    // Printing the prayer name would scribble over the dashboard
    let device = match config.playback.backend {
        PlaybackBackend::Stdout => None,
        PlaybackBackend::Command => Some(player::from_config(&config.playback)),
    };
    let player = AnnouncingPlayer::new(device, tx.clone());

    let mut scheduler = Scheduler::new(store, handlers::provider(config), player, SystemClock, request)
        .with_display(io::sink());

    thread::Builder::new()
        .name("scheduler".to_string())
        .spawn(move || {
            if let Err(e) = scheduler.run() {
                let _ = tx.send(SchedulerEvent::Stopped(e.to_string()));
            }
        })
        .context("Starting scheduler thread")?;

    tui::app::run(service, location, rx)
}
