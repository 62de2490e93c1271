use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate, Utc};
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;

use crate::cli::args::Overrides;
use crate::config::AppConfig;
use crate::player;
use crate::provider::{AladhanClient, MonthRequest, TimingProvider};
use crate::schedule::{self, PrayerStore, Scheduler, SystemClock};
use crate::utils::table::write_timetable;

// ─── Settings ────────────────────────────────────────────────────────────────

/// Fold command line overrides into the loaded config.
pub fn apply_overrides(config: &mut AppConfig, overrides: &Overrides) {
    if let Some(city) = &overrides.city {
        config.location.city = city.clone();
    }
    if let Some(country) = &overrides.country {
        config.location.country = country.clone();
    }
    if let Some(offsets) = overrides.offsets {
        config.offsets = offsets;
    }
    if let Some(player) = overrides.player {
        config.playback.backend = player;
    }
}

/// The first month to schedule: the one asked for, else the one containing `today`.
pub fn month_request(config: &AppConfig, overrides: &Overrides, today: NaiveDate) -> MonthRequest {
    MonthRequest {
        city: config.location.city.clone(),
        country: config.location.country.clone(),
        method: config.location.method,
        offsets: config.offsets,
        month: overrides.month.unwrap_or(today.month()),
        year: overrides.year.unwrap_or(today.year()),
    }
}

pub fn provider(config: &AppConfig) -> AladhanClient {
    AladhanClient::new(
        &config.provider.base_url,
        Duration::from_secs(config.provider.timeout_secs),
    )
}

// ─── Run ─────────────────────────────────────────────────────────────────────

pub fn handle_run(config: &AppConfig, overrides: &Overrides) -> Result<()> {
    let request = month_request(config, overrides, Local::now().date_naive());
    log::info!(
        "City: {}, Country: {}, Offsets: {}, Year: {}, Month: {}",
        request.city,
        request.country,
        request.offsets,
        request.year,
        request.month
    );

    let store = Arc::new(PrayerStore::new());
    let mut scheduler = Scheduler::new(
        store,
        provider(config),
        player::from_config(&config.playback),
        SystemClock,
        request,
    );

    // Only ever returns with an error
    let err = match scheduler.run() {
        Ok(never) => match never {},
        Err(e) => e,
    };
    Err::<(), _>(err).context("Prayer call scheduler stopped")
}

// ─── Times ───────────────────────────────────────────────────────────────────

pub fn handle_times(config: &AppConfig, overrides: &Overrides, json: bool) -> Result<()> {
    let request = month_request(config, overrides, Local::now().date_naive());
    let raw = provider(config)
        .month_calendar(&request)
        .with_context(|| format!("Fetching timings for {}/{}", request.month, request.year))?;
    let timetable = schedule::build(&raw, Utc::now()).context("Building timetable")?;

    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &timetable)?;
        writeln!(out)?;
    } else {
        writeln!(
            out,
            "\n  Prayer calls for {}, {} ({}/{})\n",
            request.city, request.country, request.month, request.year
        )?;
        let color = io::stdout().is_terminal();
        write_timetable(&mut out, &timetable, color)?;
    }
    Ok(())
}

// ─── Config ──────────────────────────────────────────────────────────────────

pub fn handle_config(config: &AppConfig, init: bool) -> Result<()> {
    let path = AppConfig::config_path()?;
    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
        } else {
            AppConfig::default().save()?;
            println!("Wrote default config to {}", path.display());
        }
        return Ok(());
    }

    println!("# {}", path.display());
    print!("{}", config.to_toml()?);
    Ok(())
}
