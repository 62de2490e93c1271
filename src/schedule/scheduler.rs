use chrono::{DateTime, Datelike, FixedOffset, Utc};
use log::{error, info, warn};
use std::convert::Infallible;
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;

use super::builder::{self, TimeParseError};
use super::store::PrayerStore;
use crate::player::{PlaybackError, Player};
use crate::provider::{MonthRequest, ProviderError, TimingProvider};
use crate::utils::format::format_duration;
use crate::utils::table::write_timetable;

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("fetching prayer timings failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("building timetable failed: {0}")]
    TimeParse(#[from] TimeParseError),
    #[error("playing adhan failed: {0}")]
    Playback(#[from] PlaybackError),
}

/// Wall clock plus the one blocking wait the scheduler performs.
pub trait Clock: Send {
    fn now(&self) -> DateTime<Utc>;
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Calendar month after `(year, month)`.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Plays each prayer call of the month at its time, then moves on to the next
/// month, forever.
///
/// The store lock is never held while waiting. Whether a call is played is
/// decided by re-reading it from the store once its time arrives, so toggles
/// made during the wait are honoured.
pub struct Scheduler<P, D, C = SystemClock> {
    store: Arc<PrayerStore>,
    provider: P,
    player: D,
    clock: C,
    request: MonthRequest,
    display: Box<dyn Write + Send>,
    color: bool,
    last_fired: Option<DateTime<FixedOffset>>,
}

impl<P, D, C> Scheduler<P, D, C>
where
    P: TimingProvider + Send,
    D: Player,
    C: Clock,
{
    pub fn new(
        store: Arc<PrayerStore>,
        provider: P,
        player: D,
        clock: C,
        request: MonthRequest,
    ) -> Self {
        Self {
            store,
            provider,
            player,
            clock,
            request,
            display: Box::new(io::stdout()),
            color: io::stdout().is_terminal(),
            last_fired: None,
        }
    }

    /// Where the timetable is printed after every build.
    pub fn with_display(mut self, display: impl Write + Send + 'static) -> Self {
        self.display = Box::new(display);
        self.color = false;
        self
    }

    /// Runs month after month. Only returns when a build or a playback fails.
    pub fn run(&mut self) -> Result<Infallible, ScheduleError> {
        info!("Running prayeralarm scheduler...");
        let (mut year, mut month) = (self.request.year, self.request.month);
        loop {
            if let Err(e) = self.run_cycle(year, month) {
                error!("Scheduler stopped: {}", e);
                return Err(e);
            }
            (year, month) = self.roll(year, month);
        }
    }

    /// Builds `(year, month)` and plays its calls until none are left.
    pub fn run_cycle(&mut self, year: i32, month: u32) -> Result<(), ScheduleError> {
        self.build(year, month)?;
        while self.wait_and_fire()? {}
        info!("No prayer calls left for {}/{}", month, year);
        Ok(())
    }

    fn build(&mut self, year: i32, month: u32) -> Result<(), ScheduleError> {
        let request = self.request.for_month(year, month);
        let raw = self.provider.month_calendar(&request)?;
        let timetable = builder::build_from(&raw, self.clock.now(), self.store.next_index())?;
        info!(
            "Scheduled {} prayer calls for {}/{} in {}, {}",
            timetable.len(),
            month,
            year,
            request.city,
            request.country
        );
        self.store.replace(timetable);

        let snapshot = self.store.snapshot();
        if let Err(e) = write_timetable(&mut self.display, &snapshot, self.color) {
            warn!("Could not display timetable: {}", e);
        }
        Ok(())
    }

    /// Waits for the next call and fires it. `false` once the month is spent.
    fn wait_and_fire(&mut self) -> Result<bool, ScheduleError> {
        let now = self.clock.now();
        let floor = match self.last_fired {
            Some(fired) if fired > now => fired.with_timezone(&Utc),
            _ => now,
        };

        // Muted calls are waited for too; the decision is made at fire time
        let Some(next) = self.store.next_after(&floor) else {
            return Ok(false);
        };

        let remaining = next.time.with_timezone(&Utc) - now;
        match remaining.to_std() {
            Ok(wait) if !wait.is_zero() => {
                info!(
                    "Adhan will play at {}, waiting {} for {} adhan...",
                    next.time,
                    format_duration(wait),
                    next.prayer_type
                );
                self.clock.sleep(wait);
            }
            _ => {
                warn!("{} adhan at {} already elapsed, skipping", next.prayer_type, next.time);
                self.last_fired = Some(next.time);
                return Ok(true);
            }
        }

        self.fire(next.time)?;
        Ok(true)
    }

    fn fire(&mut self, time: DateTime<FixedOffset>) -> Result<(), ScheduleError> {
        self.last_fired = Some(time);
        match self.store.get_by_time(&time) {
            Ok(prayer) if prayer.play => {
                info!("Playing {} adhan at {}...", prayer.prayer_type, prayer.time);
                self.player.play(prayer.prayer_type)?;
            }
            Ok(prayer) => {
                info!(
                    "Skipping {} adhan at {} since it is muted",
                    prayer.prayer_type, prayer.time
                );
            }
            Err(e) => warn!("{}, timetable changed while waiting", e),
        }
        Ok(())
    }

    /// Next month to build, never one already behind the clock.
    fn roll(&self, year: i32, month: u32) -> (i32, u32) {
        let next = next_month(year, month);
        let today = self.clock.now();
        let current = (today.year(), today.month());
        let target = next.max(current);
        info!("Rolling over to {}/{}", target.1, target.0);
        target
    }
}
