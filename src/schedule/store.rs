use chrono::{DateTime, FixedOffset};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::models::{MonthlyTimetable, Prayer};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NotFoundError {
    #[error("no prayer call with index {0} in the current timetable")]
    Index(u32),
    #[error("no prayer call scheduled at {0}")]
    Time(DateTime<FixedOffset>),
}

/// Holder of the current month's timetable, shared between the scheduler and
/// its callers.
///
/// Every operation takes the lock for its own duration only. Indices are only
/// meaningful against the timetable currently held: timetables built from
/// [`next_index`] never reuse an index, so after [`replace`] any index from the
/// previous month misses.
///
/// [`next_index`]: PrayerStore::next_index
/// [`replace`]: PrayerStore::replace
#[derive(Debug, Default)]
pub struct PrayerStore {
    timetable: RwLock<MonthlyTimetable>,
    next_index: AtomicU32,
}

impl PrayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, timetable: MonthlyTimetable) {
        let mut current = self.timetable.write();
        if let Some(last) = timetable.events().map(|p| p.index).max() {
            self.next_index.fetch_max(last.saturating_add(1), Ordering::SeqCst);
        }
        *current = timetable;
    }

    /// First index no timetable held so far has used.
    pub fn next_index(&self) -> u32 {
        self.next_index.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> MonthlyTimetable {
        self.timetable.read().clone()
    }

    pub fn len(&self) -> usize {
        self.timetable.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.timetable.read().is_empty()
    }

    pub fn get(&self, index: u32) -> Result<Prayer, NotFoundError> {
        self.timetable
            .read()
            .find(index)
            .cloned()
            .ok_or(NotFoundError::Index(index))
    }

    pub fn get_by_time(&self, time: &DateTime<FixedOffset>) -> Result<Prayer, NotFoundError> {
        self.timetable
            .read()
            .find_by_time(time)
            .cloned()
            .ok_or(NotFoundError::Time(*time))
    }

    pub fn next_after<Tz: chrono::TimeZone>(&self, instant: &DateTime<Tz>) -> Option<Prayer> {
        self.timetable.read().next_after(instant).cloned()
    }

    pub fn set_play_flag(&self, index: u32, play: bool) -> Result<Prayer, NotFoundError> {
        let mut timetable = self.timetable.write();
        let prayer = timetable.find_mut(index).ok_or(NotFoundError::Index(index))?;
        prayer.play = play;
        Ok(prayer.clone())
    }

    /// Flip `play` for one call; read and write happen under the same lock.
    pub fn toggle_play_flag(&self, index: u32) -> Result<Prayer, NotFoundError> {
        let mut timetable = self.timetable.write();
        let prayer = timetable.find_mut(index).ok_or(NotFoundError::Index(index))?;
        prayer.play = !prayer.play;
        Ok(prayer.clone())
    }

    pub fn set_all_play_flags(&self, play: bool) {
        let mut timetable = self.timetable.write();
        for prayer in timetable.events_mut() {
            prayer.play = play;
        }
    }
}
