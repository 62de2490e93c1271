use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use super::prayer::Prayer;

/// The upcoming prayer calls of one calendar day, ascending by time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTimetable {
    pub date: NaiveDate,
    pub events: Vec<Prayer>,
}

/// Every upcoming prayer call of a month, ascending by date.
///
/// Flattened, the events are ordered by time and by index at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlyTimetable {
    pub days: Vec<DailyTimetable>,
}

impl MonthlyTimetable {
    pub fn new(days: Vec<DailyTimetable>) -> Self {
        Self { days }
    }

    pub fn events(&self) -> impl Iterator<Item = &Prayer> {
        self.days.iter().flat_map(|d| d.events.iter())
    }

    pub fn events_mut(&mut self) -> impl Iterator<Item = &mut Prayer> {
        self.days.iter_mut().flat_map(|d| d.events.iter_mut())
    }

    pub fn len(&self) -> usize {
        self.days.iter().map(|d| d.events.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(|d| d.events.is_empty())
    }

    pub fn find(&self, index: u32) -> Option<&Prayer> {
        self.events().find(|p| p.index == index)
    }

    pub fn find_mut(&mut self, index: u32) -> Option<&mut Prayer> {
        self.events_mut().find(|p| p.index == index)
    }

    pub fn find_by_time(&self, time: &DateTime<FixedOffset>) -> Option<&Prayer> {
        self.events().find(|p| p.time == *time)
    }

    /// Earliest event strictly after `instant`, muted or not.
    pub fn next_after<Tz: chrono::TimeZone>(&self, instant: &DateTime<Tz>) -> Option<&Prayer> {
        self.events().find(|p| p.time > *instant)
    }
}
