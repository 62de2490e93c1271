use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use log::debug;

use crate::models::{DailyTimetable, MonthlyTimetable, Prayer, PrayerType};
use crate::provider::{RawDay, RawMonth};

const READABLE_DATE_FORMAT: &str = "%d %b %Y";
const DATE_TIME_FORMAT: &str = "%d %b %Y %H:%M";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot resolve '{input}': {reason}")]
pub struct TimeParseError {
    pub input: String,
    pub reason: String,
}

impl TimeParseError {
    fn new(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Turn a provider month into the timetable of calls still ahead of `now`.
///
/// Indices are handed out from 0 in time order across the whole month. Any
/// day, time or timezone that cannot be resolved fails the whole build.
pub fn build(raw: &RawMonth, now: DateTime<Utc>) -> Result<MonthlyTimetable, TimeParseError> {
    build_from(raw, now, 0)
}

/// Like [`build`], numbering from `first_index` so that a rebuilt month never
/// hands out an index an earlier month already used.
pub fn build_from(
    raw: &RawMonth,
    now: DateTime<Utc>,
    first_index: u32,
) -> Result<MonthlyTimetable, TimeParseError> {
    let mut upcoming: Vec<(NaiveDate, Vec<(DateTime<FixedOffset>, PrayerType)>)> = Vec::new();

    for day in &raw.days {
        let (date, events) = resolve_day(day)?;
        let events: Vec<_> = events.into_iter().filter(|(time, _)| *time > now).collect();
        if events.is_empty() {
            continue;
        }
        upcoming.push((date, events));
    }
    upcoming.sort_by_key(|(date, _)| *date);

    let mut next_index = first_index;
    let days = upcoming
        .into_iter()
        .map(|(date, events)| {
            let events = events
                .into_iter()
                .map(|(time, prayer_type)| {
                    let prayer = Prayer {
                        index: next_index,
                        prayer_type,
                        time,
                        play: true,
                    };
                    next_index += 1;
                    prayer
                })
                .collect();
            DailyTimetable { date, events }
        })
        .collect();

    Ok(MonthlyTimetable::new(days))
}

/// Resolve one day's calls, sorted by time.
///
/// Two calls on the same instant fail the day: the loop fires one call per
/// instant, so the second would never play.
fn resolve_day(
    day: &RawDay,
) -> Result<(NaiveDate, Vec<(DateTime<FixedOffset>, PrayerType)>), TimeParseError> {
    let tz = parse_timezone(&day.timezone)?;
    let date = NaiveDate::parse_from_str(day.readable.trim(), READABLE_DATE_FORMAT)
        .map_err(|e| TimeParseError::new(&day.readable, e.to_string()))?;

    if let Some(stamped) = DateTime::from_timestamp(day.timestamp, 0) {
        let stamped = stamped.with_timezone(&tz).date_naive();
        if stamped != date {
            debug!(
                "Timestamp {} falls on {} in {}, using readable date {}",
                day.timestamp, stamped, tz.name(), date
            );
        }
    }

    let mut events = day
        .timings
        .iter()
        .map(|(prayer_type, clock)| Ok((resolve_time(&day.readable, clock, tz)?, *prayer_type)))
        .collect::<Result<Vec<_>, TimeParseError>>()?;
    events.sort();

    if let Some(pair) = events.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        return Err(TimeParseError::new(
            format!("{} {}", day.readable.trim(), day.timings[&pair[1].1]),
            format!("{} falls on the same time as {}", pair[1].1, pair[0].1),
        ));
    }

    Ok((date, events))
}

fn parse_timezone(name: &str) -> Result<Tz, TimeParseError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| TimeParseError::new(name, "unknown IANA timezone"))
}

/// Resolve `"01 Jan 2021"` + `"04:14 (NZDT)"` to an instant in `tz`.
///
/// The bracketed abbreviation is ignored; `tz` decides the offset. A local time
/// repeated by a DST fall-back resolves to its first occurrence.
pub fn resolve_time(
    readable: &str,
    clock: &str,
    tz: Tz,
) -> Result<DateTime<FixedOffset>, TimeParseError> {
    let clock = clock.split_once('(').map_or(clock, |(time, _)| time).trim();
    let input = format!("{} {}", readable.trim(), clock);

    let naive = NaiveDateTime::parse_from_str(&input, DATE_TIME_FORMAT)
        .map_err(|e| TimeParseError::new(&input, e.to_string()))?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.fixed_offset())
        .ok_or_else(|| TimeParseError::new(&input, format!("local time does not exist in {}", tz.name())))
}
