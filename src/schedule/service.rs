use chrono::{DateTime, TimeZone};
use log::info;
use std::sync::Arc;

use super::store::{NotFoundError, PrayerStore};
use crate::models::{MonthlyTimetable, Prayer};

/// What callers outside the scheduler may do with the timetable.
///
/// Every call returns as soon as the store lock is released; none of them wait
/// on the scheduler.
#[derive(Debug, Clone)]
pub struct PrayerService {
    store: Arc<PrayerStore>,
}

impl PrayerService {
    pub fn new(store: Arc<PrayerStore>) -> Self {
        Self { store }
    }

    pub fn timetable(&self) -> MonthlyTimetable {
        self.store.snapshot()
    }

    /// Flip whether the call with `index` plays. Indices from a month that has
    /// since been replaced are not found.
    pub fn toggle(&self, index: u32) -> Result<Prayer, NotFoundError> {
        let prayer = self.store.toggle_play_flag(index)?;
        info!(
            "{} adhan at {} is now {}",
            prayer.prayer_type,
            prayer.time,
            if prayer.play { "on" } else { "muted" }
        );
        Ok(prayer)
    }

    pub fn mute_all(&self) -> MonthlyTimetable {
        self.store.set_all_play_flags(false);
        info!("Muted all prayer calls");
        self.store.snapshot()
    }

    pub fn unmute_all(&self) -> MonthlyTimetable {
        self.store.set_all_play_flags(true);
        info!("Unmuted all prayer calls");
        self.store.snapshot()
    }

    pub fn next_prayer<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<Prayer> {
        self.store.next_after(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrayerType;
    use crate::provider::{RawDay, RawMonth};
    use crate::schedule::builder;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn auckland_day(readable: &str) -> RawDay {
        RawDay {
            readable: readable.into(),
            timezone: "Pacific/Auckland".into(),
            timestamp: 0,
            timings: [
                (PrayerType::Fajr, "04:14"),
                (PrayerType::Dhuhr, "12:30"),
                (PrayerType::Asr, "17:24"),
                (PrayerType::Maghrib, "21:06"),
                (PrayerType::Isha, "22:45"),
            ]
            .into_iter()
            .map(|(pt, t)| (pt, t.to_string()))
            .collect::<BTreeMap<_, _>>(),
        }
    }

    fn service_at_start_of(readable: &str) -> PrayerService {
        let raw = RawMonth {
            days: vec![auckland_day(readable), auckland_day("02 Jan 2021")],
        };
        let now = chrono_tz::Pacific::Auckland
            .with_ymd_and_hms(2021, 1, 1, 4, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let store = Arc::new(PrayerStore::new());
        store.replace(builder::build(&raw, now).unwrap());
        PrayerService::new(store)
    }

    #[test]
    fn toggle_is_an_involution() {
        let service = service_at_start_of("01 Jan 2021");
        let before = service.timetable();

        let muted = service.toggle(0).unwrap();
        assert_eq!((muted.index, muted.play), (0, false));
        assert_eq!(muted.prayer_type, PrayerType::Fajr);

        let restored = service.toggle(0).unwrap();
        assert!(restored.play);
        assert_eq!(service.timetable(), before);
    }

    #[test]
    fn toggle_unknown_index_is_not_found() {
        let service = service_at_start_of("01 Jan 2021");
        assert_eq!(service.toggle(10), Err(NotFoundError::Index(10)));
        // Nothing changed
        assert!(service.timetable().events().all(|p| p.play));
    }

    #[test]
    fn mute_all_then_unmute_all() {
        let service = service_at_start_of("01 Jan 2021");
        service.toggle(3).unwrap();

        let muted = service.mute_all();
        assert_eq!(muted.len(), 10);
        assert!(muted.events().all(|p| !p.play));

        let unmuted = service.unmute_all();
        assert!(unmuted.events().all(|p| p.play));
    }

    #[test]
    fn toggle_after_new_month_misses_old_index() {
        let service = service_at_start_of("01 Jan 2021");
        assert!(service.toggle(9).is_ok());

        // February is as long as January was
        let store = Arc::clone(&service.store);
        let feb = RawMonth {
            days: vec![auckland_day("01 Feb 2021"), auckland_day("02 Feb 2021")],
        };
        let now = chrono_tz::Pacific::Auckland
            .with_ymd_and_hms(2021, 2, 1, 0, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        store.replace(builder::build_from(&feb, now, store.next_index()).unwrap());
        assert_eq!(service.timetable().len(), 10);

        for stale in 0..10 {
            assert_eq!(service.toggle(stale), Err(NotFoundError::Index(stale)));
        }
        assert!(service.timetable().events().all(|p| p.play));

        let first = service.toggle(10).unwrap();
        assert_eq!(first.prayer_type, PrayerType::Fajr);
        assert_eq!(first.time.to_rfc3339(), "2021-02-01T04:14:00+13:00");
    }

    #[test]
    fn next_prayer_skips_elapsed_but_not_muted() {
        let service = service_at_start_of("01 Jan 2021");
        service.toggle(1).unwrap();

        let after_fajr = chrono_tz::Pacific::Auckland
            .with_ymd_and_hms(2021, 1, 1, 5, 0, 0)
            .unwrap();
        let next = service.next_prayer(&after_fajr).unwrap();
        assert_eq!((next.index, next.play), (1, false));
    }
}
