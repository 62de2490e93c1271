pub mod prayer;
pub mod timetable;

pub use prayer::{Prayer, PrayerType};
pub use timetable::{DailyTimetable, MonthlyTimetable};
