pub mod builder;
pub mod scheduler;
pub mod service;
pub mod store;

pub use builder::{build, TimeParseError};
pub use scheduler::{next_month, Clock, ScheduleError, Scheduler, SystemClock};
pub use service::PrayerService;
pub use store::{NotFoundError, PrayerStore};
