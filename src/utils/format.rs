use chrono::{DateTime, Datelike, FixedOffset};
use std::time::Duration;

/// Format a duration in seconds to "Xh Ym" or "Ym" string
pub fn format_duration_secs(secs: i64) -> String {
    if secs <= 0 {
        return "now".to_string();
    }
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", secs)
    }
}

pub fn format_duration(duration: Duration) -> String {
    format_duration_secs(duration.as_secs() as i64)
}

/// "Friday 1-January-2021"
pub fn format_day(time: &DateTime<FixedOffset>) -> String {
    format!("{} {}", time.format("%A"), format_date(time))
}

fn format_date(time: &DateTime<FixedOffset>) -> String {
    format!("{}-{}-{}", time.day(), time.format("%B"), time.year())
}

/// "04:14:00 AM"
pub fn format_clock(time: &DateTime<FixedOffset>) -> String {
    time.format("%I:%M:%S %p").to_string()
}

pub fn play_label(play: bool) -> &'static str {
    if play { "Yes" } else { "No" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_round_down_to_minutes() {
        assert_eq!(format_duration_secs(0), "now");
        assert_eq!(format_duration_secs(-5), "now");
        assert_eq!(format_duration_secs(42), "42s");
        assert_eq!(format_duration_secs(14 * 60 + 59), "14m");
        assert_eq!(format_duration(Duration::from_secs(8 * 3600 + 16 * 60)), "8h 16m");
    }

    #[test]
    fn formats_local_day_and_clock() {
        let t = DateTime::parse_from_rfc3339("2021-01-01T16:05:00+13:00").unwrap();
        assert_eq!(format_day(&t), "Friday 1-January-2021");
        assert_eq!(format_clock(&t), "04:05:00 PM");
        assert_eq!(play_label(false), "No");
    }
}
