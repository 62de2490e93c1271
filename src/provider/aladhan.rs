//! Blocking client for the AlAdhan `calendarByCity` endpoint.
//!
//! Docs: <https://aladhan.com/prayer-times-api#GetCalendarByCitys>. Per-prayer
//! offsets are sent as the `tune` parameter, whose order is
//! Imsak,Fajr,Sunrise,Dhuhr,Asr,Maghrib,Sunset,Isha,Midnight.

use log::{debug, info};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use super::{MonthRequest, Offsets, ProviderError, RawDay, RawMonth, TimingProvider};
use crate::models::PrayerType;

pub const DEFAULT_BASE_URL: &str = "http://api.aladhan.com";

#[derive(Debug, Deserialize)]
struct CalendarWire {
    code: u16,
    status: String,
    // A list of days on success, an error string otherwise.
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct DayWire {
    timings: HashMap<String, String>,
    date: DateWire,
    meta: MetaWire,
}

#[derive(Debug, Deserialize)]
struct DateWire {
    readable: String,
    timestamp: String,
}

#[derive(Debug, Deserialize)]
struct MetaWire {
    timezone: String,
}

pub struct AladhanClient {
    base_url: String,
    agent: ureq::Agent,
}

impl AladhanClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }
}

impl TimingProvider for AladhanClient {
    fn month_calendar(&self, request: &MonthRequest) -> Result<RawMonth, ProviderError> {
        let url = format!("{}/v1/calendarByCity", self.base_url);
        info!(
            "Requesting {}/{} timings for {}, {} from {}",
            request.month, request.year, request.city, request.country, url
        );

        let resp = self
            .agent
            .get(&url)
            .query("city", &request.city)
            .query("country", &request.country)
            .query("method", &request.method.to_string())
            .query("month", &request.month.to_string())
            .query("year", &request.year.to_string())
            .query("tune", &tune_param(&request.offsets))
            .call();

        let body = match resp {
            Ok(resp) => resp
                .into_string()
                .map_err(|e| ProviderError::Http(e.to_string()))?,
            Err(ureq::Error::Status(code, resp)) => {
                let status = resp
                    .into_string()
                    .unwrap_or_else(|_| "no response body".to_string());
                return Err(ProviderError::Status { code, status });
            }
            Err(e) => return Err(ProviderError::Http(e.to_string())),
        };

        let month = parse_calendar(&body)?;
        debug!("Provider returned {} days", month.days.len());
        Ok(month)
    }
}

fn tune_param(offsets: &Offsets) -> String {
    format!(
        "0,{},0,{},{},{},0,{},0",
        offsets.fajr, offsets.dhuhr, offsets.asr, offsets.maghrib, offsets.isha
    )
}

/// Decode a `calendarByCity` response body, keeping only the five prayers.
pub fn parse_calendar(body: &str) -> Result<RawMonth, ProviderError> {
    let wire: CalendarWire =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    if wire.code != 200 {
        let status = match wire.data {
            serde_json::Value::String(msg) => format!("{} ({})", wire.status, msg),
            _ => wire.status,
        };
        return Err(ProviderError::Status {
            code: wire.code,
            status,
        });
    }

    let days: Vec<DayWire> =
        serde_json::from_value(wire.data).map_err(|e| ProviderError::Decode(e.to_string()))?;

    let days = days
        .into_iter()
        .map(|day| {
            let timestamp = day.date.timestamp.parse::<i64>().map_err(|_| {
                ProviderError::InvalidInput(format!(
                    "day timestamp '{}' is not a unix timestamp",
                    day.date.timestamp
                ))
            })?;

            // Sunrise, Sunset, Imsak, Midnight and the night thirds are dropped here
            let timings: BTreeMap<PrayerType, String> = day
                .timings
                .into_iter()
                .filter_map(|(name, time)| name.parse::<PrayerType>().ok().map(|pt| (pt, time)))
                .collect();

            Ok(RawDay {
                readable: day.date.readable,
                timezone: day.meta.timezone,
                timestamp,
                timings,
            })
        })
        .collect::<Result<Vec<_>, ProviderError>>()?;

    Ok(RawMonth { days })
}
