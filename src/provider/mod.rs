pub mod aladhan;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::models::PrayerType;

pub use aladhan::AladhanClient;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("http error: {0}")]
    Http(String),
    #[error("provider returned {code}: {status}")]
    Status { code: u16, status: String },
    #[error("json error: {0}")]
    Decode(String),
    #[error("invalid provider data: {0}")]
    InvalidInput(String),
}

/// Minutes added to each raw prayer time before it is returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offsets {
    #[serde(default)]
    pub fajr: i32,
    #[serde(default)]
    pub dhuhr: i32,
    #[serde(default)]
    pub asr: i32,
    #[serde(default)]
    pub maghrib: i32,
    #[serde(default)]
    pub isha: i32,
}

impl std::fmt::Display for Offsets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.fajr, self.dhuhr, self.asr, self.maghrib, self.isha
        )
    }
}

/// Parses `"fajr,dhuhr,asr,maghrib,isha"` minute offsets, e.g. `"0,2,0,-1,0"`.
impl FromStr for Offsets {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<i32>()
                    .map_err(|_| anyhow::anyhow!("Offset '{}' is not a whole number of minutes", p.trim()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [fajr, dhuhr, asr, maghrib, isha] => Ok(Offsets {
                fajr: *fajr,
                dhuhr: *dhuhr,
                asr: *asr,
                maghrib: *maghrib,
                isha: *isha,
            }),
            _ => Err(anyhow::anyhow!(
                "Expected 5 comma separated offsets (fajr,dhuhr,asr,maghrib,isha), got {}",
                parts.len()
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthRequest {
    pub city: String,
    pub country: String,
    pub method: u8,
    pub offsets: Offsets,
    pub month: u32,
    pub year: i32,
}

impl MonthRequest {
    pub fn for_month(&self, year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            ..self.clone()
        }
    }
}

/// One calendar day as reported by the provider, reduced to the five prayers.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDay {
    /// Human readable date, e.g. `"01 Jan 2021"`.
    pub readable: String,
    /// IANA timezone name, e.g. `"Pacific/Auckland"`.
    pub timezone: String,
    pub timestamp: i64,
    /// Local clock time per prayer, e.g. `"04:14 (NZDT)"`.
    pub timings: BTreeMap<PrayerType, String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMonth {
    pub days: Vec<RawDay>,
}

/// Source of monthly prayer timings.
pub trait TimingProvider {
    fn month_calendar(&self, request: &MonthRequest) -> Result<RawMonth, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offsets_in_fixed_order() {
        let offsets: Offsets = "1, 2,3,-4,5".parse().unwrap();
        assert_eq!(
            offsets,
            Offsets {
                fajr: 1,
                dhuhr: 2,
                asr: 3,
                maghrib: -4,
                isha: 5
            }
        );
        assert_eq!(offsets.to_string(), "1,2,3,-4,5");
    }

    #[test]
    fn rejects_wrong_offset_count_or_text() {
        assert!("0,0,0,0".parse::<Offsets>().is_err());
        assert!("0,0,0,0,0,0".parse::<Offsets>().is_err());
        assert!("0,0,x,0,0".parse::<Offsets>().is_err());
    }

    #[test]
    fn for_month_keeps_location() {
        let req = MonthRequest {
            city: "Auckland".into(),
            country: "NewZealand".into(),
            method: 3,
            offsets: Offsets::default(),
            month: 12,
            year: 2020,
        };
        let next = req.for_month(2021, 1);
        assert_eq!(next.city, "Auckland");
        assert_eq!((next.year, next.month), (2021, 1));
    }
}
