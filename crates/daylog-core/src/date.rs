//! Date key normalization
//!
//! Day レコードは `YYYY-MM-DD` 形式の日付キーで識別されます。
//! 曜日の判定はホストのタイムゾーンに依存せず、常に基準タイムゾーン
//! (America/Chicago) のローカル日付で行います。

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Weekday};
use chrono_tz::Tz;
use serde::Serialize;

use crate::{Error, Result};

/// Timezone that defines the "local civil day" for date keys and routing
pub const REFERENCE_TZ: Tz = chrono_tz::America::Chicago;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Number of cells in a Sunday-first six-week month grid
const GRID_DAYS: u64 = 42;

/// Three-letter weekday bucket used for channel routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeekdayKey {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl WeekdayKey {
    /// All buckets, Monday first
    pub const ALL: [WeekdayKey; 7] = [
        WeekdayKey::Mon,
        WeekdayKey::Tue,
        WeekdayKey::Wed,
        WeekdayKey::Thu,
        WeekdayKey::Fri,
        WeekdayKey::Sat,
        WeekdayKey::Sun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeekdayKey::Mon => "MON",
            WeekdayKey::Tue => "TUE",
            WeekdayKey::Wed => "WED",
            WeekdayKey::Thu => "THU",
            WeekdayKey::Fri => "FRI",
            WeekdayKey::Sat => "SAT",
            WeekdayKey::Sun => "SUN",
        }
    }
}

impl From<Weekday> for WeekdayKey {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => WeekdayKey::Mon,
            Weekday::Tue => WeekdayKey::Tue,
            Weekday::Wed => WeekdayKey::Wed,
            Weekday::Thu => WeekdayKey::Thu,
            Weekday::Fri => WeekdayKey::Fri,
            Weekday::Sat => WeekdayKey::Sat,
            Weekday::Sun => WeekdayKey::Sun,
        }
    }
}

impl fmt::Display for WeekdayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeekdayKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_uppercase();
        WeekdayKey::ALL
            .into_iter()
            .find(|key| key.as_str() == upper)
            .ok_or_else(|| Error::Validation(format!("Unknown weekday: {}", s)))
    }
}

/// Format an instant as the date key of its civil day in the reference timezone
pub fn date_key<T: TimeZone>(instant: &DateTime<T>) -> String {
    instant
        .with_timezone(&REFERENCE_TZ)
        .format(DATE_KEY_FORMAT)
        .to_string()
}

/// Parse a strict `YYYY-MM-DD` date key
///
/// Rejects unpadded fields, trailing text and impossible dates such as
/// `2023-02-29`.
pub fn parse_date_key(key: &str) -> Result<NaiveDate> {
    let invalid = || Error::Validation(format!("Invalid date '{}': expected YYYY-MM-DD", key));

    if key.len() != 10 {
        return Err(invalid());
    }

    let date = NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).map_err(|_| invalid())?;

    // %Y accepts signs and %m/%d accept unpadded values
    if date.format(DATE_KEY_FORMAT).to_string() != key {
        return Err(invalid());
    }

    Ok(date)
}

/// Derive the weekday bucket of a date key at local midnight in the reference timezone
pub fn weekday_key(key: &str) -> Result<WeekdayKey> {
    let date = parse_date_key(key)?;
    let midnight = date.and_time(chrono::NaiveTime::MIN);

    let weekday = match REFERENCE_TZ.from_local_datetime(&midnight).earliest() {
        Some(local) => local.weekday(),
        // Chicago never skips midnight, but a gap would still be the same civil day
        None => date.weekday(),
    };

    Ok(weekday.into())
}

/// Inclusive date-key window covering a month as a Sunday-first six-week grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    /// Month key (YYYY-MM)
    pub month: String,
    /// First cell (a Sunday, on or before the 1st)
    pub start: String,
    /// Last cell, 41 days after `start`
    pub end: String,
}

/// Parse a `YYYY-MM` month key into (year, month)
pub fn parse_month_key(key: &str) -> Result<(i32, u32)> {
    let invalid = || Error::Validation(format!("Invalid month '{}': expected YYYY-MM", key));

    if key.len() != 7 {
        return Err(invalid());
    }

    let first = parse_date_key(&format!("{}-01", key)).map_err(|_| invalid())?;
    Ok((first.year(), first.month()))
}

/// Compute the 42-day grid window for a month
pub fn month_grid(year: i32, month: u32) -> Result<MonthGrid> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::Validation(format!("Invalid month: {}-{}", year, month)))?;

    let offset = u64::from(first.weekday().num_days_from_sunday());
    let out_of_range = || Error::Validation(format!("Month out of range: {}-{:02}", year, month));

    let start = first.checked_sub_days(Days::new(offset)).ok_or_else(out_of_range)?;
    let end = start.checked_add_days(Days::new(GRID_DAYS - 1)).ok_or_else(out_of_range)?;

    Ok(MonthGrid {
        month: first.format("%Y-%m").to_string(),
        start: start.format(DATE_KEY_FORMAT).to_string(),
        end: end.format(DATE_KEY_FORMAT).to_string(),
    })
}
