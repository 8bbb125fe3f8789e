//! Calendar windows and timestamp conversion.
//!
//! # Responsibility
//! - Compute day and week windows used by the daily and weekly list models.
//! - Map weekdays to the fixed Sunday-first label table.
//! - Convert wall-clock timestamps to and from persisted epoch milliseconds.
//!
//! # Invariants
//! - Timestamps are local wall-clock values. The persisted integer is the
//!   epoch-millisecond encoding of that wall-clock value, so day boundaries
//!   never depend on the process time zone.
//! - Day windows are half-open: `[midnight, next midnight)`.
//! - Week windows are closed: `[start 00:00:00, end 23:59:59]`.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Sunday-first weekday labels shared by aggregate entries and change
/// notifications.
pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Number of days in one statistics window.
pub const DAYS_PER_WEEK: u64 = 7;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// First day of a statistics week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    fn weekday(self) -> Weekday {
        match self {
            Self::Sunday => Weekday::Sun,
            Self::Monday => Weekday::Mon,
        }
    }

    /// Parses a config value such as `sunday` or `Mon`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Some(Self::Sunday),
            "monday" | "mon" => Some(Self::Monday),
            _ => None,
        }
    }
}

/// Returns the half-open window covering `date`.
pub fn day_range(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(NaiveTime::MIN);
    let end = (date + Days::new(1)).and_time(NaiveTime::MIN);
    (start, end)
}

/// Week containing a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    /// First calendar day of the week; the memoization key.
    pub start_day: NaiveDate,
    /// Last calendar day of the week (start + 6 days).
    pub end_day: NaiveDate,
}

impl WeekWindow {
    /// Computes the week containing `date`.
    pub fn containing(date: NaiveDate, week_start: WeekStart) -> Self {
        let offset = u64::from(
            (date.weekday().num_days_from_monday() + 7
                - week_start.weekday().num_days_from_monday())
                % 7,
        );
        let start_day = date - Days::new(offset);
        let end_day = start_day + Days::new(DAYS_PER_WEEK - 1);
        Self { start_day, end_day }
    }

    /// First instant of the window.
    pub fn start_time(&self) -> NaiveDateTime {
        self.start_day.and_time(NaiveTime::MIN)
    }

    /// Last whole second of the window.
    pub fn end_time(&self) -> NaiveDateTime {
        self.end_day
            .and_hms_opt(23, 59, 59)
            .unwrap_or_else(|| self.end_day.and_time(NaiveTime::MIN))
    }

    /// Iterates the seven days of the window in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_day.iter_days().take(DAYS_PER_WEEK as usize)
    }
}

/// Index of `weekday` in [`WEEKDAY_NAMES`].
pub fn weekday_index(weekday: Weekday) -> usize {
    weekday.num_days_from_sunday() as usize
}

/// Label of `weekday` from [`WEEKDAY_NAMES`].
pub fn weekday_label(weekday: Weekday) -> &'static str {
    WEEKDAY_NAMES[weekday_index(weekday)]
}

/// Encodes a wall-clock timestamp for persistence.
pub fn to_epoch_ms(value: NaiveDateTime) -> i64 {
    value.and_utc().timestamp_millis()
}

/// Decodes a persisted timestamp. Returns `None` when out of range.
pub fn from_epoch_ms(value: i64) -> Option<NaiveDateTime> {
    chrono::DateTime::from_timestamp_millis(value).map(|ts| ts.naive_utc())
}

/// Calendar day of a persisted timestamp as an integer day number.
///
/// Rounds toward negative infinity, like the day grouping in the aggregate
/// SQL, so timestamps before 1970 stay on their own day.
pub fn epoch_day(value: i64) -> i64 {
    value.div_euclid(MILLIS_PER_DAY)
}

/// Midnight of a day number produced by [`epoch_day`].
pub fn from_epoch_day(day: i64) -> Option<NaiveDateTime> {
    day.checked_mul(MILLIS_PER_DAY).and_then(from_epoch_ms)
}

/// Formats a wall-clock time as `HH:MM`.
pub fn clock_label(value: NaiveDateTime) -> String {
    value.format("%H:%M").to_string()
}
