//! Minute-granularity wall-clock primitives.
//!
//! A [`TimeOfDay`] is stored as minutes since midnight, so comparisons and
//! interval arithmetic are plain integer operations. Its canonical text form
//! is zero-padded `HH:mm`, which keeps string ordering and value ordering
//! identical.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{BookingError, BookingResult};

pub const MINUTES_PER_HOUR: u32 = 60;
pub const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> BookingResult<Self> {
        if hour >= 24 || minute >= MINUTES_PER_HOUR {
            return Err(BookingError::InvalidInput(format!(
                "Time {hour:02}:{minute:02} is out of range"
            )));
        }
        Ok(Self {
            minutes: (hour * MINUTES_PER_HOUR + minute) as u16,
        })
    }

    /// Returns `None` when `minutes` does not fall on the same day.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self {
            minutes: minutes as u16,
        })
    }

    pub fn minutes(self) -> u32 {
        u32::from(self.minutes)
    }

    pub fn hour(self) -> u32 {
        self.minutes() / MINUTES_PER_HOUR
    }

    pub fn minute(self) -> u32 {
        self.minutes() % MINUTES_PER_HOUR
    }

    /// Adds a duration, refusing to wrap past midnight.
    pub fn checked_add_minutes(self, minutes: u32) -> Option<Self> {
        self.minutes()
            .checked_add(minutes)
            .and_then(Self::from_minutes)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = BookingError;

    /// Accepts `HH:mm` and `HH:mm:ss` with zero seconds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BookingError::InvalidInput(format!("Invalid time '{s}', expected HH:mm"));

        let mut parts = s.split(':');
        let hour = parts.next().ok_or_else(invalid)?;
        let minute = parts.next().ok_or_else(invalid)?;
        if let Some(seconds) = parts.next() {
            if seconds != "00" {
                return Err(invalid());
            }
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        let two_digits = |part: &str| -> Option<u32> {
            if part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit()) {
                part.parse().ok()
            } else {
                None
            }
        };

        let hour = two_digits(hour).ok_or_else(invalid)?;
        let minute = two_digits(minute).ok_or_else(invalid)?;
        Self::new(hour, minute)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl From<TimeOfDay> for NaiveTime {
    fn from(time: TimeOfDay) -> Self {
        NaiveTime::from_num_seconds_from_midnight_opt(time.minutes() * 60, 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl TryFrom<NaiveTime> for TimeOfDay {
    type Error = BookingError;

    fn try_from(time: NaiveTime) -> Result<Self, Self::Error> {
        if time.second() != 0 || time.nanosecond() != 0 {
            return Err(BookingError::InvalidInput(format!(
                "Time {time} is not on a minute boundary"
            )));
        }
        Self::new(time.hour(), time.minute())
    }
}

/// Half-open working or booked interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

#[derive(Deserialize)]
struct RawTimeRange {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = BookingError;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        TimeRange::new(raw.start, raw.end)
    }
}

impl TimeRange {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> BookingResult<Self> {
        if start >= end {
            return Err(BookingError::InvalidInput(format!(
                "Range {start}-{end} must start before it ends"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Intersection with `bounds`, or `None` when nothing is left.
    pub fn clip_to(&self, bounds: &TimeRange) -> Option<TimeRange> {
        let start = self.start.max(bounds.start);
        let end = self.end.min(bounds.end);
        TimeRange::new(start, end).ok()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Parses a `YYYY-MM-DD` calendar date without any timezone shift.
pub fn parse_date(raw: &str) -> BookingResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        BookingError::InvalidInput(format!("Invalid date '{raw}', expected YYYY-MM-DD"))
    })
}
