use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::time::{TimeOfDay, TimeRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Weekday of a wall-clock calendar date (proleptic Gregorian, no timezone).
    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A barber's hours for one weekday.
///
/// On the wire `null` and `[]` both mean closed; an `Open` day always holds
/// at least one range.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<Vec<TimeRange>>", into = "Option<Vec<TimeRange>>")]
pub enum DayWorkingHours {
    #[default]
    Closed,
    Open(Vec<TimeRange>),
}

impl DayWorkingHours {
    pub fn open(ranges: Vec<TimeRange>) -> Self {
        if ranges.is_empty() {
            DayWorkingHours::Closed
        } else {
            DayWorkingHours::Open(ranges)
        }
    }

    pub fn ranges(&self) -> &[TimeRange] {
        match self {
            DayWorkingHours::Closed => &[],
            DayWorkingHours::Open(ranges) => ranges,
        }
    }
}

impl From<Option<Vec<TimeRange>>> for DayWorkingHours {
    fn from(raw: Option<Vec<TimeRange>>) -> Self {
        DayWorkingHours::open(raw.unwrap_or_default())
    }
}

impl From<DayWorkingHours> for Option<Vec<TimeRange>> {
    fn from(hours: DayWorkingHours) -> Self {
        match hours {
            DayWorkingHours::Closed => None,
            DayWorkingHours::Open(ranges) => Some(ranges),
        }
    }
}

/// Weekly recurring working hours of a barber. Missing weekdays are closed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BarberSchedule {
    days: BTreeMap<DayOfWeek, DayWorkingHours>,
}

impl BarberSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_day(mut self, day: DayOfWeek, ranges: Vec<TimeRange>) -> Self {
        self.set_day(day, DayWorkingHours::open(ranges));
        self
    }

    pub fn set_day(&mut self, day: DayOfWeek, hours: DayWorkingHours) {
        self.days.insert(day, hours);
    }

    pub fn day(&self, day: DayOfWeek) -> &DayWorkingHours {
        const CLOSED: &DayWorkingHours = &DayWorkingHours::Closed;
        self.days.get(&day).unwrap_or(CLOSED)
    }

    pub fn ranges_for(&self, day: DayOfWeek) -> &[TimeRange] {
        self.day(day).ranges()
    }

    /// Ranges of each day must be chronological and pairwise disjoint.
    pub fn validate(&self) -> BookingResult<()> {
        for (day, hours) in &self.days {
            for pair in hours.ranges().windows(2) {
                if pair[1].start < pair[0].end {
                    return Err(BookingError::InvalidInput(format!(
                        "Working hours on {day} must be ordered and not overlap: {} then {}",
                        pair[0], pair[1]
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Opening hours of a shop on one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOpeningHours")]
pub struct OpeningHours {
    pub open: TimeOfDay,
    pub close: TimeOfDay,
}

#[derive(Deserialize)]
struct RawOpeningHours {
    open: TimeOfDay,
    close: TimeOfDay,
}

impl TryFrom<RawOpeningHours> for OpeningHours {
    type Error = BookingError;

    fn try_from(raw: RawOpeningHours) -> Result<Self, Self::Error> {
        OpeningHours::new(raw.open, raw.close)
    }
}

impl OpeningHours {
    pub fn new(open: TimeOfDay, close: TimeOfDay) -> BookingResult<Self> {
        TimeRange::new(open, close)?;
        Ok(Self { open, close })
    }

    pub fn as_range(&self) -> TimeRange {
        TimeRange {
            start: self.open,
            end: self.close,
        }
    }
}

/// Shop-level opening hours: a single open/close pair per day, or closed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShopHours {
    days: BTreeMap<DayOfWeek, Option<OpeningHours>>,
}

impl ShopHours {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_day(mut self, day: DayOfWeek, hours: Option<OpeningHours>) -> Self {
        self.days.insert(day, hours);
        self
    }

    pub fn for_day(&self, day: DayOfWeek) -> Option<OpeningHours> {
        self.days.get(&day).copied().flatten()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barber {
    pub id: Uuid,
    pub barbershop_id: Uuid,
    pub name: String,
    pub working_hours: BarberSchedule,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barbershop {
    pub id: Uuid,
    pub name: String,
    pub opening_hours: ShopHours,
}
