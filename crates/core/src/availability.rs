//! # Availability Engine
//!
//! Computes the bookable start times of a service on a given date from
//! already-fetched data. Nothing here performs I/O or reads the clock, so the
//! same inputs always produce the same ordered output.
//!
//! ## Algorithm
//!
//! 1. Validate the service duration.
//! 2. Resolve the weekday of the date. A barber who is off, or a shop that is
//!    closed, yields no slots.
//! 3. Clip every barber range to the shop's opening hours and drop ranges
//!    left empty.
//! 4. Walk each clipped range in 15-minute steps, keeping candidates whose
//!    whole service interval fits before the range ends.
//! 5. Drop candidates that intersect a booked interval.
//!
//! Ranges are visited in the order the schedule stores them; the output is
//! not re-sorted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::BookingResult;
use crate::models::schedule::{BarberSchedule, DayOfWeek, ShopHours};
use crate::models::service::{SLOT_INTERVAL_MINUTES, validate_service_duration};
use crate::time::{TimeOfDay, TimeRange};

/// A bookable start time with a barber. The engine never emits taken
/// slots, so `available` is always true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub time: TimeOfDay,
    pub available: bool,
    pub barber_id: Uuid,
}

impl TimeSlot {
    pub fn open(barber_id: Uuid, time: TimeOfDay) -> Self {
        Self {
            time,
            available: true,
            barber_id,
        }
    }
}

/// Ordered start times at which a service of `service_duration_minutes` can
/// be booked with the barber on `date`.
///
/// `booked` holds the intervals of the barber's pending and confirmed
/// appointments on that date.
///
/// # Errors
///
/// * `BookingError::InvalidInput` - the duration is not a positive multiple
///   of 15 minutes
pub fn compute_available_slots(
    date: NaiveDate,
    barber_schedule: &BarberSchedule,
    shop_hours: &ShopHours,
    booked: &[TimeRange],
    service_duration_minutes: u32,
) -> BookingResult<Vec<TimeOfDay>> {
    let duration = validate_service_duration(service_duration_minutes)?;
    let day = DayOfWeek::from_date(date);

    let Some(opening) = shop_hours.for_day(day) else {
        return Ok(Vec::new());
    };
    let opening = opening.as_range();

    let mut slots = Vec::new();
    for range in barber_schedule.ranges_for(day) {
        let Some(window) = range.clip_to(&opening) else {
            continue;
        };
        slots.extend(slots_in_window(&window, duration, booked));
    }

    Ok(slots)
}

/// Start times inside one working window, every [`SLOT_INTERVAL_MINUTES`]
/// from `window.start`, whose `[start, start + duration)` fits the window and
/// misses every booked interval.
///
/// `duration` must be non-zero.
pub fn slots_in_window(window: &TimeRange, duration: u32, booked: &[TimeRange]) -> Vec<TimeOfDay> {
    let window_end = window.end.minutes();
    let mut candidate = window.start.minutes();
    let mut slots = Vec::new();

    while candidate + duration <= window_end {
        let candidate_end = candidate + duration;
        let taken = booked
            .iter()
            .any(|b| candidate < b.end.minutes() && candidate_end > b.start.minutes());

        if !taken {
            // candidate < window_end, so it is always a valid time of day
            if let Some(start) = TimeOfDay::from_minutes(candidate) {
                slots.push(start);
            }
        }
        candidate += SLOT_INTERVAL_MINUTES;
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(raw: &str) -> TimeOfDay {
        raw.parse().unwrap()
    }

    fn range(start: &str, end: &str) -> TimeRange {
        TimeRange::new(t(start), t(end)).unwrap()
    }

    #[test]
    fn window_stops_short_of_partial_trailing_slot() {
        let slots = slots_in_window(&range("09:00", "10:10"), 30, &[]);
        assert_eq!(slots, vec![t("09:00"), t("09:15"), t("09:30")]);
    }

    #[test]
    fn booked_interval_touching_candidate_does_not_block_it() {
        let slots = slots_in_window(&range("09:00", "10:00"), 30, &[range("09:30", "10:00")]);
        assert_eq!(slots, vec![t("09:00")]);
    }

    #[test]
    fn window_ending_at_last_minute_of_day() {
        let slots = slots_in_window(&range("23:00", "23:59"), 45, &[]);
        assert_eq!(slots, vec![t("23:00")]);
    }

    #[test]
    fn time_slot_serializes_with_canonical_time() {
        let barber_id = Uuid::nil();
        let slot = TimeSlot::open(barber_id, t("09:15"));

        let value = serde_json::to_value(slot).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "time": "09:15",
                "available": true,
                "barber_id": "00000000-0000-0000-0000-000000000000",
            })
        );
    }
}
