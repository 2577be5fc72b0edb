use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use chairbook_core::{
    availability::compute_available_slots,
    errors::BookingError,
    models::schedule::{BarberSchedule, DayOfWeek, OpeningHours, ShopHours},
    time::{TimeOfDay, TimeRange},
};

fn t(raw: &str) -> TimeOfDay {
    raw.parse().expect("valid time")
}

fn range(start: &str, end: &str) -> TimeRange {
    TimeRange::new(t(start), t(end)).expect("valid range")
}

fn times(raw: &[&str]) -> Vec<TimeOfDay> {
    raw.iter().map(|s| t(s)).collect()
}

// 2024-06-03 is a Monday
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

fn shop(open: &str, close: &str) -> ShopHours {
    ShopHours::new().with_day(
        DayOfWeek::Monday,
        Some(OpeningHours::new(t(open), t(close)).unwrap()),
    )
}

fn barber(ranges: Vec<TimeRange>) -> BarberSchedule {
    BarberSchedule::new().with_day(DayOfWeek::Monday, ranges)
}

#[test]
fn test_morning_shift_without_bookings() {
    let slots = compute_available_slots(
        monday(),
        &barber(vec![range("09:00", "12:00")]),
        &shop("09:00", "18:00"),
        &[],
        30,
    )
    .unwrap();

    assert_eq!(
        slots,
        times(&[
            "09:00", "09:15", "09:30", "09:45", "10:00", "10:15", "10:30", "10:45", "11:00",
            "11:15", "11:30"
        ])
    );
}

#[test]
fn test_existing_booking_removes_overlapping_candidates() {
    let slots = compute_available_slots(
        monday(),
        &barber(vec![range("09:00", "12:00")]),
        &shop("09:00", "18:00"),
        &[range("10:00", "10:30")],
        30,
    )
    .unwrap();

    assert!(slots.contains(&t("09:30")));
    assert!(!slots.contains(&t("09:45")));
    assert!(!slots.contains(&t("10:00")));
    assert!(!slots.contains(&t("10:15")));
    assert!(slots.contains(&t("10:30")));
    assert_eq!(slots.len(), 8);
}

#[test]
fn test_barber_range_is_clipped_to_shop_hours() {
    let slots = compute_available_slots(
        monday(),
        &barber(vec![range("08:00", "20:00")]),
        &shop("09:00", "18:00"),
        &[],
        60,
    )
    .unwrap();

    assert_eq!(slots.first(), Some(&t("09:00")));
    assert_eq!(slots.last(), Some(&t("17:00")));
}

#[rstest]
#[case::longer_than_range(45, vec![range("09:00", "09:40")], 0)]
#[case::exactly_range_length(45, vec![range("09:00", "09:45")], 1)]
#[case::single_quarter(15, vec![range("09:00", "10:00")], 4)]
#[case::two_shifts(60, vec![range("09:00", "11:00"), range("14:00", "16:00")], 10)]
fn test_slot_counts(
    #[case] duration: u32,
    #[case] ranges: Vec<TimeRange>,
    #[case] expected: usize,
) {
    let slots =
        compute_available_slots(monday(), &barber(ranges), &shop("08:00", "20:00"), &[], duration)
            .unwrap();

    assert_eq!(slots.len(), expected);
}

#[test]
fn test_duration_equal_to_range_yields_start_only() {
    let slots = compute_available_slots(
        monday(),
        &barber(vec![range("13:00", "14:30")]),
        &shop("09:00", "18:00"),
        &[],
        90,
    )
    .unwrap();

    assert_eq!(slots, times(&["13:00"]));
}

#[test]
fn test_barber_off_or_shop_closed_yields_nothing() {
    let tuesday = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
    let schedule = barber(vec![range("09:00", "12:00")]);

    let barber_off =
        compute_available_slots(tuesday, &schedule, &shop("09:00", "18:00"), &[], 30).unwrap();
    let shop_closed = compute_available_slots(
        monday(),
        &schedule,
        &ShopHours::new().with_day(DayOfWeek::Monday, None),
        &[],
        30,
    )
    .unwrap();
    let explicitly_off = compute_available_slots(
        monday(),
        &BarberSchedule::new().with_day(DayOfWeek::Monday, vec![]),
        &shop("09:00", "18:00"),
        &[],
        30,
    )
    .unwrap();

    assert!(barber_off.is_empty());
    assert!(shop_closed.is_empty());
    assert!(explicitly_off.is_empty());
}

#[test]
fn test_ranges_are_emitted_in_schedule_order() {
    // Deliberately not chronological: the engine must not re-sort.
    let slots = compute_available_slots(
        monday(),
        &barber(vec![range("14:00", "15:00"), range("09:00", "10:00")]),
        &shop("08:00", "20:00"),
        &[],
        60,
    )
    .unwrap();

    assert_eq!(slots, times(&["14:00", "09:00"]));
}

#[test]
fn test_range_outside_shop_hours_is_skipped() {
    let slots = compute_available_slots(
        monday(),
        &barber(vec![range("06:00", "08:30"), range("10:00", "11:00")]),
        &shop("09:00", "18:00"),
        &[],
        30,
    )
    .unwrap();

    assert_eq!(slots, times(&["10:00", "10:15", "10:30"]));
}

#[rstest]
#[case(0)]
#[case(20)]
#[case(7)]
fn test_invalid_duration_is_rejected(#[case] duration: u32) {
    let result = compute_available_slots(
        monday(),
        &barber(vec![range("09:00", "12:00")]),
        &shop("09:00", "18:00"),
        &[],
        duration,
    );

    assert!(matches!(result, Err(BookingError::InvalidInput(_))));
}

#[test]
fn test_slots_respect_window_and_bookings() {
    let schedule = barber(vec![range("08:00", "12:10"), range("13:05", "19:00")]);
    let hours = shop("09:00", "18:00");
    let opening = range("09:00", "18:00");
    let booked = vec![range("09:30", "10:15"), range("13:45", "14:00"), range("16:00", "17:30")];

    for duration in [15, 30, 45, 60, 90] {
        let slots =
            compute_available_slots(monday(), &schedule, &hours, &booked, duration).unwrap();
        let again =
            compute_available_slots(monday(), &schedule, &hours, &booked, duration).unwrap();
        assert_eq!(slots, again);

        for slot in slots {
            let end = slot.checked_add_minutes(duration).unwrap();
            let interval = TimeRange::new(slot, end).unwrap();

            let governing = schedule
                .ranges_for(DayOfWeek::Monday)
                .iter()
                .filter_map(|r| r.clip_to(&opening))
                .find(|w| w.start <= slot && end <= w.end);
            assert!(governing.is_some(), "{interval} escapes the working window");
            assert!(
                booked.iter().all(|b| !b.overlaps(&interval)),
                "{interval} overlaps a booking"
            );
        }
    }
}
