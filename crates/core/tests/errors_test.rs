use std::error::Error;
use chairbook_core::{
    errors::{BookingError, BookingResult},
    models::appointment::AppointmentStatus,
};

#[test]
fn test_booking_error_display() {
    let not_found = BookingError::NotFound("Appointment not found".to_string());
    let transition = BookingError::InvalidTransition {
        action: "confirm",
        from: AppointmentStatus::Completed,
    };
    let unavailable = BookingError::SlotUnavailable("10:00-10:30 is taken".to_string());
    let invalid = BookingError::InvalidInput("bad time".to_string());
    let timeout = BookingError::Timeout("pool exhausted".to_string());
    let backend = BookingError::Backend(eyre::eyre!("Database connection failed"));

    assert_eq!(not_found.to_string(), "Resource not found: Appointment not found");
    assert_eq!(
        transition.to_string(),
        "Invalid transition: cannot confirm an appointment that is completed"
    );
    assert_eq!(unavailable.to_string(), "Slot unavailable: 10:00-10:30 is taken");
    assert_eq!(invalid.to_string(), "Invalid input: bad time");
    assert_eq!(timeout.to_string(), "Backend timed out: pool exhausted");
    assert!(backend.to_string().contains("Backend error:"));
}

#[test]
fn test_error_kinds_are_distinct() {
    let kinds = [
        BookingError::NotFound(String::new()).kind(),
        BookingError::InvalidTransition {
            action: "cancel",
            from: AppointmentStatus::Cancelled,
        }
        .kind(),
        BookingError::SlotUnavailable(String::new()).kind(),
        BookingError::InvalidInput(String::new()).kind(),
        BookingError::Timeout(String::new()).kind(),
        BookingError::Backend(eyre::eyre!("x")).kind(),
    ];

    let mut unique = kinds.to_vec();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), kinds.len());
}

#[test]
fn test_only_backend_failures_are_retryable() {
    assert!(BookingError::Timeout("slow".to_string()).is_retryable());
    assert!(BookingError::Backend(eyre::eyre!("down")).is_retryable());
    assert!(!BookingError::SlotUnavailable("taken".to_string()).is_retryable());
    assert!(!BookingError::NotFound("gone".to_string()).is_retryable());
}

#[test]
fn test_from_eyre_report() {
    let report = eyre::eyre!("connection reset");
    let error: BookingError = report.into();

    assert!(matches!(error, BookingError::Backend(_)));
    assert!(error.to_string().contains("connection reset"));
}

#[test]
fn test_booking_result() {
    let result: BookingResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: BookingResult<i32> = Err(BookingError::NotFound("Not found".to_string()));
    assert!(result.is_err());
    assert!(result.unwrap_err().source().is_none());
}
