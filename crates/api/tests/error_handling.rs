use axum::body::to_bytes;
use axum::http::StatusCode;
use chairbook_api::middleware::error_handling::map_error;
use chairbook_core::errors::BookingError;
use chairbook_core::models::appointment::AppointmentStatus;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::Value;

#[rstest]
#[case::not_found(
    BookingError::NotFound("Appointment not found".into()),
    StatusCode::NOT_FOUND,
    "not_found"
)]
#[case::transition(
    BookingError::InvalidTransition { action: "complete", from: AppointmentStatus::Pending },
    StatusCode::CONFLICT,
    "invalid_transition"
)]
#[case::slot(
    BookingError::SlotUnavailable("taken".into()),
    StatusCode::CONFLICT,
    "slot_unavailable"
)]
#[case::input(BookingError::InvalidInput("bad".into()), StatusCode::BAD_REQUEST, "invalid_input")]
#[case::timeout(
    BookingError::Timeout("slow".into()),
    StatusCode::SERVICE_UNAVAILABLE,
    "timeout"
)]
#[case::backend(
    BookingError::Backend(eyre::eyre!("down")),
    StatusCode::INTERNAL_SERVER_ERROR,
    "backend"
)]
#[tokio::test]
async fn test_error_mapping(
    #[case] error: BookingError,
    #[case] status: StatusCode,
    #[case] kind: &str,
) {
    let message = error.to_string();
    let response = map_error(error);

    assert_eq!(response.status(), status);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["kind"], kind);
    assert_eq!(body["error"], message);
}
