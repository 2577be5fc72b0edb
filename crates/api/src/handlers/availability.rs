//! # Availability Handlers
//!
//! Serves the bookable start times of a service with a barber on a date.
//! The computation itself lives in `chairbook_core::scheduling`; this layer
//! only parses the query and shapes the response.

use axum::{Json, extract::State};
use chairbook_core::{availability::TimeSlot, time::parse_date};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    extract::{AppPath, AppQuery},
    middleware::error_handling::AppError,
};

/// Query parameters for the availability endpoint
///
/// * `date` - Day to search, as `YYYY-MM-DD`
/// * `service_id` - Service whose duration sizes the slots
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
    pub service_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub barber_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    /// Free start times, in schedule order.
    pub slots: Vec<TimeSlot>,
}

/// Lists bookable start times
///
/// # Endpoint
///
/// ```text
/// GET /api/barbers/:barber_id/availability?date=2024-06-03&service_id=<uuid>
/// ```
///
/// A past date, an inactive barber, or a closed day yields an empty list
/// rather than an error.
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    AppPath(barber_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let date = parse_date(&query.date)?;

    let slots = state
        .scheduling
        .available_slots(barber_id, date, query.service_id)
        .await?
        .into_iter()
        .map(|time| TimeSlot::open(barber_id, time))
        .collect();

    Ok(Json(AvailabilityResponse {
        barber_id,
        service_id: query.service_id,
        date,
        slots,
    }))
}
