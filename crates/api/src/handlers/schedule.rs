use axum::{Json, extract::State};
use chairbook_core::models::schedule::{Barber, BarberSchedule};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    extract::{AppJson, AppPath},
    middleware::error_handling::AppError,
};

#[axum::debug_handler]
pub async fn get_barber_schedule(
    State(state): State<Arc<ApiState>>,
    AppPath(barber_id): AppPath<Uuid>,
) -> Result<Json<BarberSchedule>, AppError> {
    let schedule = state.scheduling.barber_schedule(barber_id).await?;
    Ok(Json(schedule))
}

/// Replaces the weekly working hours of a barber. Days missing from the body
/// become days off.
#[axum::debug_handler]
pub async fn update_barber_schedule(
    State(state): State<Arc<ApiState>>,
    AppPath(barber_id): AppPath<Uuid>,
    AppJson(schedule): AppJson<BarberSchedule>,
) -> Result<Json<Barber>, AppError> {
    let barber = state
        .scheduling
        .update_barber_schedule(barber_id, schedule)
        .await?;
    Ok(Json(barber))
}
