//! # Appointment Handlers
//!
//! Booking, lifecycle transitions, and the client/barber agenda views.
//! Status changes go through dedicated `confirm`, `complete` and `cancel`
//! endpoints; `PATCH` only touches notes and payment status.

use axum::{Json, extract::State, http::StatusCode};
use chairbook_core::{
    agenda::Agenda,
    models::appointment::{
        Appointment, CancelAppointmentRequest, CreateAppointmentRequest, UpdateAppointmentRequest,
    },
    time::parse_date,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    extract::{AppJson, AppPath, AppQuery, OptionalJson},
    middleware::error_handling::AppError,
};

/// Body of `POST /api/appointments`
#[derive(Debug, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub client_id: Uuid,
    #[serde(flatten)]
    pub appointment: CreateAppointmentRequest,
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: String,
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let appointment = state
        .appointments
        .create(payload.client_id, payload.appointment)
        .await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<ApiState>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    Ok(Json(state.appointments.get(id).await?))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<ApiState>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    Ok(Json(state.appointments.update(id, payload).await?))
}

#[axum::debug_handler]
pub async fn confirm_appointment(
    State(state): State<Arc<ApiState>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    Ok(Json(state.appointments.confirm(id).await?))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(state): State<Arc<ApiState>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    Ok(Json(state.appointments.complete(id).await?))
}

/// The body may be omitted, and so may the `reason` in it. A body that is
/// present but malformed is rejected.
#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<ApiState>>,
    AppPath(id): AppPath<Uuid>,
    OptionalJson(payload): OptionalJson<CancelAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    let reason = payload.and_then(|body| body.reason);
    Ok(Json(state.appointments.cancel(id, reason).await?))
}

#[axum::debug_handler]
pub async fn get_client_appointments(
    State(state): State<Arc<ApiState>>,
    AppPath(client_id): AppPath<Uuid>,
) -> Result<Json<Agenda>, AppError> {
    Ok(Json(state.appointments.client_agenda(client_id).await?))
}

#[axum::debug_handler]
pub async fn get_barber_appointments(
    State(state): State<Arc<ApiState>>,
    AppPath(barber_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<DayQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let date = parse_date(&query.date)?;
    Ok(Json(state.appointments.barber_day(barber_id, date).await?))
}
