use axum::{Json, extract::State, http::StatusCode};
use chairbook_core::models::service::{CreateServiceRequest, Service};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    extract::{AppJson, AppPath},
    middleware::error_handling::AppError,
};

/// Adds a service to a barbershop's catalogue. The duration must be a
/// positive multiple of 15 minutes.
#[axum::debug_handler]
pub async fn create_service(
    State(state): State<Arc<ApiState>>,
    AppPath(barbershop_id): AppPath<Uuid>,
    AppJson(payload): AppJson<CreateServiceRequest>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    let service = state
        .scheduling
        .create_service(barbershop_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(service)))
}

#[axum::debug_handler]
pub async fn get_service(
    State(state): State<Arc<ApiState>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Service>, AppError> {
    let service = state.scheduling.service(id).await?;
    Ok(Json(service))
}
