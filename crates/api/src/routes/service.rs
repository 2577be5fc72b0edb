use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/barbershops/:barbershop_id/services",
            post(handlers::service::create_service),
        )
        .route("/api/services/:id", get(handlers::service::get_service))
}
