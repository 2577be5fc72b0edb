use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/appointments",
            post(handlers::appointment::create_appointment),
        )
        .route(
            "/api/appointments/:id",
            get(handlers::appointment::get_appointment)
                .patch(handlers::appointment::update_appointment),
        )
        .route(
            "/api/appointments/:id/confirm",
            post(handlers::appointment::confirm_appointment),
        )
        .route(
            "/api/appointments/:id/complete",
            post(handlers::appointment::complete_appointment),
        )
        .route(
            "/api/appointments/:id/cancel",
            post(handlers::appointment::cancel_appointment),
        )
        .route(
            "/api/clients/:client_id/appointments",
            get(handlers::appointment::get_client_appointments),
        )
        .route(
            "/api/barbers/:barber_id/appointments",
            get(handlers::appointment::get_barber_appointments),
        )
}
