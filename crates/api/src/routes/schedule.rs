use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/barbers/:barber_id/schedule",
        get(handlers::schedule::get_barber_schedule)
            .put(handlers::schedule::update_barber_schedule),
    )
}
