//! # Chairbook API
//!
//! HTTP surface of the Chairbook booking service: availability search,
//! barber schedules, the service catalogue, and the appointment lifecycle.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into calls on the core services
//! - **Middleware**: Error mapping to HTTP responses
//! - **Config**: Environment-driven settings
//!
//! Handlers never touch storage directly. They go through
//! [`AppointmentManager`] and [`SchedulingService`], which are wired to a
//! concrete store when [`ApiState`] is built.

/// Configuration module for API settings
pub mod config;
/// Extractors that report rejections as JSON errors
pub mod extract;
/// Request handlers
pub mod handlers;
/// Error handling shared by all handlers
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use chairbook_core::clock::Clock;
use chairbook_core::lifecycle::AppointmentManager;
use chairbook_core::repository::{AppointmentRepository, ScheduleRepository, ServiceRepository};
use chairbook_core::scheduling::SchedulingService;
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub appointments: AppointmentManager,
    pub scheduling: SchedulingService,
}

impl ApiState {
    /// Wires both core services to one store that implements every repository.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use chairbook_api::ApiState;
    /// use chairbook_core::clock::SystemClock;
    /// use chairbook_db::memory::InMemoryStore;
    ///
    /// let state = ApiState::from_store(Arc::new(InMemoryStore::new()), Arc::new(SystemClock));
    /// ```
    pub fn from_store<S>(store: Arc<S>, clock: Arc<dyn Clock>) -> Self
    where
        S: ScheduleRepository + ServiceRepository + AppointmentRepository + 'static,
    {
        Self {
            appointments: AppointmentManager::new(store.clone(), store.clone(), clock.clone()),
            scheduling: SchedulingService::new(store.clone(), store.clone(), store, clock),
        }
    }
}

/// Builds the application router with every route and request tracing.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Availability search
        .merge(routes::availability::routes())
        // Barber working hours
        .merge(routes::schedule::routes())
        // Service catalogue
        .merge(routes::service::routes())
        // Appointment lifecycle and agendas
        .merge(routes::appointment::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the API server with the provided configuration and state
///
/// Installs the tracing subscriber, applies CORS and the request timeout,
/// then serves until the listener fails.
pub async fn start_server(config: config::ApiConfig, state: Arc<ApiState>) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .wrap_err_with(|| format!("Invalid CORS origin: {origin}"))
            })
            .collect::<Result<Vec<_>>>()?;

        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_origin(origins);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        ServiceBuilder::new().layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
