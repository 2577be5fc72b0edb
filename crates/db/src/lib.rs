pub mod memory;
pub mod models;
pub mod repositories;
pub mod schema;
pub mod store;

use std::str::FromStr;
use std::time::Duration;

use eyre::Result;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

/// Limits that bound every database round trip.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// How long a request waits for a free connection.
    pub acquire_timeout: Duration,
    /// Server-side `statement_timeout` applied to every connection.
    pub statement_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
            statement_timeout: Duration::from_secs(5),
        }
    }
}

pub async fn create_pool(database_url: &str, settings: &PoolSettings) -> Result<DbPool> {
    let options = PgConnectOptions::from_str(database_url)?.options([(
        "statement_timeout",
        settings.statement_timeout.as_millis().to_string(),
    )]);

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_with(options)
        .await?;

    Ok(pool)
}
