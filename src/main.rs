use std::sync::Arc;

use chairbook_api::{ApiState, config::ApiConfig};
use chairbook_core::clock::SystemClock;
use chairbook_db::{create_pool, schema::initialize_database, store::PgStore};
use color_eyre::eyre::Result;
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Create database connection pool
    let db_pool = create_pool(&config.database_url, &config.pool_settings()).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    // Wire the core services to Postgres
    let state = ApiState::from_store(Arc::new(PgStore::new(db_pool)), Arc::new(SystemClock));

    // Start API server
    chairbook_api::start_server(config, Arc::new(state)).await?;

    Ok(())
}
