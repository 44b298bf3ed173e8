use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Pool for the experiment-tracking store. Writes are small and detached,
/// so a handful of connections is enough.
pub async fn create_tracking_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to experiment-tracking database...");

    let pool = PgPoolOptions::new()
        .max_connections(4)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .context("Failed to connect to DATABASE_URL")?;

    info!("Experiment-tracking pool established");
    Ok(pool)
}
