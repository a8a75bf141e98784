use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const CONNECT_ATTEMPTS: u32 = 5;
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Creates and returns a PostgreSQL connection pool, retrying a few times so
/// the service survives the database coming up slightly after it.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let mut attempt = 1;
    loop {
        match PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
        {
            Ok(pool) => {
                info!("PostgreSQL connection pool established");
                return Ok(pool);
            }
            Err(e) if attempt < CONNECT_ATTEMPTS => {
                warn!("Database connection attempt {attempt}/{CONNECT_ATTEMPTS} failed: {e}");
                tokio::time::sleep(RETRY_DELAY).await;
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Applies any pending schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("Failed to apply database migrations")?;
    info!("Database migrations applied");
    Ok(())
}
