use std::time::Duration;

use anyhow::Result;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::config::Config;

pub mod models;
pub mod repositories;
pub mod transaction;
pub mod utils;

pub use transaction::DatabaseTransaction;

const CONNECT_ATTEMPTS: u32 = 3;

/// Build the shared pool, wait for the store to answer and apply migrations.
pub async fn init_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .max_lifetime(Duration::from_secs(30 * 60))
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy(&config.database_url)?;

    wait_for_database(&pool).await?;

    log::info!("Running database migrations...");
    run_migrations(&pool).await?;
    log::info!("Migrations completed successfully");

    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

async fn wait_for_database(pool: &PgPool) -> Result<()> {
    let mut delay = Duration::from_secs(1);

    for attempt in 1..=CONNECT_ATTEMPTS {
        match sqlx::query("SELECT 1").execute(pool).await {
            Ok(_) => return Ok(()),
            Err(e) if attempt < CONNECT_ATTEMPTS => {
                log::warn!(
                    "Database not reachable (attempt {}/{}): {}, retrying in {:?}",
                    attempt,
                    CONNECT_ATTEMPTS,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(e) => {
                pool.close().await;
                return Err(anyhow::anyhow!(
                    "Database not reachable after {} attempts: {}",
                    CONNECT_ATTEMPTS,
                    e
                ));
            }
        }
    }

    Ok(())
}
