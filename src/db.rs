use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::DbConfig;

/// Failure reported by the Postgres-backed stores.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("unique constraint violated")]
    Duplicate,
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::Duplicate,
            _ => RepoError::Database(err),
        }
    }
}

/// Open the pool, retrying with a fixed delay. Exhausting the attempts is fatal
/// for the caller.
pub async fn connect_with_retry(cfg: &DbConfig) -> anyhow::Result<PgPool> {
    let attempts = cfg.connect_attempts.max(1);
    let mut attempt = 1;
    loop {
        match PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .connect(&cfg.url)
            .await
        {
            Ok(pool) => {
                info!(attempt, "connected to postgres");
                return Ok(pool);
            }
            Err(e) if attempt < attempts => {
                warn!(error = %e, retries_left = attempts - attempt, "database connection failed");
                attempt += 1;
                tokio::time::sleep(cfg.retry_delay()).await;
            }
            Err(e) => {
                error!(error = %e, attempts, "could not connect to database");
                return Err(e).context("connect to database");
            }
        }
    }
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("run migrations")?;
    info!("users and favorites tables ready");
    Ok(())
}
