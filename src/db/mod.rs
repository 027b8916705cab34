//! Database connection pool and health check.
//!
//! The board only ever reads. Schema and data belong to the maintenance
//! system; there are no migrations here.

pub mod orders;

use std::time::Duration;

use crate::error::Result;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// One query per poll cycle; a couple of connections is plenty.
const MAX_CONNECTIONS: u32 = 2;

/// Database handle. Owns the connection pool.
#[derive(Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    /// Connect to Postgres and create a connection pool.
    ///
    /// Fails if no connection can be opened now.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    /// Create a pool without connecting. Only a malformed URL fails here.
    ///
    /// Connection problems surface on the first query, each one giving up
    /// after `acquire_timeout`.
    pub fn connect_lazy(url: &str, acquire_timeout: Duration) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(acquire_timeout)
            .connect_lazy(url)?;
        Ok(Self { pool })
    }

    /// Health check: run `SELECT 1`.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }
}
