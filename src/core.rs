//! Database handle shared by generated operations
//!
//! [`Database`] owns the PostgreSQL pool and the query facade bound to it.
//! Operations receive it explicitly; there is no process-wide handle.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use store_query::QueryFacade;
use tracing::info;

use crate::errors::RouteHausError;
use config::DatabaseConfig;

/// How long a connection may sit idle when the pool keeps no idle connections
pub const IDLE_CLOSE_AFTER: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
    query: QueryFacade,
}

/// Pool settings derived from the configuration.
///
/// sqlx has no cap on idle connections. The closest knob is the pool's
/// minimum size, so `max_idle_connections` is mapped onto it, which inverts
/// its meaning: a value of `n` keeps at least `n` connections open for the
/// life of the pool instead of allowing at most `n` idle ones. Zero is exact
/// and additionally reaps idle connections after [`IDLE_CLOSE_AFTER`].
pub fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    let mut options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.max_idle_connections);

    if config.max_idle_connections == 0 {
        options = options.idle_timeout(IDLE_CLOSE_AFTER);
    }

    options = if config.max_lifetime_seconds > 0 {
        options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds))
    } else {
        options.max_lifetime(None)
    };

    if config.acquire_timeout_seconds > 0 {
        options = options.acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds));
    }

    options
}

impl Database {
    /// Build the pool without connecting. The first query opens the first
    /// connection, so an unreachable server surfaces there.
    pub fn open(config: &DatabaseConfig) -> Result<Self, RouteHausError> {
        config.validate()?;
        let pool = pool_options(config).connect_lazy(&config.connection_string())?;
        info!(
            "Database pool prepared for {}:{}/{} (max {} connections)",
            config.host, config.port, config.database, config.max_connections
        );
        Ok(Self::from_pool(pool))
    }

    /// Build the pool and open a first connection
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, RouteHausError> {
        config.validate()?;
        let pool = pool_options(config)
            .connect(&config.connection_string())
            .await?;
        info!(
            "Connected to {}:{}/{}",
            config.host, config.port, config.database
        );
        Ok(Self::from_pool(pool))
    }

    /// Open with the default settings, host taken from `WINDOWS_HOST`
    pub fn open_from_env() -> Result<Self, RouteHausError> {
        Self::open(&DatabaseConfig::from_env())
    }

    pub fn from_pool(pool: PgPool) -> Self {
        let query = QueryFacade::new(pool.clone());
        Self { pool, query }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn query(&self) -> &QueryFacade {
        &self.query
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), RouteHausError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    /// Close every connection; later acquisitions fail
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}
