//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits and an acquire timeout.
//! The pool is the only place connections come from; every facade call
//! borrows one for its own duration.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DbConfig;
use crate::error::Result;

fn pool_options(config: &DbConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
}

/// Create a PostgreSQL connection pool, connecting immediately.
///
/// # Errors
///
/// Returns an error if no database URL is configured or the first
/// connection fails.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&DbConfig::load(None, &ConfigOverrides::default())?).await?;
/// ```
pub async fn create_pool(config: &DbConfig) -> Result<PgPool> {
    let url = config.require_database_url()?;
    Ok(pool_options(config).connect(url).await?)
}

/// Create a pool that opens connections on first use.
///
/// Only the URL syntax is checked up front, so callers can validate their own
/// input before any network traffic happens.
pub fn create_lazy_pool(config: &DbConfig) -> Result<PgPool> {
    let url = config.require_database_url()?;
    Ok(pool_options(config).connect_lazy(url)?)
}
