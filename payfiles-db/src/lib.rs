//! payfiles-db: relational data-access facade
//!
//! Executes parameterized queries and updates against a pooled PostgreSQL
//! connection, maps rows to generic `ResultRow` maps, and runs batched write
//! statements inside a transaction. The payment-file scheduler uses it to keep
//! SQL execution mechanics out of its business logic.
//!
//! ```ignore
//! let config = DbConfig::load(None, &ConfigOverrides::default())?;
//! let db = DataAccess::new(create_pool(&config).await?);
//!
//! let pending = db
//!     .exists("SELECT 1 FROM payment_files WHERE status = $1", &["PENDING".into()])
//!     .await;
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod facade;
pub mod params;
pub mod pool;
pub mod row;
pub mod value;

pub use config::{ConfigOverrides, DbConfig};
pub use error::{DbError, Result};
pub use facade::DataAccess;
pub use pool::{create_lazy_pool, create_pool};
pub use value::{ResultRow, SqlValue};
