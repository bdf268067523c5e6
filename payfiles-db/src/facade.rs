//! Data-access facade over the connection pool
//!
//! Five operations, each independent: acquire a pooled connection, bind
//! parameters positionally, execute, map the result, release. sqlx returns the
//! connection to the pool when the executor future completes or is dropped,
//! so release happens on every exit path.
//!
//! Failure policy differs per operation:
//! - `scalar_string`, `exists`, `execute_mutation`: log and return `None` /
//!   `false` / `0`, indistinguishable from an empty result.
//! - `execute_batch_mutations`: invalid input is an `Err`; database failures
//!   are logged and reported as `Ok(false)`.
//! - `query_rows`: database failures propagate.
//!
//! The `try_*` variants propagate instead of masking for callers that need
//! to tell "no row" apart from "query failed".

use sqlx::PgPool;
use tracing::{debug, error};

use crate::batch::BatchPlan;
use crate::error::{DbError, Result};
use crate::params::prepare;
use crate::row::ColumnLayout;
use crate::value::{ResultRow, SqlValue};

/// Pooled, stateless query helper
#[derive(Debug, Clone)]
pub struct DataAccess {
    pool: PgPool,
}

impl DataAccess {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// First column of the first row as a string.
    ///
    /// `None` when there is no row, when that cell is NULL, or when the query
    /// fails (logged).
    pub async fn scalar_string(&self, sql: &str, params: &[SqlValue]) -> Option<String> {
        self.try_scalar_string(sql, params)
            .await
            .unwrap_or_else(|e| masked(sql, "Error fetching string from query", e, None))
    }

    pub async fn try_scalar_string(&self, sql: &str, params: &[SqlValue]) -> Result<Option<String>> {
        let Some(row) = prepare(sql, params).fetch_optional(&self.pool).await? else {
            return Ok(None);
        };
        let value = ColumnLayout::of(&row).decode_cell(&row, 0)?;
        Ok(value.to_text())
    }

    /// True iff the query returns at least one row; `false` on failure (logged).
    pub async fn exists(&self, sql: &str, params: &[SqlValue]) -> bool {
        self.try_exists(sql, params)
            .await
            .unwrap_or_else(|e| masked(sql, "Error checking existence with query", e, false))
    }

    pub async fn try_exists(&self, sql: &str, params: &[SqlValue]) -> Result<bool> {
        let row = prepare(sql, params).fetch_optional(&self.pool).await?;
        Ok(row.is_some())
    }

    /// Every row as a label-to-value map. Failures propagate.
    ///
    /// Column labels and decoders are taken once from the result set, not per
    /// row. No rows yields an empty vector.
    pub async fn query_rows(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<ResultRow>> {
        let rows = prepare(sql, params).fetch_all(&self.pool).await?;
        let Some(first) = rows.first() else {
            return Ok(Vec::new());
        };

        let layout = ColumnLayout::of(first);
        rows.iter().map(|row| layout.decode_row(row)).collect()
    }

    /// Rows affected by an INSERT/UPDATE/DELETE; `0` on failure (logged).
    pub async fn execute_mutation(&self, sql: &str, params: &[SqlValue]) -> u64 {
        self.try_execute_mutation(sql, params)
            .await
            .unwrap_or_else(|e| masked(sql, "Error executing update query", e, 0))
    }

    pub async fn try_execute_mutation(&self, sql: &str, params: &[SqlValue]) -> Result<u64> {
        let result = prepare(sql, params).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Run unparameterized write statements in one transaction.
    ///
    /// Statements are flushed in groups of `batch_size`, in order, on a single
    /// connection. On success the transaction commits and `Ok(true)` is
    /// returned. On the first database failure the transaction is rolled back,
    /// the error is logged, and `Ok(false)` is returned; nothing from this
    /// call is left visible.
    ///
    /// # Errors
    ///
    /// `DbError::InvalidArgument` when `statements` is empty or `batch_size`
    /// is zero. No connection is acquired in that case.
    pub async fn execute_batch_mutations<S: AsRef<str>>(
        &self,
        statements: &[S],
        batch_size: usize,
    ) -> Result<bool> {
        let plan = BatchPlan::new(statements, batch_size)?;

        match self.run_batch(&plan).await {
            Ok(()) => Ok(true),
            Err(BatchFailure { flush, source }) => {
                error!(
                    statements = plan.statement_count(),
                    batch_size,
                    flush = ?flush,
                    error = %source,
                    "Error executing batch"
                );
                Ok(false)
            }
        }
    }

    async fn run_batch<S: AsRef<str>>(&self, plan: &BatchPlan<'_, S>) -> std::result::Result<(), BatchFailure> {
        let mut tx = self.pool.begin().await.map_err(BatchFailure::setup)?;

        for (index, script) in plan.scripts().enumerate() {
            match sqlx::raw_sql(&script).execute(&mut *tx).await {
                Ok(result) => debug!(
                    flush = index,
                    rows_affected = result.rows_affected(),
                    "Flushed batch"
                ),
                Err(e) => {
                    if let Err(rollback_err) = tx.rollback().await {
                        error!(error = %rollback_err, "Rollback after batch failure failed");
                    }
                    return Err(BatchFailure {
                        flush: Some(index),
                        source: e,
                    });
                }
            }
        }

        tx.commit().await.map_err(BatchFailure::setup)
    }
}

/// Where a batch stopped; `flush` is `None` for begin/commit failures
#[derive(Debug)]
struct BatchFailure {
    flush: Option<usize>,
    source: sqlx::Error,
}

impl BatchFailure {
    fn setup(source: sqlx::Error) -> Self {
        Self { flush: None, source }
    }
}

/// Log a swallowed failure with its query text and return the sentinel.
fn masked<T>(sql: &str, message: &str, err: DbError, fallback: T) -> T {
    error!(query = %sql, error = %err, "{}", message);
    fallback
}
