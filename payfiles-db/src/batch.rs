//! Flush planning for batched write statements
//!
//! Statements are queued in order and flushed whenever `batch_size` of them
//! are pending. The remainder is flushed once at the end, and only when
//! something is actually pending, so a statement count that is an exact
//! multiple of `batch_size` produces no trailing empty flush.

use crate::error::{DbError, Result};

/// Validated batch input, split into flush groups
#[derive(Debug, Clone)]
pub struct BatchPlan<'a, S: AsRef<str>> {
    statements: &'a [S],
    batch_size: usize,
}

impl<'a, S: AsRef<str>> BatchPlan<'a, S> {
    /// Rejects an empty statement list and a zero batch size.
    pub fn new(statements: &'a [S], batch_size: usize) -> Result<Self> {
        if statements.is_empty() {
            return Err(DbError::invalid_argument(
                "execute_batch_mutations: no statements to execute",
            ));
        }
        if batch_size == 0 {
            return Err(DbError::invalid_argument(
                "execute_batch_mutations: batch size must be at least 1",
            ));
        }
        Ok(Self {
            statements,
            batch_size,
        })
    }

    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }

    pub fn flush_count(&self) -> usize {
        self.statements.len().div_ceil(self.batch_size)
    }

    /// Flush groups in submission order.
    pub fn groups(&self) -> impl Iterator<Item = &'a [S]> {
        self.statements.chunks(self.batch_size)
    }

    /// One multi-statement script per flush group.
    pub fn scripts(&self) -> impl Iterator<Item = String> + 'a {
        self.statements.chunks(self.batch_size).map(join_statements)
    }
}

/// Join statements into a script PostgreSQL runs in a single round trip.
///
/// Each terminator goes on its own line: a statement ending in a `--`
/// comment would otherwise swallow the `;` and merge with the next one.
pub fn join_statements<S: AsRef<str>>(group: &[S]) -> String {
    group
        .iter()
        .map(|s| s.as_ref().trim().trim_end_matches(';').trim_end())
        .filter(|s| !s.is_empty())
        .map(|s| format!("{s}\n;"))
        .collect::<Vec<_>>()
        .join("\n")
}
