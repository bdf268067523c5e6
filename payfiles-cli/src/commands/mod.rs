//! Command implementations for payfiles CLI

pub mod read;
pub mod write;

// Re-export dispatcher functions for flat access from main.rs
pub use read::{run_exists, run_rows, run_scalar};
pub use write::{run_batch, run_exec};
