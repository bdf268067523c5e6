//! Write commands: exec, batch

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use payfiles_db::DataAccess;
use tokio::io::AsyncReadExt;
use tracing::info;

use super::read::QueryArgs;
use crate::param::parse_params;

#[derive(Parser, Debug)]
pub struct BatchArgs {
    /// File with one SQL statement per line ("-" reads stdin).
    /// Blank lines and lines starting with "--" are skipped.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Statements per flush (default: batch_size from config, else 100)
    #[arg(long, short = 'b')]
    pub batch_size: Option<usize>,
}

/// Print the affected row count (0 when the statement fails).
pub async fn run_exec(db: &DataAccess, args: QueryArgs) -> Result<()> {
    let params = parse_params(&args.params)?;
    println!("{}", db.execute_mutation(&args.sql, &params).await);
    Ok(())
}

/// Print `1` when the batch committed, `0` when it was rolled back.
pub async fn run_batch(db: &DataAccess, args: BatchArgs, default_batch_size: usize) -> Result<()> {
    let contents = read_input(&args.input).await?;
    let statements = split_statements(&contents);
    let batch_size = args.batch_size.unwrap_or(default_batch_size);

    info!(
        statements = statements.len(),
        batch_size,
        "Executing batch from {}",
        args.input.display()
    );

    let applied = db
        .execute_batch_mutations(&statements, batch_size)
        .await
        .context("batch rejected")?;
    println!("{}", u8::from(applied));
    Ok(())
}

async fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("Failed to read statements from stdin")?;
        Ok(buf)
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}

/// One statement per line; blank lines and `--` comments dropped.
pub fn split_statements(contents: &str) -> Vec<&str> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("--"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_statements_skips_blank_and_comments() {
        let input = "\n-- nightly settlement\nUPDATE payment_files SET status = 'SENT';\n\n  DELETE FROM staging;  \n";
        assert_eq!(
            split_statements(input),
            vec!["UPDATE payment_files SET status = 'SENT';", "DELETE FROM staging;"]
        );
    }

    #[test]
    fn test_split_statements_empty_input() {
        assert!(split_statements("\n   \n-- only a comment\n").is_empty());
    }
}
