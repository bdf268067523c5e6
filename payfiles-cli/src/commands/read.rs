//! Read commands: scalar, exists, rows
//!
//! `scalar` and `exists` never fail on database errors (the facade masks
//! them); `rows` exits non-zero when the query fails.

use anyhow::{Context, Result};
use clap::Parser;
use payfiles_db::DataAccess;

use crate::param::parse_params;

#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// SQL text with positional placeholders ($1, $2, ...)
    pub sql: String,

    /// Parameter as kind:value (int, float, decimal, bool, text, json, bytes,
    /// date, time, timestamp, timestamptz, uuid, null); repeat in placeholder order
    #[arg(short = 'p', long = "param", value_name = "PARAM")]
    pub params: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct RowsArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Print the first column of the first row, or nothing when absent.
pub async fn run_scalar(db: &DataAccess, args: QueryArgs) -> Result<()> {
    let params = parse_params(&args.params)?;
    if let Some(value) = db.scalar_string(&args.sql, &params).await {
        println!("{}", value);
    }
    Ok(())
}

/// Print `true` or `false`.
pub async fn run_exists(db: &DataAccess, args: QueryArgs) -> Result<()> {
    let params = parse_params(&args.params)?;
    println!("{}", db.exists(&args.sql, &params).await);
    Ok(())
}

/// Print all rows as a JSON array of objects.
pub async fn run_rows(db: &DataAccess, args: RowsArgs) -> Result<()> {
    let params = parse_params(&args.query.params)?;
    let rows = db
        .query_rows(&args.query.sql, &params)
        .await
        .context("query failed")?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&rows)?
    } else {
        serde_json::to_string(&rows)?
    };
    println!("{}", json);
    Ok(())
}
