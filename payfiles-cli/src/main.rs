//! payfiles CLI - run queries and write batches through the data-access facade
//!
//! Each subcommand maps to one facade operation:
//! - `scalar`: first column of the first row
//! - `exists`: whether any row matches
//! - `rows`: every row as JSON
//! - `exec`: affected row count of a write statement
//! - `batch`: transactional batch of write statements from a file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use payfiles_db::config::load_dotenv;
use payfiles_db::{create_lazy_pool, ConfigOverrides, DataAccess, DbConfig};
use tracing::debug;

mod commands;
mod param;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "payfiles",
    author,
    version,
    about = "Query and update the payment-file scheduler database",
    long_about = "Thin command-line front end over the payfiles data-access facade. \
                  Read commands mask database failures the same way the facade does; \
                  `rows` and invalid batch input exit non-zero."
)]
struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    database_url: Option<String>,

    /// Config file (default: ./payfiles.toml, then ~/.payfiles/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Maximum pooled connections
    #[arg(long, global = true)]
    max_connections: Option<u32>,

    /// Seconds to wait for a pooled connection
    #[arg(long, value_name = "SECS", global = true)]
    acquire_timeout: Option<u64>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the first column of the first row (nothing when absent)
    Scalar(commands::read::QueryArgs),
    /// Print whether the query returns at least one row
    Exists(commands::read::QueryArgs),
    /// Print all rows as a JSON array
    Rows(commands::read::RowsArgs),
    /// Run an INSERT/UPDATE/DELETE and print the affected row count
    Exec(commands::read::QueryArgs),
    /// Run statements from a file in one transaction, flushing in batches
    Batch(commands::write::BatchArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env feeds both clap's DATABASE_URL and the RUST_LOG filter
    load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    let overrides = ConfigOverrides {
        database_url: cli.database_url.clone(),
        max_connections: cli.max_connections,
        acquire_timeout_secs: cli.acquire_timeout,
        batch_size: None,
    };
    let config = DbConfig::load(cli.config.as_deref(), &overrides)
        .context("Failed to load configuration")?;

    if let Some(url) = config.redacted_url() {
        debug!("Using database {}", url);
    }

    let db = DataAccess::new(create_lazy_pool(&config).context("Failed to set up connection pool")?);

    match cli.command {
        Commands::Scalar(args) => commands::run_scalar(&db, args).await,
        Commands::Exists(args) => commands::run_exists(&db, args).await,
        Commands::Rows(args) => commands::run_rows(&db, args).await,
        Commands::Exec(args) => commands::run_exec(&db, args).await,
        Commands::Batch(args) => commands::run_batch(&db, args, config.batch_size).await,
    }
}
