//! dbm CLI
//!
//! Command-line tool for inspecting schema version history.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::ConnectOptions;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use dbm_migrate::prelude::*;

/// Dialect-neutral schema migrations.
#[derive(Parser)]
#[command(name = "dbm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL; its scheme picks the driver.
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3")]
    database: String,

    /// SQL dialect (defaults to the URL scheme).
    #[arg(long, env = "DBM_DIALECT")]
    dialect: Option<String>,

    /// JSON configuration file.
    #[arg(short, long, env = "DBM_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Create the history table.
    Init,

    /// Show applied versions.
    Status,
}

fn scheme(url: &str) -> &str {
    url.split_once(':').map_or(url, |(scheme, _)| scheme)
}

async fn run<D: Database>(mut migrator: Migrator<D>, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Init => {
            info!(
                dialect = migrator.dialect().name(),
                table = %migrator.config().history_table,
                "Initializing history table..."
            );
            migrator.init().await?;
            info!("History table ready.");
        }

        Commands::Status => {
            let history = migrator.history().await?;

            if history.is_empty() {
                info!("No versions have been applied yet.");
            } else {
                println!("\nApplied versions:");
                println!("{:-<60}", "");
                for record in &history {
                    println!(
                        " [X] {} ({})",
                        record.version,
                        record.created_at.format("%Y-%m-%d %H:%M:%S")
                    );
                }
                println!();
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &cli.config {
        Some(path) => MigratorConfig::from_file(path)?,
        None => MigratorConfig::default(),
    };
    let scheme = scheme(&cli.database);
    let dialect = cli.dialect.as_deref().unwrap_or(scheme);

    match scheme {
        "sqlite" => {
            let conn = SqliteConnectOptions::from_str(&cli.database)?
                .create_if_missing(true)
                .connect()
                .await?;
            run(Migrator::for_driver(dialect, conn)?.with_config(config), cli.command).await
        }

        #[cfg(feature = "postgres")]
        "postgres" | "postgresql" => {
            let conn = sqlx::postgres::PgConnectOptions::from_str(&cli.database)?
                .connect()
                .await?;
            run(Migrator::for_driver(dialect, conn)?.with_config(config), cli.command).await
        }

        #[cfg(feature = "mysql")]
        "mysql" => {
            let conn = sqlx::mysql::MySqlConnectOptions::from_str(&cli.database)?
                .connect()
                .await?;
            run(Migrator::for_driver(dialect, conn)?.with_config(config), cli.command).await
        }

        other => anyhow::bail!("unsupported database URL scheme `{other}`"),
    }
}
