mod geo;
mod scrape;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use geo::GeoCommands;

#[derive(Debug, Parser)]
#[command(name = "outletdb-cli")]
#[command(about = "outletdb command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Scrape the store locator and replace the outlets table
    Scrape {
        /// Locator page to fetch (defaults to `OUTLETDB_LOCATOR_URL`)
        #[arg(long, conflicts_with = "html_file")]
        url: Option<String>,

        /// Read a saved locator page instead of fetching one
        #[arg(long)]
        html_file: Option<PathBuf>,

        /// Keep only outlets whose address mentions this area (defaults to `OUTLETDB_LOCATOR_AREA`)
        #[arg(long)]
        area: Option<String>,

        /// Print the extracted outlets without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Geospatial queries over the stored outlets
    Geo {
        #[command(subcommand)]
        command: GeoCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("outletdb-cli: run with --help to list commands");
        return Ok(());
    };

    let config = if needs_database(&command) {
        outletdb_core::load_app_config()
    } else {
        outletdb_core::load_offline_app_config()
    }
    .context("failed to load configuration")?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Db { command } => run_db(&config, command).await,
        Commands::Scrape {
            url,
            html_file,
            area,
            dry_run,
        } => {
            scrape::run_scrape(
                &config,
                scrape::ScrapeArgs {
                    url: url.as_deref(),
                    html_file: html_file.as_deref(),
                    area: area.as_deref(),
                    dry_run,
                },
            )
            .await
        }
        Commands::Geo { command } => {
            let pool = connect(&config).await?;
            geo::run_geo(&pool, command).await
        }
    }
}

/// A dry-run scrape never touches the database, so it runs without `DATABASE_URL`.
fn needs_database(command: &Commands) -> bool {
    !matches!(command, Commands::Scrape { dry_run: true, .. })
}

async fn run_db(config: &outletdb_core::AppConfig, command: DbCommands) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    match command {
        DbCommands::Ping => {
            outletdb_db::health_check(&pool)
                .await
                .context("database ping failed")?;
            println!("database: ok");
        }
        DbCommands::Migrate => {
            let applied = outletdb_db::run_migrations(&pool)
                .await
                .context("migration failed")?;
            tracing::info!(applied, "migrations complete");
            println!("applied {applied} migration(s)");
        }
    }
    Ok(())
}

pub(crate) async fn connect(config: &outletdb_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    outletdb_db::connect_pool_from_config(config)
        .await
        .context("failed to connect to database")
}
