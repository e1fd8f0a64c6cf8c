//! Kerbside - timezone-aware parking rate service.
//!
//! This is the main binary. `kerbside serve` runs the HTTP API server;
//! `kerbside seed` loads a starter rate set into the database.

mod seeder;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kerbside_server::{Server, ServerConfig, DEFAULT_HOST, DEFAULT_PORT};
use kerbside_storage::Database;

/// Kerbside - timezone-aware parking rate service
#[derive(Parser, Debug)]
#[command(name = "kerbside", version, about)]
struct Args {
    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Database file path (default: the platform data directory)
    #[arg(long)]
    db_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,

        /// Port to bind to
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Load the starter rate set, replacing any stored rates
    Seed,
}

fn init_logging(args: &Args) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("kerbside={},warn", args.log_level)));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

fn open_database(args: &Args) -> anyhow::Result<Database> {
    let db = match &args.db_path {
        Some(path) => Database::with_path(path)?,
        None => Database::new()?,
    };
    Ok(db)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let db = open_database(&args)?;

    match &args.command {
        Command::Serve { host, port } => {
            let config = ServerConfig::default()
                .with_host(host.clone())
                .with_port(*port);

            tracing::info!("Starting Kerbside on {}:{}", config.host, config.port);
            let server = Server::with_database(config, db)?;
            server.run().await?;
        }
        Command::Seed => {
            seeder::run(db)?;
        }
    }

    Ok(())
}
