//! Microblog binary.
//!
//! Creates the concrete database implementation and passes it to the
//! server. The API layer remains agnostic of the storage backend.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use microblog::api::{self, ApiError, Config};
use microblog::db::{Database, DbError, SqliteDatabase};
use miette::Diagnostic;
use thiserror::Error;
use tracing::info;

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error("Database error: {0}")]
    #[diagnostic(code(microblog::binary::database))]
    Database(#[from] DbError),

    #[error("Failed to create data directory: {0}")]
    #[diagnostic(code(microblog::binary::io))]
    Io(#[from] std::io::Error),

    #[error("Server error: {0}")]
    #[diagnostic(code(microblog::binary::api))]
    Api(#[from] ApiError),
}

#[derive(Parser)]
#[command(name = "microblog")]
#[command(author, version, about = "Single-table microblog server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the entries table
    InitDb {
        /// Database file path (default: MICROBLOG_DATABASE or ~/.local/share/microblog/microblog.db)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Delete all entries and restart id numbering
        #[arg(long)]
        reset: bool,
    },
    /// Run the web server
    Serve {
        /// Host address to bind to
        #[arg(long)]
        host: Option<IpAddr>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Database file path (default: MICROBLOG_DATABASE or ~/.local/share/microblog/microblog.db)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Verbose logging
        #[arg(long)]
        debug: bool,
    },
}

async fn open_database(config: &Config) -> Result<SqliteDatabase, BinaryError> {
    // Ensure parent directory exists
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = SqliteDatabase::open(&config.db_path).await?;
    db.migrate().await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), BinaryError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::InitDb { db, reset } => {
            let mut config = Config::new();
            if let Some(path) = db {
                config = config.with_db_path(path);
            }
            api::init_tracing(config.debug);

            let db = open_database(&config).await?;
            if reset {
                db.reset().await?;
            }
            println!("Initialized the database.");
        }
        Commands::Serve {
            host,
            port,
            db,
            debug,
        } => {
            let mut config = Config::new();
            if let Some(host) = host {
                config = config.with_host(host);
            }
            if let Some(port) = port {
                config = config.with_port(port);
            }
            if let Some(path) = db {
                config = config.with_db_path(path);
            }
            if debug {
                config = config.with_debug(true);
            }
            api::init_tracing(config.debug);

            let db = open_database(&config).await?;
            info!(path = %config.db_path.display(), "database ready");

            api::run(config, db).await?;
        }
    }

    Ok(())
}
