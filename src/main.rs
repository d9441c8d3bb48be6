//! moviedb - Movie dataset query service
//!
//! On first run (no store file yet) this creates the SQLite store, applies the
//! schema, and bulk-imports the six IMDB CSV datasets. On every run it then
//! serves ad hoc SQL over `GET /query`. Any structural failure during
//! initialization aborts the process before the listener binds; once serving,
//! per-request errors are reported to the client and the process keeps going.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use moviedb::{build_router, db, import, AppState};

/// Command-line arguments for moviedb
#[derive(Parser, Debug)]
#[command(name = "moviedb")]
#[command(about = "CSV-to-SQLite movie dataset importer and SQL query endpoint")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "MOVIEDB_PORT")]
    port: u16,

    /// Path to the SQLite store file
    #[arg(short, long, default_value = "moviedb.db", env = "MOVIEDB_DB")]
    db_path: PathBuf,

    /// Directory containing the IMDB CSV files
    #[arg(short, long, default_value = "IMDB", env = "MOVIEDB_CSV_DIR")]
    csv_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("Starting moviedb v{}", env!("CARGO_PKG_VERSION"));

    // Import runs at most once per store file: the existence check must happen
    // before any connection, because creating the pool in rwc mode would
    // create the file itself.
    let pool = if !db::store_exists(&args.db_path) {
        let pool = db::create_database(&args.db_path)
            .await
            .context("Failed to create database")?;

        db::create_schema(&pool)
            .await
            .context("Failed to create schema")?;
        info!("Tables created");

        match import::import_all(&pool, &args.csv_dir).await {
            Ok(()) => info!("All datasets imported"),
            Err(e) => {
                error!("Import failed: {}", e);
                return Err(e.into());
            }
        }

        pool
    } else {
        info!("Database already exists, skipping import");
        db::open_database(&args.db_path)
            .await
            .context("Failed to open database")?
    };

    let state = AppState::new(pool);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("moviedb listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
