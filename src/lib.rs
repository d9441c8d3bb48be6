//! moviedb library - CSV bulk import into SQLite plus an ad hoc SQL query gateway
//!
//! The binary wires these together: on first run the store is created, the
//! schema applied, and the six IMDB CSV datasets imported; after that the HTTP
//! gateway serves arbitrary SQL over `GET /query`.

use axum::Router;
use sqlx::SqlitePool;

pub mod api;
pub mod db;
pub mod error;
pub mod import;

pub use error::{Error, Result};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
///
/// A single endpoint: `GET /query?q=<sql>`. There are deliberately no other
/// routes; the gateway is the whole HTTP surface.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/query", get(api::run_query))
        .with_state(state)
}
