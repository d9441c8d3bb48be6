//! HTTP API handlers for moviedb

pub mod query;

pub use query::run_query;
