//! Bulk CSV import pipeline
//!
//! Each dataset is one CSV file loaded into one table inside one transaction.
//! Individual rows that the store rejects (duplicate keys, malformed values)
//! are logged and skipped; the dataset still commits. Structural failures --
//! unreadable file, broken CSV stream, begin/commit errors -- propagate to the
//! caller and abort the whole import.
//!
//! Fields are bound positionally as text. SQLite coerces each value according
//! to the target column's affinity, so "1972" lands as an INTEGER in
//! Movies.Year while "De Niro" stays TEXT.

use crate::Result;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One CSV dataset bound to its target table.
#[derive(Debug, Clone)]
pub struct ImportJob {
    /// Source CSV file (header row + data rows)
    pub file: PathBuf,
    /// Target table name
    pub table: &'static str,
    /// Target columns, in CSV field order
    pub columns: &'static [&'static str],
}

impl ImportJob {
    pub fn new(file: PathBuf, table: &'static str, columns: &'static [&'static str]) -> Self {
        Self {
            file,
            table,
            columns,
        }
    }

    /// Parameterized insert statement for this dataset.
    ///
    /// The text is constant across the whole dataset, so sqlx's per-connection
    /// statement cache prepares it once and reuses it for every row.
    pub fn insert_sql(&self) -> String {
        let placeholders = vec!["?"; self.columns.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            self.columns.join(", "),
            placeholders
        )
    }
}

/// Outcome of one dataset import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
    /// Rows successfully inserted
    pub inserted: u64,
    /// Rows rejected by the store and skipped
    pub skipped: u64,
}

/// Import one CSV dataset into its table.
///
/// The first CSV record is the header and is discarded. The reader runs in
/// flexible mode: ragged rows are handed to the store as-is, and if the bind
/// count no longer matches the insert template the store rejects that row,
/// which falls under the skip-and-log policy rather than aborting the dataset.
pub async fn import_dataset(pool: &SqlitePool, job: &ImportJob) -> Result<ImportStats> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(&job.file)?;

    let insert_sql = job.insert_sql();
    let mut tx = pool.begin().await?;

    let mut stats = ImportStats {
        inserted: 0,
        skipped: 0,
    };

    for (index, record) in reader.records().enumerate() {
        // A broken CSV stream is structural, not a data-quality failure
        let record = record?;

        let mut query = sqlx::query(&insert_sql);
        for field in record.iter() {
            query = query.bind(field.to_string());
        }

        match query.execute(&mut *tx).await {
            Ok(_) => stats.inserted += 1,
            Err(e) => {
                warn!(
                    "Skipping record {} of {}: {:?}: {}",
                    index + 1,
                    job.file.display(),
                    record,
                    e
                );
                stats.skipped += 1;
            }
        }
    }

    tx.commit().await?;
    Ok(stats)
}

/// The six datasets in load order: entity tables before their link tables.
/// Referential integrity is not verified; the order just keeps parents first.
pub fn dataset_jobs(csv_dir: &Path) -> Vec<ImportJob> {
    vec![
        ImportJob::new(
            csv_dir.join("IMDB-actors.csv"),
            "Actors",
            &["ActorID", "FirstName", "LastName", "Gender"],
        ),
        ImportJob::new(
            csv_dir.join("IMDB-directors.csv"),
            "Directors",
            &["DirectorID", "FirstName", "LastName"],
        ),
        ImportJob::new(
            csv_dir.join("IMDB-directors_genres.csv"),
            "DirectorsGenres",
            &["DirectorID", "Genre", "Probability"],
        ),
        ImportJob::new(
            csv_dir.join("IMDB-movies.csv"),
            "Movies",
            &["MovieID", "Name", "Year", "Rank"],
        ),
        ImportJob::new(
            csv_dir.join("IMDB-movies_genres.csv"),
            "MoviesGenre",
            &["MovieID", "Genre"],
        ),
        ImportJob::new(
            csv_dir.join("IMDB-roles.csv"),
            "Roles",
            &["ActorID", "MovieID", "Role"],
        ),
    ]
}

/// Import all six datasets in order. Runs once per store lifetime;
/// the caller gates on store-file existence before calling.
pub async fn import_all(pool: &SqlitePool, csv_dir: &Path) -> Result<()> {
    for job in dataset_jobs(csv_dir) {
        let stats = import_dataset(pool, &job).await?;
        info!(
            "Imported {} ({} rows, {} skipped)",
            job.table, stats.inserted, stats.skipped
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_sql_matches_column_count() {
        let job = ImportJob::new(
            PathBuf::from("IMDB/IMDB-movies.csv"),
            "Movies",
            &["MovieID", "Name", "Year", "Rank"],
        );
        assert_eq!(
            job.insert_sql(),
            "INSERT INTO Movies (MovieID, Name, Year, Rank) VALUES (?, ?, ?, ?)"
        );
    }

    #[test]
    fn dataset_jobs_ordered_parents_first() {
        let jobs = dataset_jobs(Path::new("IMDB"));
        let tables: Vec<&str> = jobs.iter().map(|j| j.table).collect();
        assert_eq!(
            tables,
            [
                "Actors",
                "Directors",
                "DirectorsGenres",
                "Movies",
                "MoviesGenre",
                "Roles"
            ]
        );
    }
}
