//! Schema definitions for the six movie dataset tables
//!
//! Each statement is `CREATE TABLE IF NOT EXISTS`, so re-applying the schema
//! against an existing store is a no-op. Foreign keys are declared on the link
//! tables but SQLite does not enforce them unless `PRAGMA foreign_keys` is
//! enabled, which it deliberately is not: the CSV datasets contain link rows
//! whose parent ids are absent, and the importer accepts them.

use crate::Result;
use sqlx::SqlitePool;

/// Apply the full schema, in order. Any failure aborts initialization;
/// a partially-created schema is never served.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_actors_table(pool).await?;
    create_directors_table(pool).await?;
    create_directors_genres_table(pool).await?;
    create_movies_table(pool).await?;
    create_movies_genre_table(pool).await?;
    create_roles_table(pool).await?;
    Ok(())
}

async fn create_actors_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS Actors (
            ActorID INTEGER PRIMARY KEY,
            FirstName TEXT NOT NULL,
            LastName TEXT NOT NULL,
            Gender TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_directors_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS Directors (
            DirectorID INTEGER PRIMARY KEY,
            FirstName TEXT NOT NULL,
            LastName TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_directors_genres_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS DirectorsGenres (
            DirectorID INTEGER,
            Genre TEXT,
            Probability REAL,
            PRIMARY KEY (DirectorID, Genre),
            FOREIGN KEY (DirectorID) REFERENCES Directors(DirectorID)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_movies_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS Movies (
            MovieID INTEGER PRIMARY KEY,
            Name TEXT NOT NULL,
            Year INTEGER,
            Rank REAL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_movies_genre_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS MoviesGenre (
            MovieID INTEGER,
            Genre TEXT,
            PRIMARY KEY (MovieID, Genre),
            FOREIGN KEY (MovieID) REFERENCES Movies(MovieID)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_roles_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS Roles (
            ActorID INTEGER,
            MovieID INTEGER,
            Role TEXT,
            PRIMARY KEY (ActorID, MovieID, Role),
            FOREIGN KEY (ActorID) REFERENCES Actors(ActorID),
            FOREIGN KEY (MovieID) REFERENCES Movies(MovieID)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
