//! Schema version management using `PRAGMA user_version`.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Current schema version.
const CURRENT_VERSION: u32 = 1;

/// Runs database migrations up to `CURRENT_VERSION`.
///
/// Migrations are create-if-absent only; existing data is never dropped.
///
/// # Errors
///
/// Returns an error if any SQL statement fails.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let version: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version")?;

    if version < 1 {
        migrate_v1(conn).context("migration to v1 failed")?;
    }

    conn.pragma_update(None, "user_version", CURRENT_VERSION)
        .context("failed to update user_version")?;

    Ok(())
}

/// Migration to v1: create `movies`, `cinemas`, and `schedule` tables.
fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS movies (
            id               INTEGER PRIMARY KEY,
            name             TEXT NOT NULL,
            production_year  INTEGER,
            country          TEXT,
            duration         TEXT,
            synopsis         TEXT,
            rating           REAL,
            url              TEXT,
            image            BLOB
        );

        CREATE TABLE IF NOT EXISTS cinemas (
            id       INTEGER PRIMARY KEY,
            name     TEXT NOT NULL,
            address  TEXT,
            rating   REAL
        );

        CREATE TABLE IF NOT EXISTS schedule (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            movie_id    INTEGER NOT NULL REFERENCES movies(id),
            cinema_id   INTEGER NOT NULL REFERENCES cinemas(id),
            session_id  TEXT NOT NULL,
            datetime    TEXT NOT NULL,
            min_price   TEXT NOT NULL,
            UNIQUE(movie_id, cinema_id, session_id)
        );

        CREATE INDEX IF NOT EXISTS idx_schedule_movie_id ON schedule(movie_id);
        CREATE INDEX IF NOT EXISTS idx_schedule_cinema_id ON schedule(cinema_id);
        CREATE INDEX IF NOT EXISTS idx_schedule_datetime ON schedule(datetime);",
    )
    .context("failed to create tables")?;

    Ok(())
}
