//! Cinema CRUD operations.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};

/// A stored cinema.
#[derive(Debug, Clone, PartialEq)]
pub struct CinemaRow {
    /// Source-assigned cinema ID.
    pub id: u32,
    /// Cinema name.
    pub name: String,
    /// Street address (nullable).
    pub address: Option<String>,
    /// Source rating (nullable).
    pub rating: Option<f64>,
}

/// Inserts a cinema unless a row with the same ID already exists.
///
/// Same first-seen-wins rule as movies. Returns `true` if a row was
/// inserted.
///
/// # Errors
///
/// Returns an error if the database operation fails.
#[allow(clippy::module_name_repetitions)]
pub fn save_cinema(conn: &Connection, cinema: &CinemaRow) -> Result<bool> {
    let existing: Option<u32> = conn
        .query_row("SELECT id FROM cinemas WHERE id = ?1", [cinema.id], |row| {
            row.get(0)
        })
        .optional()
        .with_context(|| format!("failed to look up cinema {}", cinema.id))?;

    if existing.is_some() {
        tracing::debug!(id = cinema.id, "cinema already stored, skipping");
        return Ok(false);
    }

    conn.execute(
        "INSERT INTO cinemas (id, name, address, rating) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![cinema.id, cinema.name, cinema.address, cinema.rating],
    )
    .with_context(|| format!("failed to insert cinema {}", cinema.id))?;

    tracing::info!(id = cinema.id, name = %cinema.name, "cinema inserted");
    Ok(true)
}

/// Loads all cinemas, ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
#[allow(clippy::module_name_repetitions)]
pub fn load_cinemas(conn: &Connection) -> Result<Vec<CinemaRow>> {
    let mut stmt = conn
        .prepare("SELECT id, name, address, rating FROM cinemas ORDER BY id")
        .context("failed to prepare cinemas query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok(CinemaRow {
                id: row.get(0)?,
                name: row.get(1)?,
                address: row.get(2)?,
                rating: row.get(3)?,
            })
        })
        .context("failed to query cinemas")?;

    rows.collect::<std::result::Result<Vec<_>, _>>()
        .context("failed to read cinemas rows")
}
