//! Movie CRUD operations.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};

/// A stored movie.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRow {
    /// Source-assigned movie ID.
    pub id: u32,
    /// Movie name.
    pub name: String,
    /// Production year (nullable).
    pub production_year: Option<i32>,
    /// Production country (nullable).
    pub country: Option<String>,
    /// Duration, free text (nullable).
    pub duration: Option<String>,
    /// Synopsis (nullable).
    pub synopsis: Option<String>,
    /// Source rating (nullable).
    pub rating: Option<f64>,
    /// Canonical movie page URL (nullable).
    pub url: Option<String>,
    /// Poster image bytes (nullable).
    pub image: Option<Vec<u8>>,
}

/// Inserts a movie unless a row with the same ID already exists.
///
/// First-seen wins: a later record with the same ID is a silent no-op,
/// never an update. Returns `true` if a row was inserted.
///
/// # Errors
///
/// Returns an error if the database operation fails.
#[allow(clippy::module_name_repetitions)]
pub fn save_movie(conn: &Connection, movie: &MovieRow) -> Result<bool> {
    let existing: Option<u32> = conn
        .query_row("SELECT id FROM movies WHERE id = ?1", [movie.id], |row| {
            row.get(0)
        })
        .optional()
        .with_context(|| format!("failed to look up movie {}", movie.id))?;

    if existing.is_some() {
        tracing::debug!(id = movie.id, "movie already stored, skipping");
        return Ok(false);
    }

    conn.execute(
        "INSERT INTO movies (id, name, production_year, country, duration, synopsis, rating, url, image)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            movie.id,
            movie.name,
            movie.production_year,
            movie.country,
            movie.duration,
            movie.synopsis,
            movie.rating,
            movie.url,
            movie.image,
        ],
    )
    .with_context(|| format!("failed to insert movie {}", movie.id))?;

    tracing::info!(id = movie.id, name = %movie.name, "movie inserted");
    Ok(true)
}

/// Loads all movies, ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
#[allow(clippy::module_name_repetitions)]
pub fn load_movies(conn: &Connection) -> Result<Vec<MovieRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, production_year, country, duration, synopsis, rating, url, image
             FROM movies
             ORDER BY id",
        )
        .context("failed to prepare movies query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok(MovieRow {
                id: row.get(0)?,
                name: row.get(1)?,
                production_year: row.get(2)?,
                country: row.get(3)?,
                duration: row.get(4)?,
                synopsis: row.get(5)?,
                rating: row.get(6)?,
                url: row.get(7)?,
                image: row.get(8)?,
            })
        })
        .context("failed to query movies")?;

    rows.collect::<std::result::Result<Vec<_>, _>>()
        .context("failed to read movies rows")
}
