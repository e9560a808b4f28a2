//! Schedule (session) CRUD operations.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::cinemas::{CinemaRow, save_cinema};

/// A session to be stored for a movie/cinema pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRow {
    /// Source-assigned session ID.
    pub session_id: String,
    /// Showtime, `%Y-%m-%d %H:%M:%S` text.
    pub datetime: String,
    /// Minimum ticket price, as formatted by the source.
    pub min_price: String,
}

/// A stored schedule row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRow {
    /// Movie ID (FK → `movies.id`).
    pub movie_id: u32,
    /// Cinema ID (FK → `cinemas.id`).
    pub cinema_id: u32,
    /// Source-assigned session ID.
    pub session_id: String,
    /// Showtime, `%Y-%m-%d %H:%M:%S` text.
    pub datetime: String,
    /// Minimum ticket price.
    pub min_price: String,
}

/// Inserts a session unless the `(movie_id, cinema_id, session_id)`
/// triple is already present. Returns `true` if a row was inserted.
///
/// # Errors
///
/// Returns an error if the database operation fails (including a missing
/// movie or cinema reference).
pub fn save_session(
    conn: &Connection,
    movie_id: u32,
    cinema_id: u32,
    session: &SessionRow,
) -> Result<bool> {
    let existing: Option<u32> = conn
        .query_row(
            "SELECT id FROM schedule
             WHERE movie_id = ?1 AND cinema_id = ?2 AND session_id = ?3",
            rusqlite::params![movie_id, cinema_id, session.session_id],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| format!("failed to look up session {}", session.session_id))?;

    if existing.is_some() {
        tracing::debug!(
            movie_id,
            cinema_id,
            session_id = %session.session_id,
            "session already stored, skipping"
        );
        return Ok(false);
    }

    conn.execute(
        "INSERT INTO schedule (movie_id, cinema_id, session_id, datetime, min_price)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            movie_id,
            cinema_id,
            session.session_id,
            session.datetime,
            session.min_price,
        ],
    )
    .with_context(|| {
        format!(
            "failed to insert session {} (movie {movie_id}, cinema {cinema_id})",
            session.session_id
        )
    })?;

    tracing::info!(
        movie_id,
        cinema_id,
        session_id = %session.session_id,
        "session inserted"
    );
    Ok(true)
}

/// Persists one cinema block: the cinema first, then each of its sessions.
///
/// Every insert commits on its own, so a failure partway through leaves
/// the rows already written in place. Returns the number of sessions
/// inserted (already-present sessions are skipped silently).
///
/// # Errors
///
/// Returns an error if any database operation fails.
pub fn save_cinema_sessions(
    conn: &Connection,
    movie_id: u32,
    cinema: &CinemaRow,
    sessions: &[SessionRow],
) -> Result<usize> {
    save_cinema(conn, cinema)?;

    let mut inserted: usize = 0;
    for session in sessions {
        if save_session(conn, movie_id, cinema.id, session)? {
            inserted = inserted.saturating_add(1);
        }
    }

    Ok(inserted)
}

/// Loads all schedule rows, ordered by showtime.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn load_schedule(conn: &Connection) -> Result<Vec<ScheduleRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT movie_id, cinema_id, session_id, datetime, min_price
             FROM schedule
             ORDER BY datetime",
        )
        .context("failed to prepare schedule query")?;

    let rows = stmt
        .query_map([], map_schedule_row)
        .context("failed to query schedule")?;

    rows.collect::<std::result::Result<Vec<_>, _>>()
        .context("failed to read schedule rows")
}

/// Loads schedule rows for one movie, ordered by showtime.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn load_schedule_for_movie(conn: &Connection, movie_id: u32) -> Result<Vec<ScheduleRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT movie_id, cinema_id, session_id, datetime, min_price
             FROM schedule
             WHERE movie_id = ?1
             ORDER BY datetime",
        )
        .context("failed to prepare schedule query")?;

    let rows = stmt
        .query_map([movie_id], map_schedule_row)
        .context("failed to query schedule by movie")?;

    rows.collect::<std::result::Result<Vec<_>, _>>()
        .context("failed to read schedule rows")
}

/// Maps a database row to a `ScheduleRow`.
fn map_schedule_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ScheduleRow> {
    Ok(ScheduleRow {
        movie_id: row.get(0)?,
        cinema_id: row.get(1)?,
        session_id: row.get(2)?,
        datetime: row.get(3)?,
        min_price: row.get(4)?,
    })
}
