//! Persistence layer for collected cinema listings.
//!
//! Uses `rusqlite` (bundled `SQLite`) to store movies, cinemas, and
//! showtime schedule rows. All writes are insert-if-absent: rows are
//! never updated or deleted, and a duplicate key is a silent no-op.

/// Cinema CRUD operations.
pub mod cinemas;
mod connection;
mod migrations;
/// Movie CRUD operations.
pub mod movies;
/// Schedule (session) CRUD operations.
pub mod schedule;

pub use rusqlite::Connection;

#[allow(clippy::module_name_repetitions)]
pub use cinemas::{load_cinemas, save_cinema};
#[allow(clippy::module_name_repetitions)]
pub use connection::open_db;
#[allow(clippy::module_name_repetitions)]
pub use movies::{load_movies, save_movie};
#[allow(clippy::module_name_repetitions)]
pub use schedule::{load_schedule, load_schedule_for_movie, save_cinema_sessions, save_session};
