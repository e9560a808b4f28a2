//! Afisha listings site client module.
//!
//! Handles HTTP requests to the movie listing and per-movie schedule
//! endpoints, decodes the JSON bodies, and drives pagination.

mod api;
mod client;
mod params;
mod scrape;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{AfishaApi, LocalAfishaApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{AfishaClient, AfishaClientBuilder};
pub use params::{DateRange, parse_date};
pub use scrape::{MoviePages, SchedulePages, movie_slug};
pub use types::{
    CinemaItem, CinemaSessions, ImageLink, ListingResponse, MovieItem, MovieRecord, PlaceItem,
    ScheduleResponse, SessionItem, SessionRecord,
};
