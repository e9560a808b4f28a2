//! `AfishaApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;
use chrono::NaiveDate;

use super::params::DateRange;
use super::types::{CinemaItem, MovieItem};

/// Listings site fetch capability.
///
/// Abstracts the three fetch operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(AfishaApi: Send)]
pub trait LocalAfishaApi {
    /// Fetches one movie listing page, optionally restricted to a single
    /// day. A non-success HTTP status yields an empty page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails below the status level or the
    /// JSON body cannot be decoded.
    async fn listing_page(&self, date: Option<NaiveDate>, page: u32) -> Result<Vec<MovieItem>>;

    /// Fetches one schedule page for the movie identified by `slug`.
    /// A non-success HTTP status yields an empty page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails below the status level or the
    /// JSON body cannot be decoded.
    async fn schedule_page(
        &self,
        slug: &str,
        range: &DateRange,
        page: u32,
    ) -> Result<Vec<CinemaItem>>;

    /// Fetches a poster image. Every failure degrades to `None`; poster
    /// problems never abort ingestion.
    async fn poster(&self, url: &str) -> Option<Vec<u8>>;
}
