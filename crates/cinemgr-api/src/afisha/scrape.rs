//! Pull-based pagination over the listing and schedule endpoints.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use super::api::LocalAfishaApi;
use super::params::DateRange;
use super::types::{CinemaSessions, MovieRecord, SessionItem, SessionRecord};

/// Regex for the movie-specific path segment of a canonical movie URL.
#[allow(clippy::expect_used)]
static MOVIE_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/movie/([^/]+)/").expect("failed to compile slug regex"));

/// Fixed session timestamp format used by the source.
const SESSION_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Extracts the movie slug from a canonical movie URL: the path segment
/// between `/movie/` and the next `/`.
///
/// # Errors
///
/// Returns an error if the URL does not contain a `/movie/{slug}/`
/// segment.
pub fn movie_slug(url: &str) -> Result<String> {
    MOVIE_SLUG_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| String::from(m.as_str()))
        .with_context(|| format!("no movie slug in URL: {url}"))
}

/// Pull-based pager over the movie listing endpoint.
///
/// Pages are numbered from 1 and fetched one per `next_page` call; the
/// first page that yields zero items ends the sequence. The source gives
/// no end-of-data signal, so that empty page is requested.
#[derive(Debug)]
pub struct MoviePages<'a, A> {
    api: &'a A,
    date: Option<NaiveDate>,
    page: u32,
    done: bool,
}

impl<'a, A: LocalAfishaApi> MoviePages<'a, A> {
    /// Creates a pager, optionally restricted to a single day.
    pub const fn new(api: &'a A, date: Option<NaiveDate>) -> Self {
        Self {
            api,
            date,
            page: 0,
            done: false,
        }
    }

    /// Fetches the next listing page and assembles its movie records,
    /// fetching each item's poster along the way. Returns `None` once the
    /// sequence has ended.
    ///
    /// # Errors
    ///
    /// Returns an error if the page fetch fails below the status level or
    /// the body cannot be decoded. Poster failures do not error; the
    /// record is emitted without an image.
    pub async fn next_page(&mut self) -> Result<Option<Vec<MovieRecord>>> {
        if self.done {
            return Ok(None);
        }

        self.page = self.page.checked_add(1).context("page counter overflow")?;

        let items = self.api.listing_page(self.date, self.page).await?;
        tracing::debug!(page = self.page, fetched = items.len(), "listing page completed");

        if items.is_empty() {
            self.done = true;
            return Ok(None);
        }

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            let image = match item.image.as_ref() {
                Some(link) => self.api.poster(&link.url).await,
                None => None,
            };
            records.push(MovieRecord { info: item, image });
        }

        Ok(Some(records))
    }
}

/// Pull-based pager over one movie's schedule endpoint.
///
/// Same page numbering and empty-page termination as `MoviePages`, plus a
/// date-window cutoff: the source orders sessions chronologically, so the
/// first session outside the window ends the whole traversal. Remaining
/// blocks on the page are dropped and no further pages are fetched.
#[derive(Debug)]
pub struct SchedulePages<'a, A> {
    api: &'a A,
    slug: String,
    range: DateRange,
    page: u32,
    done: bool,
}

impl<'a, A: LocalAfishaApi> SchedulePages<'a, A> {
    /// Creates a pager for the movie behind `movie_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not contain a movie slug.
    pub fn new(api: &'a A, movie_url: &str, range: DateRange) -> Result<Self> {
        Ok(Self {
            api,
            slug: movie_slug(movie_url)?,
            range,
            page: 0,
            done: false,
        })
    }

    /// Fetches the next schedule page and emits its cinema blocks with
    /// sessions filtered to the date window. Returns `None` once the
    /// sequence has ended.
    ///
    /// # Errors
    ///
    /// Returns an error if the page fetch fails below the status level,
    /// the body cannot be decoded, or a session carries a non-conforming
    /// timestamp.
    pub async fn next_page(&mut self) -> Result<Option<Vec<CinemaSessions>>> {
        if self.done {
            return Ok(None);
        }

        self.page = self.page.checked_add(1).context("page counter overflow")?;

        let items = self
            .api
            .schedule_page(&self.slug, &self.range, self.page)
            .await?;
        tracing::debug!(
            slug = %self.slug,
            page = self.page,
            fetched = items.len(),
            "schedule page completed"
        );

        if items.is_empty() {
            self.done = true;
            return Ok(None);
        }

        let mut blocks = Vec::with_capacity(items.len());
        for item in items {
            let (sessions, past_window) = accept_sessions(&item.sessions, &self.range)?;
            blocks.push(CinemaSessions {
                place: item.place,
                sessions,
            });
            if past_window {
                self.done = true;
                break;
            }
        }

        Ok(Some(blocks))
    }
}

/// Filters a block's sessions to the date window.
///
/// Returns the accepted sessions plus whether an out-of-window session was
/// hit. Sessions without an ID or a price cannot be booked and are dropped
/// silently; the window check still applies to them first.
fn accept_sessions(
    sessions: &[SessionItem],
    range: &DateRange,
) -> Result<(Vec<SessionRecord>, bool)> {
    let mut accepted = Vec::new();

    for session in sessions {
        let starts_at = NaiveDateTime::parse_from_str(&session.date_time, SESSION_DATETIME_FORMAT)
            .with_context(|| format!("invalid session timestamp: {}", session.date_time))?;

        if !range.contains(starts_at.date()) {
            return Ok((accepted, true));
        }

        let (Some(id), Some(min_price)) = (session.id.as_ref(), session.min_price.as_ref()) else {
            continue;
        };

        accepted.push(SessionRecord {
            id: id.clone(),
            starts_at,
            min_price: min_price.clone(),
        });
    }

    Ok((accepted, false))
}
