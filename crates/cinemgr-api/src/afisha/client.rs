//! `AfishaClient` - listings site HTTP client implementation.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONNECTION, HeaderMap, HeaderValue};
use tracing::instrument;
use url::Url;

use super::api::LocalAfishaApi;
use super::params::DateRange;
use super::types::{CinemaItem, ListingResponse, MovieItem, ScheduleResponse};

/// Default base URL (listing pages for the Moscow region).
const DEFAULT_BASE_URL: &str = "https://www.afisha.ru/msk/";

/// Items requested per page. The endpoints return at most this many items;
/// a page with zero items marks the end of the data.
pub const PAGE_SIZE: u32 = 24;

/// Sort order for the movie listing endpoint.
const LISTING_SORT: &str = "recommendations";

/// Sort order for the schedule endpoint.
const SCHEDULE_SORT: &str = "rating";

/// Browser-like User-Agent; the endpoints refuse obvious bot agents.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:136.0) \
                                  Gecko/20100101 Firefox/136.0";

/// Listings site HTTP client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct AfishaClient {
    /// HTTP client (reqwest, gzip enabled).
    http_client: Client,
    /// Base URL.
    base_url: Url,
}

/// Builder for `AfishaClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct AfishaClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
}

impl AfishaClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Overrides the User-Agent (default: a browser-like agent).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - the default base URL fails to parse.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<AfishaClient> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| String::from(DEFAULT_USER_AGENT));

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .default_headers(headers)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(AfishaClient {
            http_client,
            base_url,
        })
    }
}

impl AfishaClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> AfishaClientBuilder {
        AfishaClientBuilder::new()
    }

    /// Sends a GET request and decodes the JSON body.
    ///
    /// Returns `Ok(None)` on a non-success status: an unretrievable page
    /// reads as an empty one, which ends pagination. Connection-level
    /// failures and undecodable bodies propagate as errors.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        tracing::debug!(%url, "listing site request");

        let response = self
            .http_client
            .get(url.clone())
            .query(query)
            .send()
            .await
            .with_context(|| format!("request failed: {url}"))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%url, code = status.as_u16(), "page not retrievable, treating as empty");
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        let parsed =
            raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
        Ok(Some(parsed))
    }
}

impl LocalAfishaApi for AfishaClient {
    #[instrument(skip_all)]
    async fn listing_page(&self, date: Option<NaiveDate>, page: u32) -> Result<Vec<MovieItem>> {
        let mut query: Vec<(&str, String)> = vec![
            ("sort", String::from(LISTING_SORT)),
            ("page", page.to_string()),
            ("pageSize", PAGE_SIZE.to_string()),
        ];
        if let Some(date) = date {
            query.push(("date", DateRange::single_day(date).to_query_format()));
        }

        let response: Option<ListingResponse> = self.get_json("schedule_cinema/", &query).await?;
        Ok(response.map_or_else(Vec::new, |r| r.schedule_widget.items))
    }

    #[instrument(skip_all)]
    async fn schedule_page(
        &self,
        slug: &str,
        range: &DateRange,
        page: u32,
    ) -> Result<Vec<CinemaItem>> {
        let path = format!("schedule_cinema_product/{slug}/");
        let query: Vec<(&str, String)> = vec![
            ("view", String::from("list")),
            ("sort", String::from(SCHEDULE_SORT)),
            ("date", range.to_query_format()),
            ("page", page.to_string()),
            ("pageSize", PAGE_SIZE.to_string()),
        ];

        let response: Option<ScheduleResponse> = self.get_json(&path, &query).await?;
        Ok(response.map_or_else(Vec::new, |r| r.schedule_widget.items))
    }

    #[instrument(skip_all)]
    async fn poster(&self, url: &str) -> Option<Vec<u8>> {
        let response = match self.http_client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(%url, error = %e, "poster fetch failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%url, code = status.as_u16(), "poster not retrievable");
            return None;
        }

        match response.bytes().await {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(e) => {
                tracing::debug!(%url, error = %e, "failed to read poster body");
                None
            }
        }
    }
}
