//! JSON response types and deserializer helpers.

use chrono::NaiveDateTime;
use serde::de::Error;
use serde::{Deserialize, Deserializer};

/// Deserializes empty strings as `None` (for `String` fields).
///
/// The source emits `""` where a value is missing; downstream code only
/// wants to see `None` in that case.
///
/// # Errors
///
/// Returns an error if the underlying value is not a string or null.
pub fn deserialize_empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let result = Option::deserialize(deserializer);
    let s: Option<String> = result.map_err(D::Error::custom)?;
    Ok(s.filter(|s| !s.is_empty()))
}

/// Movie listing page response.
#[derive(Debug, Deserialize)]
pub struct ListingResponse {
    /// Widget wrapper carrying the page's movie items.
    #[serde(rename = "ScheduleWidget")]
    pub schedule_widget: ListingWidget,
}

/// Movie items container inside a listing response.
#[derive(Debug, Deserialize)]
pub struct ListingWidget {
    /// Movie items on this page (absent means empty).
    #[serde(rename = "Items", default)]
    pub items: Vec<MovieItem>,
}

/// One movie item on a listing page.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieItem {
    /// Source-assigned movie ID.
    #[serde(rename = "ID")]
    pub id: u32,
    /// Movie name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Production year (nullable).
    #[serde(rename = "ProductionYear", default)]
    pub production_year: Option<i32>,
    /// Production country (nullable).
    #[serde(
        rename = "Country",
        deserialize_with = "deserialize_empty_string_as_none",
        default
    )]
    pub country: Option<String>,
    /// Duration, free text (nullable).
    #[serde(
        rename = "Duration",
        deserialize_with = "deserialize_empty_string_as_none",
        default
    )]
    pub duration: Option<String>,
    /// Synopsis (nullable).
    #[serde(
        rename = "Synopsis",
        deserialize_with = "deserialize_empty_string_as_none",
        default
    )]
    pub synopsis: Option<String>,
    /// Source rating (nullable).
    #[serde(rename = "Rating", default)]
    pub rating: Option<f64>,
    /// Canonical movie page URL.
    #[serde(rename = "Url")]
    pub url: String,
    /// Nested poster image reference (nullable).
    #[serde(rename = "Image1x1", default)]
    pub image: Option<ImageLink>,
}

/// A nested image reference.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageLink {
    /// Image URL.
    #[serde(rename = "Url")]
    pub url: String,
}

/// Schedule page response for one movie.
#[derive(Debug, Deserialize)]
pub struct ScheduleResponse {
    /// Widget wrapper carrying the page's cinema blocks.
    #[serde(rename = "ScheduleWidget")]
    pub schedule_widget: ScheduleWidget,
}

/// Cinema block container inside a schedule response.
#[derive(Debug, Deserialize)]
pub struct ScheduleWidget {
    /// Per-cinema schedule blocks on this page (absent means empty).
    #[serde(rename = "Items", default)]
    pub items: Vec<CinemaItem>,
}

/// One per-cinema schedule block.
#[derive(Debug, Clone, Deserialize)]
pub struct CinemaItem {
    /// Cinema info.
    #[serde(rename = "Place")]
    pub place: PlaceItem,
    /// Sessions at this cinema, chronologically ordered by the source.
    #[serde(rename = "Sessions", default)]
    pub sessions: Vec<SessionItem>,
}

/// Cinema info inside a schedule block.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceItem {
    /// Source-assigned cinema ID.
    #[serde(rename = "ID")]
    pub id: u32,
    /// Cinema name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Street address (nullable).
    #[serde(
        rename = "Address",
        deserialize_with = "deserialize_empty_string_as_none",
        default
    )]
    pub address: Option<String>,
    /// Source rating (nullable).
    #[serde(rename = "Rating", default)]
    pub rating: Option<f64>,
}

/// One session inside a cinema block.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionItem {
    /// Source-assigned session ID (empty deserializes as `None`).
    #[serde(
        rename = "ID",
        deserialize_with = "deserialize_empty_string_as_none",
        default
    )]
    pub id: Option<String>,
    /// Showtime in the source's fixed `%Y-%m-%dT%H:%M:%S` format.
    #[serde(rename = "DateTime")]
    pub date_time: String,
    /// Minimum ticket price (empty deserializes as `None`).
    #[serde(
        rename = "MinPrice",
        deserialize_with = "deserialize_empty_string_as_none",
        default
    )]
    pub min_price: Option<String>,
}

/// A fully assembled movie record: listing info plus fetched poster bytes.
#[derive(Debug, Clone)]
pub struct MovieRecord {
    /// Listing page fields.
    pub info: MovieItem,
    /// Poster bytes; `None` when the poster fetch failed or no poster
    /// was referenced.
    pub image: Option<Vec<u8>>,
}

/// A session accepted into the requested date window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Source-assigned session ID.
    pub id: String,
    /// Parsed showtime.
    pub starts_at: NaiveDateTime,
    /// Minimum ticket price.
    pub min_price: String,
}

/// A cinema paired with its accepted sessions.
#[derive(Debug, Clone)]
pub struct CinemaSessions {
    /// Cinema info.
    pub place: PlaceItem,
    /// Accepted sessions; may be empty when every session in the block
    /// was dropped.
    pub sessions: Vec<SessionRecord>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_parse_listing_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/afisha/listing_page1.json");

        // Act
        let response: ListingResponse = serde_json::from_str(json).unwrap();

        // Assert
        let items = &response.schedule_widget.items;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, 276_259);
        assert_eq!(items[0].name, "Сталкер");
        assert_eq!(items[0].production_year, Some(1979));
        assert_eq!(items[0].country.as_deref(), Some("СССР"));
        assert_eq!(items[0].url, "https://www.afisha.ru/movie/276259/");
        assert!(items[0].image.is_some());
        assert_eq!(items[1].id, 201_448);
    }

    #[test]
    fn test_parse_empty_listing_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/afisha/empty_page.json");

        // Act
        let response: ListingResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert!(response.schedule_widget.items.is_empty());
    }

    #[test]
    fn test_parse_schedule_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/afisha/schedule_page1.json");

        // Act
        let response: ScheduleResponse = serde_json::from_str(json).unwrap();

        // Assert
        let items = &response.schedule_widget.items;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].place.id, 7083);
        assert_eq!(items[0].place.name, "Октябрь");
        assert_eq!(items[0].place.address.as_deref(), Some("Новый Арбат, 24"));
        assert_eq!(items[0].sessions.len(), 3);
        assert_eq!(items[0].sessions[0].id.as_deref(), Some("sess-1001"));
        assert_eq!(items[0].sessions[0].min_price.as_deref(), Some("450"));
    }

    #[test]
    fn test_empty_session_fields_parse_as_none() {
        // Arrange: fixture holds one session with "" ID and one with "" price
        let json = include_str!("../../../../fixtures/afisha/schedule_page1.json");

        // Act
        let response: ScheduleResponse = serde_json::from_str(json).unwrap();

        // Assert
        let items = &response.schedule_widget.items;
        assert_eq!(items[0].sessions[2].id, None);
        assert_eq!(items[1].sessions[0].min_price, None);
    }

    #[test]
    fn test_parse_movie_without_image() {
        // Arrange
        let json = r#"
        {
            "ID": 5,
            "Name": "Без постера",
            "Url": "https://www.afisha.ru/movie/5/"
        }
        "#;

        // Act
        let item: MovieItem = serde_json::from_str(json).unwrap();

        // Assert
        assert!(item.image.is_none());
        assert!(item.production_year.is_none());
        assert!(item.rating.is_none());
    }

    #[test]
    fn test_parse_malformed_listing_fails() {
        // Arrange: Items holds a string instead of objects
        let json = r#"{"ScheduleWidget": {"Items": ["oops"]}}"#;

        // Act
        let result: std::result::Result<ListingResponse, _> = serde_json::from_str(json);

        // Assert
        assert!(result.is_err());
    }
}
