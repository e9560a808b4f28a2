//! Request parameter types for the listings endpoints.

use anyhow::{Context, Result};
use chrono::NaiveDate;

/// `date` query parameter for the listing and schedule endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    /// First day, inclusive.
    pub start: NaiveDate,
    /// Last day, inclusive.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new `DateRange`.
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A range collapsed to a single day.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Formats as the endpoint's `date` query value.
    ///
    /// Example: `"2026-08-05--2026-08-09"`
    #[must_use]
    pub fn to_query_format(&self) -> String {
        format!(
            "{}--{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d"),
        )
    }

    /// Whether a day falls inside the range (inclusive on both ends).
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Parses a `%Y-%m-%d` date string.
///
/// # Errors
///
/// Returns an error if the string does not match the format.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date format: {s}"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_date_range_format() {
        // Arrange
        let start = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 8, 9).unwrap();

        // Act
        let range = DateRange::new(start, end);

        // Assert
        assert_eq!(range.to_query_format(), "2026-08-05--2026-08-09");
    }

    #[test]
    fn test_single_day_collapses_range() {
        // Arrange
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();

        // Act
        let range = DateRange::single_day(date);

        // Assert
        assert_eq!(range.to_query_format(), "2026-08-05--2026-08-05");
    }

    #[test]
    fn test_contains_is_inclusive() {
        // Arrange
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 9).unwrap(),
        );

        // Act & Assert
        assert!(range.contains(NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2026, 8, 9).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2026, 8, 10).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2026, 8, 4).unwrap()));
    }

    #[test]
    fn test_parse_date() {
        // Arrange & Act
        let date = parse_date("2026-08-05").unwrap();

        // Assert
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 8, 5).unwrap());
    }

    #[test]
    fn test_parse_date_invalid() {
        // Arrange & Act
        let result = parse_date("05.08.2026");

        // Assert
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("invalid date format"));
    }
}
