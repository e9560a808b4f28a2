//! Listings site client library for cinemgr.
//!
//! Provides the Afisha client: movie listing and schedule pagination,
//! JSON response parsing, and poster retrieval.

/// Afisha listings site client.
pub mod afisha;
