#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime data resolver for property risk assessment.
//!
//! Produces a [`CrimeResult`] for an address through an ordered chain:
//!
//! 1. A city open-data API (Socrata) when the city is known or detected
//!    and coordinates are available. Each city is a TOML definition under
//!    `cities/`.
//! 2. Bounding-box estimation from coordinates, driven by the region table
//!    in `regions.toml`.
//! 3. A single on-demand geocode when no coordinates were supplied.
//! 4. Simulated statistics.
//!
//! The [`resolver::CrimeDataResolver`] never fails; provider errors are
//! logged and skipped.
//!
//! [`CrimeResult`]: property_risk_models::CrimeResult

pub mod city;
pub mod city_source;
pub mod estimate;
pub mod resolver;
pub mod simulated;
pub mod socrata;
pub mod type_mapping;

use async_trait::async_trait;
use property_risk_models::CrimeResult;

/// Errors from crime statistics providers.
///
/// These never escape the resolver; they are logged and treated as a
/// provider miss.
#[derive(Debug, thiserror::Error)]
pub enum CrimeDataError {
    /// HTTP request failed (including timeouts).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider answered with a non-success HTTP status.
    #[error("Provider returned status {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },
}

/// A city-level crime statistics provider.
#[async_trait]
pub trait CrimeStatsProvider: Send + Sync {
    /// Provenance tag for results (e.g., `"nypd_api"`).
    fn id(&self) -> &str;

    /// Whether this provider serves the given lowercase city name or hint.
    fn serves(&self, city: &str) -> bool;

    /// Fetches recent incidents near the coordinates and reduces them to
    /// crime indices.
    ///
    /// Returns `Ok(None)` when the provider answered with no records.
    ///
    /// # Errors
    ///
    /// Returns [`CrimeDataError`] on transport failures, timeouts,
    /// non-success status codes or malformed payloads.
    async fn fetch_stats(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<CrimeResult>, CrimeDataError>;
}
