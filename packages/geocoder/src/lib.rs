#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geolocation resolver for property risk assessment.
//!
//! Converts a free-form address into a [`GeoResult`] using a
//! multi-provider strategy configured via TOML files in `services/`:
//!
//! 1. **Google Maps Geocoding** (priority 1): most accurate, requires
//!    `GOOGLE_MAPS_API_KEY`. Skipped silently when no key is configured.
//! 2. **Nominatim / OpenStreetMap** (priority 2): free, tries the address
//!    with `", USA"` and `", United States"` suffixes in turn.
//! 3. **Photon** (priority 3): free `OpenStreetMap`-based alternative.
//!
//! Providers are loaded from the [`service_registry`] and tried in
//! priority order by the [`resolver::GeolocationResolver`]. When all of
//! them miss, a simulated location is returned, so resolution never
//! fails.
//!
//! [`GeoResult`]: property_risk_models::GeoResult

pub mod classify;
pub mod google;
pub mod nominatim;
pub mod photon;
pub mod resolver;
pub mod service_registry;
pub mod simulated;

use async_trait::async_trait;
use property_risk_models::GeoSource;
use thiserror::Error;

/// User agent sent to public geocoders when none is configured.
pub const DEFAULT_USER_AGENT: &str = "property_risk_agent/0.1";

/// Raw coordinates returned by a single provider, before neighborhood
/// enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedAddress {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// The matched/canonical address returned by the geocoder.
    pub formatted_address: Option<String>,
    /// Which provider resolved this address.
    pub source: GeoSource,
}

/// Errors from geocoding operations.
///
/// These never escape the resolver; they are logged and treated as a
/// provider miss.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed (including timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success HTTP status.
    #[error("Provider returned status {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

/// A single geocoding backend.
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Provenance tag attached to results from this provider.
    fn source(&self) -> GeoSource;

    /// Geocodes a free-form address.
    ///
    /// Returns `Ok(None)` when the provider answered but found nothing.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] on transport failures, timeouts,
    /// non-success status codes or malformed payloads.
    async fn geocode(&self, address: &str) -> Result<Option<GeocodedAddress>, GeocodeError>;
}

/// Runtime configuration injected into providers at construction time.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Google Maps API key. The Google provider is skipped when absent.
    pub google_maps_api_key: Option<String>,
    /// User agent for outgoing requests (Nominatim rejects anonymous
    /// clients).
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            google_maps_api_key: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl GeocoderConfig {
    /// Reads `GOOGLE_MAPS_API_KEY` and `GEOCODER_USER_AGENT` from the
    /// environment. Empty values are treated as unset.
    #[must_use]
    pub fn from_env() -> Self {
        let google_maps_api_key = std::env::var("GOOGLE_MAPS_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let user_agent = std::env::var("GEOCODER_USER_AGENT")
            .ok()
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        Self {
            google_maps_api_key,
            user_agent,
        }
    }

    /// Builds the shared HTTP client used by every provider.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the TLS backend fails to
    /// initialize.
    pub fn http_client(&self) -> Result<reqwest::Client, GeocodeError> {
        Ok(reqwest::Client::builder()
            .user_agent(self.user_agent.clone())
            .build()?)
    }
}
