//! Nominatim / OpenStreetMap geocoder client.
//!
//! Used when Google Maps is unavailable. The address is tried as given and
//! then with each configured country suffix (`", USA"`,
//! `", United States"`); the first valid match wins.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use std::time::Duration;

use async_trait::async_trait;
use property_risk_models::GeoSource;

use crate::classify::is_valid_coordinates;
use crate::{GeocodeError, GeocodedAddress, GeocodingProvider};

/// Nominatim geocoder with address-variant retries.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    address_suffixes: Vec<String>,
    timeout: Duration,
}

impl NominatimGeocoder {
    /// Creates a new Nominatim geocoder.
    ///
    /// An empty `address_suffixes` list is treated as a single attempt
    /// with the address as given.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        address_suffixes: Vec<String>,
        timeout: Duration,
    ) -> Self {
        let address_suffixes = if address_suffixes.is_empty() {
            vec![String::new()]
        } else {
            address_suffixes
        };
        Self {
            client,
            base_url,
            address_suffixes,
            timeout,
        }
    }
}

#[async_trait]
impl GeocodingProvider for NominatimGeocoder {
    fn source(&self) -> GeoSource {
        GeoSource::Nominatim
    }

    async fn geocode(&self, address: &str) -> Result<Option<GeocodedAddress>, GeocodeError> {
        for suffix in &self.address_suffixes {
            let variant = format!("{address}{suffix}");
            log::debug!("Trying Nominatim geocoding: {variant}");

            match geocode_freeform(&self.client, &self.base_url, &variant, self.timeout).await {
                Ok(Some(found)) if is_valid_coordinates(found.latitude, found.longitude) => {
                    return Ok(Some(found));
                }
                Ok(Some(found)) => {
                    log::warn!(
                        "Invalid Nominatim coordinates for '{variant}': {}, {}",
                        found.latitude,
                        found.longitude
                    );
                }
                Ok(None) => {}
                Err(e) => log::debug!("Nominatim error for '{variant}': {e}"),
            }
        }

        Ok(None)
    }
}

/// Geocodes a free-form query using Nominatim.
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request or response parsing fails.
pub async fn geocode_freeform(
    client: &reqwest::Client,
    base_url: &str,
    query: &str,
    timeout: Duration,
) -> Result<Option<GeocodedAddress>, GeocodeError> {
    let resp = client
        .get(base_url)
        .query(&[
            ("q", query),
            ("format", "jsonv2"),
            ("limit", "1"),
            ("addressdetails", "1"),
            ("accept-language", "en"),
        ])
        .timeout(timeout)
        .send()
        .await?;

    if !resp.status().is_success() {
        return Err(GeocodeError::Status {
            status: resp.status().as_u16(),
        });
    }

    let body: serde_json::Value = resp.json().await?;
    parse_response(&body)
}

/// Parses Nominatim JSON response.
fn parse_response(body: &serde_json::Value) -> Result<Option<GeocodedAddress>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let lat = first["lat"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lat in Nominatim response".to_string(),
        })?;

    let lon = first["lon"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lon in Nominatim response".to_string(),
        })?;

    let display_name = first["display_name"].as_str().map(String::from);

    Ok(Some(GeocodedAddress {
        latitude: lat,
        longitude: lon,
        formatted_address: display_name,
        source: GeoSource::Nominatim,
    }))
}
