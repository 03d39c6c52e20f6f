//! Google Maps Geocoding API client.
//!
//! The most accurate provider, but it needs an API key; the resolver only
//! constructs it when `GOOGLE_MAPS_API_KEY` is set.
//!
//! See <https://developers.google.com/maps/documentation/geocoding/requests-geocoding>

use std::time::Duration;

use async_trait::async_trait;
use property_risk_models::GeoSource;

use crate::{GeocodeError, GeocodedAddress, GeocodingProvider};

/// Google Maps geocoder bound to one API key.
pub struct GoogleMapsGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl GoogleMapsGeocoder {
    /// Creates a new Google Maps geocoder.
    #[must_use]
    pub const fn new(
        client: reqwest::Client,
        base_url: String,
        api_key: String,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url,
            api_key,
            timeout,
        }
    }
}

#[async_trait]
impl GeocodingProvider for GoogleMapsGeocoder {
    fn source(&self) -> GeoSource {
        GeoSource::GoogleMaps
    }

    async fn geocode(&self, address: &str) -> Result<Option<GeocodedAddress>, GeocodeError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .timeout(self.timeout)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(GeocodeError::Status {
                status: resp.status().as_u16(),
            });
        }

        let body: serde_json::Value = resp.json().await?;
        parse_response(&body, address)
    }
}

/// Parses a Google Geocoding JSON response.
///
/// Any provider status other than `"OK"` (e.g. `ZERO_RESULTS`,
/// `REQUEST_DENIED`) is treated as no match.
fn parse_response(
    body: &serde_json::Value,
    address: &str,
) -> Result<Option<GeocodedAddress>, GeocodeError> {
    let status = body["status"].as_str().unwrap_or_default();
    if status != "OK" {
        log::debug!("Google Geocoding API status: {status}");
        return Ok(None);
    }

    let Some(first) = body["results"].as_array().and_then(|r| r.first()) else {
        return Ok(None);
    };

    let lat = first
        .pointer("/geometry/location/lat")
        .and_then(serde_json::Value::as_f64)
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing geometry.location.lat in Google response".to_string(),
        })?;
    let lng = first
        .pointer("/geometry/location/lng")
        .and_then(serde_json::Value::as_f64)
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing geometry.location.lng in Google response".to_string(),
        })?;

    let formatted = first["formatted_address"]
        .as_str()
        .map_or_else(|| address.to_string(), String::from);

    Ok(Some(GeocodedAddress {
        latitude: lat,
        longitude: lng,
        formatted_address: Some(formatted),
        source: GeoSource::GoogleMaps,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_google_result() {
        let body = serde_json::json!({
            "status": "OK",
            "results": [{
                "formatted_address": "233 S Wacker Dr, Chicago, IL 60606, USA",
                "geometry": { "location": { "lat": 41.8789, "lng": -87.6359 } }
            }]
        });
        let result = parse_response(&body, "233 s wacker").unwrap().unwrap();
        assert!((result.latitude - 41.8789).abs() < 1e-4);
        assert!((result.longitude - -87.6359).abs() < 1e-4);
        assert_eq!(result.source, GeoSource::GoogleMaps);
        assert_eq!(
            result.formatted_address.as_deref(),
            Some("233 S Wacker Dr, Chicago, IL 60606, USA")
        );
    }

    #[test]
    fn falls_back_to_input_address() {
        let body = serde_json::json!({
            "status": "OK",
            "results": [{ "geometry": { "location": { "lat": 1.0, "lng": 2.0 } } }]
        });
        let result = parse_response(&body, "somewhere").unwrap().unwrap();
        assert_eq!(result.formatted_address.as_deref(), Some("somewhere"));
    }

    #[test]
    fn non_ok_status_is_a_miss() {
        let body = serde_json::json!({ "status": "ZERO_RESULTS", "results": [] });
        assert!(parse_response(&body, "x").unwrap().is_none());

        let body = serde_json::json!({ "status": "REQUEST_DENIED" });
        assert!(parse_response(&body, "x").unwrap().is_none());
    }

    #[test]
    fn ok_with_empty_results_is_a_miss() {
        let body = serde_json::json!({ "status": "OK", "results": [] });
        assert!(parse_response(&body, "x").unwrap().is_none());
    }

    #[test]
    fn missing_location_is_a_parse_error() {
        let body = serde_json::json!({ "status": "OK", "results": [{ "geometry": {} }] });
        assert!(matches!(
            parse_response(&body, "x"),
            Err(GeocodeError::Parse { .. })
        ));
    }
}
