//! Photon geocoder client.
//!
//! Photon is a free `OpenStreetMap`-based search service that returns
//! `GeoJSON` `FeatureCollection` responses. It is tried once, without
//! address variants, after Nominatim.
//!
//! See <https://photon.komoot.io>

use std::time::Duration;

use async_trait::async_trait;
use property_risk_models::GeoSource;

use crate::classify::is_valid_coordinates;
use crate::{GeocodeError, GeocodedAddress, GeocodingProvider};

/// Photon geocoder.
pub struct PhotonGeocoder {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl PhotonGeocoder {
    /// Creates a new Photon geocoder.
    #[must_use]
    pub const fn new(client: reqwest::Client, base_url: String, timeout: Duration) -> Self {
        Self {
            client,
            base_url,
            timeout,
        }
    }
}

#[async_trait]
impl GeocodingProvider for PhotonGeocoder {
    fn source(&self) -> GeoSource {
        GeoSource::Photon
    }

    async fn geocode(&self, address: &str) -> Result<Option<GeocodedAddress>, GeocodeError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("q", address), ("limit", "1")])
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

/// Parses a Photon `GeoJSON` `FeatureCollection` response.
///
/// Out-of-range coordinates are treated as no match.
fn parse_response(
    body: &serde_json::Value,
    address: &str,
) -> Result<Option<GeocodedAddress>, GeocodeError> {
    let Some(first) = body
        .get("features")
        .and_then(serde_json::Value::as_array)
        .and_then(|f| f.first())
    else {
        return Ok(None);
    };

    let coords = first
        .pointer("/geometry/coordinates")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| GeocodeError::Parse {
            message: "Feature missing geometry.coordinates".to_string(),
        })?;

    if coords.len() < 2 {
        return Ok(None);
    }

    let lng = coords[0].as_f64().ok_or_else(|| GeocodeError::Parse {
        message: "longitude is not a number".to_string(),
    })?;
    let lat = coords[1].as_f64().ok_or_else(|| GeocodeError::Parse {
        message: "latitude is not a number".to_string(),
    })?;

    if !is_valid_coordinates(lat, lng) {
        return Ok(None);
    }

    Ok(Some(GeocodedAddress {
        latitude: lat,
        longitude: lng,
        formatted_address: Some(format_label(first, address)),
        source: GeoSource::Photon,
    }))
}

/// Builds `name[, city][, country]`, using the input address when the
/// feature has no name.
fn format_label(feature: &serde_json::Value, address: &str) -> String {
    let property = |key: &str| {
        feature
            .pointer(&format!("/properties/{key}"))
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
    };

    let mut label = property("name").unwrap_or(address).to_string();
    for key in ["city", "country"] {
        if let Some(part) = property(key) {
            label.push_str(", ");
            label.push_str(part);
        }
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_photon_feature() {
        let body = serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [-122.4194, 37.7749] },
                "properties": {
                    "name": "Market Street",
                    "city": "San Francisco",
                    "country": "United States"
                }
            }]
        });
        let result = parse_response(&body, "market st").unwrap().unwrap();
        assert!((result.latitude - 37.7749).abs() < 1e-4);
        assert!((result.longitude - -122.4194).abs() < 1e-4);
        assert_eq!(result.source, GeoSource::Photon);
        assert_eq!(
            result.formatted_address.as_deref(),
            Some("Market Street, San Francisco, United States")
        );
    }

    #[test]
    fn label_defaults_to_input_address() {
        let body = serde_json::json!({
            "features": [{
                "geometry": { "coordinates": [2.35, 48.85] },
                "properties": { "country": "France" }
            }]
        });
        let result = parse_response(&body, "1 rue de rivoli").unwrap().unwrap();
        assert_eq!(
            result.formatted_address.as_deref(),
            Some("1 rue de rivoli, France")
        );
    }

    #[test]
    fn parses_photon_empty() {
        let body = serde_json::json!({ "type": "FeatureCollection", "features": [] });
        assert!(parse_response(&body, "x").unwrap().is_none());
        assert!(parse_response(&serde_json::json!({}), "x").unwrap().is_none());
    }

    #[test]
    fn out_of_range_coordinates_are_a_miss() {
        let body = serde_json::json!({
            "features": [{ "geometry": { "coordinates": [200.0, 95.0] }, "properties": {} }]
        });
        assert!(parse_response(&body, "x").unwrap().is_none());
    }

    #[test]
    fn short_coordinate_array_is_a_miss() {
        let body = serde_json::json!({
            "features": [{ "geometry": { "coordinates": [1.0] } }]
        });
        assert!(parse_response(&body, "x").unwrap().is_none());
    }
}
