#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the property risk server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the pipeline value types to allow independent evolution of the API
//! contract.

use std::str::FromStr as _;

use property_risk_models::{
    Confidence, CrimeSource, GeoSource, PropertyInput, PropertyType, RiskDimensions,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of `POST /api/assess`, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRequest {
    /// Property address.
    pub address: String,
    /// One of `home`, `rental`, `vacation home`, `business` (any case).
    pub property_type: String,
    /// Whether the property has a perimeter fence.
    pub fenced: bool,
    /// Whether the property has a gated entry.
    pub gated: bool,
    /// Free-form operating hours, e.g. `"24/7"`.
    #[serde(default)]
    pub operating_hours: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Why a request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Address is empty or whitespace only.
    #[error("address cannot be empty")]
    EmptyAddress,

    /// Property type is not one of the supported categories.
    #[error("property_type must be one of: business, home, rental, vacation home (got '{value}')")]
    InvalidPropertyType {
        /// The rejected value.
        value: String,
    },
}

impl AssessmentRequest {
    /// Trims the address and parses the property type.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the address is blank or the property
    /// type is unknown.
    pub fn validate(self) -> Result<PropertyInput, ValidationError> {
        let address = self.address.trim();
        if address.is_empty() {
            return Err(ValidationError::EmptyAddress);
        }

        let property_type = PropertyType::from_str(self.property_type.trim()).map_err(|_| {
            ValidationError::InvalidPropertyType {
                value: self.property_type.clone(),
            }
        })?;

        Ok(PropertyInput {
            address: address.to_string(),
            property_type,
            fenced: self.fenced,
            gated: self.gated,
            operating_hours: self.operating_hours,
            notes: self.notes,
        })
    }
}

/// Which sources the assessment data came from.
#[derive(Debug, Clone, Serialize)]
pub struct ApiSources {
    /// Crime data provenance tag.
    pub crime_data: CrimeSource,
    /// Geolocation provenance tag.
    pub geolocation: GeoSource,
}

/// Map coordinates of the assessed property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
}

/// Body of a successful `POST /api/assess` response.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentResponse {
    /// Validated, trimmed address.
    pub address: String,
    /// Lowercase property category.
    pub property_type: PropertyType,
    /// Echo of the request flag.
    pub fenced: bool,
    /// Echo of the request flag.
    pub gated: bool,
    /// Echo of the request field.
    pub operating_hours: Option<String>,
    /// Echo of the request field.
    pub notes: Option<String>,
    /// Per-dimension scores and summaries.
    pub risk_dimensions: RiskDimensions,
    /// Weighted overall score (0-100, two decimals).
    pub overall_score: f64,
    /// 1.0, 0.7 or 0.5.
    pub confidence: Confidence,
    /// Ordered advisories.
    pub recommendations: Vec<String>,
    /// Data provenance.
    pub api_sources_used: ApiSources,
    /// Coordinates for map display, `null` when unknown.
    pub coordinates: Option<Coordinates>,
}

/// Error body shared by 4xx and 5xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error class.
    pub error: String,
    /// Human-readable detail.
    pub message: String,
}

impl ApiError {
    /// A rejected request.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            error: "Validation error".to_string(),
            message: message.into(),
        }
    }

    /// An unexpected server-side failure.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: "Internal server error".to_string(),
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// `"healthy"` when `healthy` is set.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Server version.
    pub version: String,
}

/// Service description returned by `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInfo {
    /// Service name.
    pub service: String,
    /// Server version.
    pub version: String,
    /// Always `"running"`.
    pub status: String,
    /// Where the API is documented.
    pub docs: String,
    /// Health check path.
    pub health: String,
    /// Assessment endpoint path.
    pub api: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(value: serde_json::Value) -> AssessmentRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn validation_trims_and_normalizes() {
        let input = request(serde_json::json!({
            "address": "  350 5th Ave, New York, NY  ",
            "property_type": "Vacation Home",
            "fenced": true,
            "gated": false
        }))
        .validate()
        .unwrap();

        assert_eq!(input.address, "350 5th Ave, New York, NY");
        assert_eq!(input.property_type, PropertyType::VacationHome);
        assert!(input.operating_hours.is_none());
        assert!(input.notes.is_none());
    }

    #[test]
    fn blank_address_is_rejected() {
        let err = request(serde_json::json!({
            "address": "   ",
            "property_type": "home",
            "fenced": false,
            "gated": false
        }))
        .validate()
        .unwrap_err();
        assert_eq!(err, ValidationError::EmptyAddress);
    }

    #[test]
    fn unknown_property_type_is_rejected() {
        let err = request(serde_json::json!({
            "address": "1 Main St",
            "property_type": "castle",
            "fenced": false,
            "gated": false
        }))
        .validate()
        .unwrap_err();
        assert!(err.to_string().starts_with("property_type must be one of"));
    }

    #[test]
    fn property_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(PropertyType::VacationHome).unwrap(),
            serde_json::json!("vacation home")
        );
    }

    #[test]
    fn error_bodies() {
        assert_eq!(
            serde_json::to_value(ApiError::validation("address cannot be empty")).unwrap(),
            serde_json::json!({
                "error": "Validation error",
                "message": "address cannot be empty"
            })
        );
        assert_eq!(ApiError::internal("boom").error, "Internal server error");
    }
}
