#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Value types shared across the property risk assessment pipeline.
//!
//! Every stage of an assessment produces one of these types and hands it
//! to the next stage: the geolocation resolver yields a [`GeoResult`], the
//! crime data resolver a [`CrimeResult`], the scorer [`RiskDimensions`] and
//! the aggregator an [`AssessmentResult`]. None of them are cached or
//! persisted between requests.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumString};

/// Upper bound for the violent and property crime indices.
pub const MAX_CRIME_INDEX: i64 = 100;

/// Upper bound for the recent incident count.
pub const MAX_RECENT_INCIDENTS: i64 = 30;

/// Coarse classification of the area surrounding an address.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NeighborhoodType {
    /// Dense city core.
    Urban,
    /// Residential ring around a city.
    Suburban,
    /// Sparsely populated area.
    Rural,
}

impl NeighborhoodType {
    /// Estimated population density (people per square mile).
    #[must_use]
    pub const fn population_density(self) -> u32 {
        match self {
            Self::Urban => 8000,
            Self::Suburban => 3000,
            Self::Rural => 500,
        }
    }

    /// Risk-relevant facilities typically found nearby.
    #[must_use]
    pub fn nearby_risks(self) -> BTreeSet<String> {
        let tags: &[&str] = match self {
            Self::Urban => &["nightclub", "warehouse", "school"],
            Self::Suburban => &["school"],
            Self::Rural => &[],
        };
        tags.iter().map(|t| (*t).to_string()).collect()
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Urban, Self::Suburban, Self::Rural]
    }
}

/// Which provider (or simulation mode) produced a [`GeoResult`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GeoSource {
    /// Google Maps Geocoding API.
    GoogleMaps,
    /// Nominatim / `OpenStreetMap`.
    Nominatim,
    /// Photon (komoot).
    Photon,
    /// Plain simulated location.
    Simulated,
    /// Simulated after every provider failed.
    SimulatedFallback,
    /// Simulated because the input address was blank.
    SimulatedEmptyAddress,
}

impl GeoSource {
    /// Whether this result came from the simulation generator rather than
    /// a real provider.
    #[must_use]
    pub const fn is_simulated(self) -> bool {
        matches!(
            self,
            Self::Simulated | Self::SimulatedFallback | Self::SimulatedEmptyAddress
        )
    }
}

/// Geolocation data for an address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoResult {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Neighborhood classification.
    pub neighborhood_type: NeighborhoodType,
    /// People per square mile.
    pub population_density: u32,
    /// Nearby risk facility tags (e.g. `"nightclub"`).
    pub nearby_risks: BTreeSet<String>,
    /// Canonical address, or the caller's input for simulated results.
    pub formatted_address: String,
    /// Provenance of this result.
    pub source: GeoSource,
}

impl GeoResult {
    /// Builds a result whose density and risk tags are looked up from the
    /// neighborhood classification.
    #[must_use]
    pub fn new(
        latitude: f64,
        longitude: f64,
        neighborhood_type: NeighborhoodType,
        formatted_address: String,
        source: GeoSource,
    ) -> Self {
        Self {
            latitude,
            longitude,
            neighborhood_type,
            population_density: neighborhood_type.population_density(),
            nearby_risks: neighborhood_type.nearby_risks(),
            formatted_address,
            source,
        }
    }
}

/// Which provider, heuristic or simulation mode produced a [`CrimeResult`].
///
/// Renders to the flat provenance tags exposed by the API, e.g.
/// `nypd_api` or `coordinate_estimation_manhattan`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CrimeSource {
    /// A city open-data API, tagged with its configured source id.
    CityApi(String),
    /// Bounding-box estimation, tagged with the matched region name.
    CoordinateEstimation(String),
    /// Estimation from coordinates obtained by on-demand geocoding.
    CoordinateBased,
    /// Synthetic data.
    Simulated,
    /// Synthetic data produced after an internal failure.
    SimulatedError,
}

impl CrimeSource {
    /// Whether this result is synthetic.
    #[must_use]
    pub const fn is_simulated(&self) -> bool {
        matches!(self, Self::Simulated | Self::SimulatedError)
    }
}

impl fmt::Display for CrimeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CityApi(id) => f.write_str(id),
            Self::CoordinateEstimation(region) => write!(f, "coordinate_estimation_{region}"),
            Self::CoordinateBased => f.write_str("coordinate_based"),
            Self::Simulated => f.write_str("simulated"),
            Self::SimulatedError => f.write_str("simulated_error"),
        }
    }
}

impl Serialize for CrimeSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Crime statistics for the area around an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrimeResult {
    /// Violent crime index (0-100).
    pub violent_crime_index: u32,
    /// Property crime index (0-100).
    pub property_crime_index: u32,
    /// Recent incident count (0-30).
    pub recent_incidents: u32,
    /// Provenance of this result.
    pub source: CrimeSource,
    /// Number of raw records the indices were computed from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_incidents_analyzed: Option<u64>,
    /// Length of the query window in days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_period_days: Option<u32>,
}

impl CrimeResult {
    /// Builds a result, clamping the indices to `0..=100` and the recent
    /// incident count to `0..=30`.
    #[must_use]
    pub fn new(violent: i64, property: i64, recent: i64, source: CrimeSource) -> Self {
        Self {
            violent_crime_index: clamp_to_u32(violent, MAX_CRIME_INDEX),
            property_crime_index: clamp_to_u32(property, MAX_CRIME_INDEX),
            recent_incidents: clamp_to_u32(recent, MAX_RECENT_INCIDENTS),
            source,
            total_incidents_analyzed: None,
            data_period_days: None,
        }
    }

    /// Attaches the size of the analyzed sample.
    #[must_use]
    pub const fn with_sample(mut self, total: u64, period_days: Option<u32>) -> Self {
        self.total_incidents_analyzed = Some(total);
        self.data_period_days = period_days;
        self
    }
}

fn clamp_to_u32(value: i64, max: i64) -> u32 {
    u32::try_from(value.clamp(0, max)).unwrap_or_default()
}

/// Category of property being assessed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum PropertyType {
    /// Primary residence.
    #[serde(rename = "home")]
    #[strum(serialize = "home")]
    Home,
    /// Tenant-occupied rental.
    #[serde(rename = "rental")]
    #[strum(serialize = "rental")]
    Rental,
    /// Seasonally occupied vacation home.
    #[serde(rename = "vacation home")]
    #[strum(serialize = "vacation home")]
    VacationHome,
    /// Commercial premises.
    #[serde(rename = "business")]
    #[strum(serialize = "business")]
    Business,
}

impl PropertyType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Home, Self::Rental, Self::VacationHome, Self::Business]
    }
}

/// Base exposure characteristics of a property category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyProfile {
    /// Baseline exposure risk (0-100).
    pub base_exposure: u32,
}

/// Human-readable explanation for each risk dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionSummaries {
    /// Crime risk summary.
    pub crime_risk: String,
    /// Property exposure summary.
    pub property_exposure_risk: String,
    /// Accessibility summary.
    pub accessibility_risk: String,
    /// Neighborhood summary.
    pub neighborhood_risk: String,
    /// Operational summary.
    pub operational_risk: String,
}

/// The five independently scored risk dimensions, each in `0..=100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDimensions {
    /// Risk from local crime levels.
    pub crime_risk: u32,
    /// Risk from the property's own perimeter and usage.
    pub property_exposure_risk: u32,
    /// Ease of unauthorized access.
    pub accessibility_risk: u32,
    /// Risk from surrounding density and facilities.
    pub neighborhood_risk: u32,
    /// Risk from how the property is operated.
    pub operational_risk: u32,
    /// Per-dimension explanations.
    pub summaries: DimensionSummaries,
}

/// How much of the assessment was based on real provider data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Confidence {
    /// Both crime and geolocation data are real.
    Full,
    /// Exactly one of the two sources is simulated.
    Partial,
    /// Both sources are simulated.
    Low,
}

impl Confidence {
    /// Numeric confidence value reported to clients.
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Full => 1.0,
            Self::Partial => 0.7,
            Self::Low => 0.5,
        }
    }
}

impl Serialize for Confidence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

/// Final output of an assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentResult {
    /// Weighted overall score (0-100, two decimals).
    pub overall_score: f64,
    /// Confidence in the underlying data.
    pub confidence: Confidence,
    /// Ordered advisory strings.
    pub recommendations: Vec<String>,
}

/// A validated assessment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInput {
    /// Trimmed, non-empty address.
    pub address: String,
    /// Property category.
    pub property_type: PropertyType,
    /// Whether the property has a perimeter fence.
    pub fenced: bool,
    /// Whether the property has a gated entry.
    pub gated: bool,
    /// Free-form operating hours.
    pub operating_hours: Option<String>,
    /// Free-form user notes.
    pub notes: Option<String>,
}
