//! Coordinate-based crime estimation.
//!
//! Used when no city API answered but coordinates are known. Regions are
//! loaded from `regions.toml` and evaluated top-down; the first region
//! whose bounding box contains the point produces the estimate. Adding a
//! region only needs a new table entry.

use property_risk_models::{CrimeResult, CrimeSource};
use serde::Deserialize;

/// Inclusive latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BoundingBox {
    /// Southern edge.
    pub min_latitude: f64,
    /// Northern edge.
    pub max_latitude: f64,
    /// Western edge.
    pub min_longitude: f64,
    /// Eastern edge.
    pub max_longitude: f64,
}

impl BoundingBox {
    /// Whether the point lies inside (edges included).
    #[must_use]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&latitude)
            && (self.min_longitude..=self.max_longitude).contains(&longitude)
    }
}

/// How a region turns coordinates into crime indices.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EstimateRule {
    /// Constant values.
    Fixed {
        /// Violent crime index.
        violent: i64,
        /// Property crime index.
        property: i64,
        /// Recent incidents.
        recent: i64,
    },
    /// Base values raised by the latitude distance from a reference point.
    ReferenceOffset {
        /// Base violent index.
        violent: i64,
        /// Base property index.
        property: i64,
        /// Base recent incidents.
        recent: i64,
        /// Reference latitude.
        reference_latitude: f64,
        /// Multiplier for the latitude distance.
        scale: f64,
        /// Fraction of the offset applied to the property index.
        property_factor: f64,
        /// Divisor of the offset applied to recent incidents.
        recent_divisor: f64,
        /// Upper bound for recent incidents.
        recent_cap: i64,
    },
    /// Base values raised by the fractional part of each coordinate.
    CoordinateFraction {
        /// Base violent index.
        violent: i64,
        /// Base property index.
        property: i64,
        /// Base recent incidents.
        recent: i64,
        /// Multiplier for the latitude fraction (violent).
        violent_scale: f64,
        /// Multiplier for the longitude fraction (property).
        property_scale: f64,
        /// Multiplier for the latitude fraction (recent).
        recent_scale: f64,
        /// Upper bound for recent incidents.
        recent_cap: i64,
    },
}

/// One entry of the estimation table.
#[derive(Debug, Clone, Deserialize)]
pub struct Region {
    /// Region name, used in the provenance tag.
    pub name: String,
    /// Area covered; `None` matches every point.
    #[serde(default)]
    pub bounds: Option<BoundingBox>,
    /// Scoring rule.
    pub rule: EstimateRule,
}

impl Region {
    /// Whether this region covers the point.
    #[must_use]
    pub fn matches(&self, latitude: f64, longitude: f64) -> bool {
        self.bounds
            .is_none_or(|bounds| bounds.contains(latitude, longitude))
    }

    /// Applies the rule to the point. Values are clamped by
    /// [`CrimeResult::new`].
    #[must_use]
    pub fn estimate(&self, latitude: f64, longitude: f64) -> CrimeResult {
        let (violent, property, recent) = match self.rule {
            EstimateRule::Fixed {
                violent,
                property,
                recent,
            } => (violent, property, recent),
            EstimateRule::ReferenceOffset {
                violent,
                property,
                recent,
                reference_latitude,
                scale,
                property_factor,
                recent_divisor,
                recent_cap,
            } => {
                let offset = (latitude - reference_latitude).abs() * scale;
                (
                    trunc(to_f64(violent) + offset),
                    trunc(to_f64(property) + offset * property_factor),
                    trunc(to_f64(recent) + offset / recent_divisor).min(recent_cap),
                )
            }
            EstimateRule::CoordinateFraction {
                violent,
                property,
                recent,
                violent_scale,
                property_scale,
                recent_scale,
                recent_cap,
            } => {
                let lat_frac = latitude.rem_euclid(1.0);
                let lon_frac = longitude.rem_euclid(1.0);
                (
                    violent + trunc(lat_frac * violent_scale),
                    property + trunc(lon_frac * property_scale),
                    (recent + trunc(lat_frac * recent_scale)).min(recent_cap),
                )
            }
        };

        CrimeResult::new(
            violent,
            property,
            recent,
            CrimeSource::CoordinateEstimation(self.name.clone()),
        )
    }
}

#[allow(clippy::cast_possible_truncation)]
fn trunc(value: f64) -> i64 {
    value.trunc() as i64
}

#[allow(clippy::cast_precision_loss)]
const fn to_f64(value: i64) -> f64 {
    value as f64
}

/// Estimates crime from coordinates using the first matching region.
#[must_use]
pub fn estimate_from_coordinates(
    regions: &[Region],
    latitude: f64,
    longitude: f64,
) -> Option<CrimeResult> {
    let region = regions.iter().find(|r| r.matches(latitude, longitude))?;
    let result = region.estimate(latitude, longitude);
    log::info!(
        "Coordinate estimate for region {}: {} violent, {} property",
        region.name,
        result.violent_crime_index,
        result.property_crime_index
    );
    Some(result)
}

#[derive(Deserialize)]
struct RegionTable {
    region: Vec<Region>,
}

const REGIONS_TOML: &str = include_str!("../regions.toml");

/// Returns the embedded region table, in evaluation order.
///
/// # Panics
///
/// Panics if `regions.toml` is malformed (this is a compile-time guarantee
/// since the table is embedded).
#[must_use]
pub fn default_regions() -> Vec<Region> {
    toml::de::from_str::<RegionTable>(REGIONS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse estimation regions: {e}"))
        .region
}
