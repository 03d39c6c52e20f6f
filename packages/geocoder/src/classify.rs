//! Coordinate heuristics shared by every provider path.
//!
//! Providers only return raw coordinates; the neighborhood type (and from
//! it the density and nearby-risk tags) is inferred here.

use property_risk_models::NeighborhoodType;

/// Guesses the neighborhood type from raw coordinates.
///
/// Major US metros sit above latitude 40 or east of longitude -75, so
/// those are treated as urban; a wider band around them as suburban.
#[must_use]
pub fn classify_neighborhood(latitude: f64, longitude: f64) -> NeighborhoodType {
    if latitude.abs() > 40.0 || longitude.abs() < 75.0 {
        NeighborhoodType::Urban
    } else if latitude.abs() > 35.0 || longitude.abs() < 80.0 {
        NeighborhoodType::Suburban
    } else {
        NeighborhoodType::Rural
    }
}

/// Whether the coordinates are finite and inside legal WGS84 bounds.
#[must_use]
pub fn is_valid_coordinates(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && latitude.abs() <= 90.0
        && longitude.abs() <= 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn northern_latitudes_are_urban() {
        assert_eq!(classify_neighborhood(41.88, -87.63), NeighborhoodType::Urban);
    }

    #[test]
    fn eastern_longitudes_are_urban() {
        assert_eq!(classify_neighborhood(25.76, -74.5), NeighborhoodType::Urban);
    }

    #[test]
    fn middle_band_is_suburban() {
        assert_eq!(classify_neighborhood(36.16, -86.78), NeighborhoodType::Suburban);
        assert_eq!(classify_neighborhood(30.0, -78.0), NeighborhoodType::Suburban);
    }

    #[test]
    fn southwest_is_rural() {
        assert_eq!(classify_neighborhood(29.42, -98.49), NeighborhoodType::Rural);
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(is_valid_coordinates(90.0, -180.0));
        assert!(!is_valid_coordinates(90.5, 0.0));
        assert!(!is_valid_coordinates(0.0, 181.0));
        assert!(!is_valid_coordinates(f64::NAN, 0.0));
    }
}
