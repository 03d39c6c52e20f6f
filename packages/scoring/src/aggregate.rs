//! Weighted aggregation of the risk dimensions.

use property_risk_models::{Confidence, CrimeSource, GeoSource, RiskDimensions};

/// Dimension weights, in declaration order of [`RiskDimensions`].
pub const WEIGHTS: [f64; 5] = [0.35, 0.25, 0.15, 0.15, 0.10];

/// Weighted overall score, rounded to two decimals and clamped to
/// `0.0..=100.0`.
#[must_use]
pub fn overall_score(dimensions: &RiskDimensions) -> f64 {
    let values = [
        dimensions.crime_risk,
        dimensions.property_exposure_risk,
        dimensions.accessibility_risk,
        dimensions.neighborhood_risk,
        dimensions.operational_risk,
    ];
    let weighted: f64 = values
        .iter()
        .zip(WEIGHTS)
        .map(|(value, weight)| f64::from(*value) * weight)
        .sum();

    ((weighted * 100.0).round() / 100.0).clamp(0.0, 100.0)
}

/// Confidence from data provenance. Symmetric in the two sources.
#[must_use]
pub const fn confidence(crime_source: &CrimeSource, geo_source: GeoSource) -> Confidence {
    match (crime_source.is_simulated(), geo_source.is_simulated()) {
        (false, false) => Confidence::Full,
        (true, true) => Confidence::Low,
        _ => Confidence::Partial,
    }
}

/// Overall score together with its confidence.
#[must_use]
pub fn compute_overall_score(
    dimensions: &RiskDimensions,
    crime_source: &CrimeSource,
    geo_source: GeoSource,
) -> (f64, Confidence) {
    (
        overall_score(dimensions),
        confidence(crime_source, geo_source),
    )
}

#[cfg(test)]
mod tests {
    use property_risk_models::DimensionSummaries;

    use super::*;

    fn dimensions(values: [u32; 5]) -> RiskDimensions {
        RiskDimensions {
            crime_risk: values[0],
            property_exposure_risk: values[1],
            accessibility_risk: values[2],
            neighborhood_risk: values[3],
            operational_risk: values[4],
            summaries: DimensionSummaries {
                crime_risk: String::new(),
                property_exposure_risk: String::new(),
                accessibility_risk: String::new(),
                neighborhood_risk: String::new(),
                operational_risk: String::new(),
            },
        }
    }

    #[test]
    fn weighted_sum() {
        let (score, confidence) = compute_overall_score(
            &dimensions([50, 40, 30, 20, 10]),
            &CrimeSource::CityApi("nypd_api".to_string()),
            GeoSource::Nominatim,
        );
        assert!((score - 36.0).abs() < f64::EPSILON);
        assert_eq!(confidence, Confidence::Full);
    }

    #[test]
    fn rounds_to_two_decimals() {
        // 33×0.35 + 17×0.25 + 51×0.15 + 7×0.15 + 3×0.10 = 11.55 + 4.25 + 7.65 + 1.05 + 0.3
        let score = overall_score(&dimensions([33, 17, 51, 7, 3]));
        assert!((score - 24.8).abs() < 1e-9);

        let score = overall_score(&dimensions([1, 0, 0, 0, 0]));
        assert!((score - 0.35).abs() < 1e-9);
    }

    #[test]
    fn bounds() {
        assert!(overall_score(&dimensions([0; 5])).abs() < f64::EPSILON);
        assert!((overall_score(&dimensions([100; 5])) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn confidence_is_symmetric() {
        let real_crime = CrimeSource::CoordinateEstimation("urban".to_string());

        assert_eq!(
            confidence(&CrimeSource::Simulated, GeoSource::GoogleMaps),
            Confidence::Partial
        );
        assert_eq!(
            confidence(&real_crime, GeoSource::SimulatedFallback),
            Confidence::Partial
        );
        assert_eq!(
            confidence(&CrimeSource::SimulatedError, GeoSource::SimulatedEmptyAddress),
            Confidence::Low
        );
        assert_eq!(
            confidence(&CrimeSource::CoordinateBased, GeoSource::Photon),
            Confidence::Full
        );
    }

    #[test]
    fn confidence_values() {
        assert!((Confidence::Full.value() - 1.0).abs() < f64::EPSILON);
        assert!((Confidence::Partial.value() - 0.7).abs() < f64::EPSILON);
        assert!((Confidence::Low.value() - 0.5).abs() < f64::EPSILON);
    }
}
