#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! End-to-end property risk assessment.
//!
//! [`RiskAssessor::assess`] runs one request through every stage:
//!
//! 1. Geolocation (never fails, may be simulated).
//! 2. Crime data, using the geolocated coordinates and the city detected
//!    from the formatted address (never fails, may be simulated).
//! 3. Property profile lookup.
//! 4. Dimension scoring and aggregation. A panic in either stage fails
//!    the assessment with an [`AssessError`] naming the stage.
//! 5. Recommendations. A panic here is logged and replaced by a single
//!    fallback advisory.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use property_risk_crime::city::detect_city;
use property_risk_crime::resolver::CrimeDataResolver;
use property_risk_geocoder::classify::is_valid_coordinates;
use property_risk_geocoder::resolver::GeolocationResolver;
use property_risk_geocoder::{GeocodeError, GeocoderConfig};
use property_risk_models::{
    AssessmentResult, CrimeResult, GeoResult, PropertyInput, RiskDimensions,
};
use property_risk_scoring::aggregate::compute_overall_score;
use property_risk_scoring::dimensions::{ScoringInputs, compute_risk_dimensions};
use property_risk_scoring::profile::property_profile;
use property_risk_scoring::recommendations::{FALLBACK_RECOMMENDATION, generate_recommendations};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng as _};
use thiserror::Error;

/// Errors that fail an assessment.
#[derive(Debug, Error)]
pub enum AssessError {
    /// The shared HTTP client could not be built.
    #[error("HTTP client setup failed: {0}")]
    Client(#[from] GeocodeError),

    /// Dimension scoring failed unexpectedly.
    #[error("Error computing risk scores: {message}")]
    Scoring {
        /// Panic message.
        message: String,
    },

    /// Score aggregation failed unexpectedly.
    #[error("Error computing overall score: {message}")]
    Aggregation {
        /// Panic message.
        message: String,
    },
}

/// Everything produced for one request.
#[derive(Debug, Clone)]
pub struct Assessment {
    /// Geolocation used for scoring.
    pub geo: GeoResult,
    /// Crime statistics used for scoring.
    pub crime: CrimeResult,
    /// Per-dimension scores and summaries.
    pub dimensions: RiskDimensions,
    /// Overall score, confidence and recommendations.
    pub result: AssessmentResult,
}

impl Assessment {
    /// Coordinates for map display, when they are valid.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        is_valid_coordinates(self.geo.latitude, self.geo.longitude)
            .then_some((self.geo.latitude, self.geo.longitude))
    }
}

/// Runs assessments against a fixed pair of resolvers.
pub struct RiskAssessor {
    geolocation: GeolocationResolver,
    crime: CrimeDataResolver,
}

impl RiskAssessor {
    #[must_use]
    pub const fn new(geolocation: GeolocationResolver, crime: CrimeDataResolver) -> Self {
        Self { geolocation, crime }
    }

    /// Builds both resolvers from the embedded registries, sharing one
    /// HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`AssessError::Client`] if the HTTP client cannot be built.
    pub fn from_config(config: &GeocoderConfig) -> Result<Self, AssessError> {
        let client = config.http_client()?;
        Ok(Self::with_client(&client, config))
    }

    /// Builds both resolvers from the embedded registries on an existing
    /// client.
    #[must_use]
    pub fn with_client(client: &reqwest::Client, config: &GeocoderConfig) -> Self {
        Self::new(
            GeolocationResolver::from_registry(client, config),
            CrimeDataResolver::from_registry(client),
        )
    }

    /// Assesses a property, seeding simulation from OS entropy.
    ///
    /// # Errors
    ///
    /// Returns [`AssessError`] if scoring or aggregation fails.
    pub async fn assess(&self, input: &PropertyInput) -> Result<Assessment, AssessError> {
        let mut rng = StdRng::from_entropy();
        self.assess_with_rng(input, &mut rng).await
    }

    /// Assesses a property with an explicit random source.
    ///
    /// # Errors
    ///
    /// Returns [`AssessError`] if scoring or aggregation fails.
    pub async fn assess_with_rng<R: Rng + Send + ?Sized>(
        &self,
        input: &PropertyInput,
        rng: &mut R,
    ) -> Result<Assessment, AssessError> {
        log::info!("Assessing risk for: {}", input.address);

        let geo = self.geolocation.resolve(&input.address, rng).await;
        let city = detect_city(&geo.formatted_address);
        let crime = self
            .crime
            .resolve(
                &input.address,
                Some(geo.latitude),
                Some(geo.longitude),
                city,
                rng,
            )
            .await;
        let profile = property_profile(input.property_type);

        let inputs = ScoringInputs {
            crime: &crime,
            geo: &geo,
            profile,
            property_type: input.property_type,
            fenced: input.fenced,
            gated: input.gated,
            operating_hours: input.operating_hours.as_deref(),
            notes: input.notes.as_deref(),
        };

        let dimensions = guard(
            || compute_risk_dimensions(&inputs),
            |message| AssessError::Scoring { message },
        )?;
        let (overall_score, confidence) = guard(
            || compute_overall_score(&dimensions, &crime.source, geo.source),
            |message| AssessError::Aggregation { message },
        )?;
        let recommendations = or_fallback(|| generate_recommendations(overall_score));

        log::info!(
            "Assessment complete - Score: {overall_score}, Confidence: {}, Sources: {} / {}",
            confidence.value(),
            crime.source,
            geo.source
        );

        Ok(Assessment {
            geo,
            crime,
            dimensions,
            result: AssessmentResult {
                overall_score,
                confidence,
                recommendations,
            },
        })
    }
}

/// Runs a core stage, turning a panic into an error.
fn guard<T>(
    stage: impl FnOnce() -> T,
    error: impl FnOnce(String) -> AssessError,
) -> Result<T, AssessError> {
    catch_unwind(AssertUnwindSafe(stage)).map_err(|payload| {
        let err = error(panic_message(payload.as_ref()));
        log::error!("{err}");
        err
    })
}

/// Runs recommendation generation, substituting the fallback advisory on
/// panic.
fn or_fallback(generate: impl FnOnce() -> Vec<String>) -> Vec<String> {
    catch_unwind(AssertUnwindSafe(generate)).unwrap_or_else(|payload| {
        log::warn!(
            "Recommendation generation failed: {}",
            panic_message(payload.as_ref())
        );
        vec![FALLBACK_RECOMMENDATION.to_string()]
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use property_risk_crime::estimate::default_regions;
    use property_risk_crime::{CrimeDataError, CrimeStatsProvider};
    use property_risk_geocoder::{GeocodedAddress, GeocodingProvider};
    use property_risk_models::{Confidence, CrimeSource, GeoSource, PropertyType};

    use super::*;

    struct FixedGeocoder;

    #[async_trait]
    impl GeocodingProvider for FixedGeocoder {
        fn source(&self) -> GeoSource {
            GeoSource::Photon
        }

        async fn geocode(&self, _address: &str) -> Result<Option<GeocodedAddress>, GeocodeError> {
            Ok(Some(GeocodedAddress {
                latitude: 41.8781,
                longitude: -87.6298,
                formatted_address: Some("Willis Tower, Chicago, United States".to_string()),
                source: GeoSource::Photon,
            }))
        }
    }

    struct FixedCity;

    #[async_trait]
    impl CrimeStatsProvider for FixedCity {
        fn id(&self) -> &str {
            "chicago_api_realtime"
        }

        fn serves(&self, city: &str) -> bool {
            city.contains("chicago")
        }

        async fn fetch_stats(
            &self,
            _latitude: f64,
            _longitude: f64,
        ) -> Result<Option<CrimeResult>, CrimeDataError> {
            Ok(Some(CrimeResult::new(
                50,
                40,
                10,
                CrimeSource::CityApi(self.id().to_string()),
            )))
        }
    }

    fn input(address: &str) -> PropertyInput {
        PropertyInput {
            address: address.to_string(),
            property_type: PropertyType::Business,
            fenced: true,
            gated: false,
            operating_hours: Some("24/7".to_string()),
            notes: None,
        }
    }

    fn offline() -> RiskAssessor {
        RiskAssessor::new(
            GeolocationResolver::new(Vec::new()),
            CrimeDataResolver::new(Vec::new(), default_regions(), None),
        )
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(9)
    }

    #[tokio::test]
    async fn real_sources_give_full_confidence() {
        let assessor = RiskAssessor::new(
            GeolocationResolver::new(vec![Box::new(FixedGeocoder)]),
            CrimeDataResolver::new(vec![Box::new(FixedCity)], default_regions(), None),
        );

        let assessment = assessor
            .assess_with_rng(&input("233 S Wacker Dr"), &mut rng())
            .await
            .unwrap();

        assert_eq!(assessment.geo.source, GeoSource::Photon);
        assert_eq!(assessment.crime.source.to_string(), "chicago_api_realtime");
        assert_eq!(assessment.dimensions.crime_risk, 72);
        assert_eq!(assessment.result.confidence, Confidence::Full);
        assert_eq!(assessment.coordinates(), Some((41.8781, -87.6298)));

        // 72×0.35 + 55×0.25 + 55×0.15 + 100×0.15 + 50×0.10
        assert!((assessment.result.overall_score - 67.2).abs() < 1e-9);
        assert_eq!(assessment.result.recommendations.len(), 3);
    }

    #[tokio::test]
    async fn offline_assessment_estimates_crime_from_simulated_location() {
        let assessment = offline()
            .assess_with_rng(&input("1 Nowhere Lane"), &mut rng())
            .await
            .unwrap();

        assert_eq!(assessment.geo.source, GeoSource::SimulatedFallback);
        assert_eq!(assessment.geo.formatted_address, "1 Nowhere Lane");
        assert!(
            assessment
                .crime
                .source
                .to_string()
                .starts_with("coordinate_estimation_")
        );
        assert_eq!(assessment.result.confidence, Confidence::Partial);
    }

    #[tokio::test]
    async fn scores_stay_in_range() {
        let assessor = offline();
        let mut rng = rng();
        for property_type in PropertyType::all() {
            for (fenced, gated) in [(false, false), (true, false), (true, true)] {
                let input = PropertyInput {
                    property_type: *property_type,
                    fenced,
                    gated,
                    notes: Some("Theft last week".to_string()),
                    ..input("99 Random Rd")
                };
                let assessment = assessor.assess_with_rng(&input, &mut rng).await.unwrap();
                let dims = &assessment.dimensions;
                for value in [
                    dims.crime_risk,
                    dims.property_exposure_risk,
                    dims.accessibility_risk,
                    dims.neighborhood_risk,
                    dims.operational_risk,
                ] {
                    assert!(value <= 100);
                }
                assert!((0.0..=100.0).contains(&assessment.result.overall_score));
                assert!(!assessment.result.recommendations.is_empty());
            }
        }
    }

    #[test]
    fn core_stage_panic_names_the_stage() {
        let err = guard(
            || -> u32 { panic!("division by zero") },
            |message| AssessError::Aggregation { message },
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error computing overall score: division by zero"
        );
    }

    #[test]
    fn recommendation_panic_uses_fallback() {
        let recommendations = or_fallback(|| panic!("boom"));
        assert_eq!(recommendations, [FALLBACK_RECOMMENDATION]);
    }

    #[test]
    fn formatted_panic_messages_are_kept() {
        let err = guard(
            || -> u32 { panic!("bad value {}", 7) },
            |message| AssessError::Scoring { message },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Error computing risk scores: bad value 7");
    }
}
