//! Ordered crime data fallback chain.
//!
//! City API → coordinate estimation → on-demand geocode → simulation.
//! Provider errors are logged at debug level and skipped. A panic anywhere
//! in the chain is caught and reported as [`CrimeSource::SimulatedError`].

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt as _;
use property_risk_geocoder::GeocodingProvider;
use property_risk_geocoder::classify::is_valid_coordinates;
use property_risk_geocoder::nominatim::NominatimGeocoder;
use property_risk_geocoder::service_registry::{ProviderConfig, enabled_services};
use property_risk_models::{CrimeResult, CrimeSource};
use rand::Rng;

use crate::CrimeStatsProvider;
use crate::city::detect_city;
use crate::city_source::{SocrataCitySource, all_city_sources};
use crate::estimate::{Region, default_regions, estimate_from_coordinates};
use crate::simulated::simulate_crime;

/// Timeout of the single best-effort geocode used when the caller has no
/// coordinates.
pub const FALLBACK_GEOCODE_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolves crime statistics for an address. Never fails.
pub struct CrimeDataResolver {
    providers: Vec<Box<dyn CrimeStatsProvider>>,
    regions: Vec<Region>,
    geocoder: Option<Box<dyn GeocodingProvider>>,
}

impl CrimeDataResolver {
    /// Creates a resolver from explicit parts.
    #[must_use]
    pub fn new(
        providers: Vec<Box<dyn CrimeStatsProvider>>,
        regions: Vec<Region>,
        geocoder: Option<Box<dyn GeocodingProvider>>,
    ) -> Self {
        Self {
            providers,
            regions,
            geocoder,
        }
    }

    /// Builds the resolver from the embedded city sources and region
    /// table. The fallback geocoder is the registry's Nominatim endpoint
    /// with a single attempt and a 5 second timeout.
    #[must_use]
    pub fn from_registry(client: &reqwest::Client) -> Self {
        let providers = all_city_sources()
            .into_iter()
            .map(|definition| {
                Box::new(SocrataCitySource::new(client.clone(), definition))
                    as Box<dyn CrimeStatsProvider>
            })
            .collect();

        let geocoder = enabled_services().into_iter().find_map(|service| {
            matches!(service.provider, ProviderConfig::Nominatim { .. }).then(|| {
                Box::new(NominatimGeocoder::new(
                    client.clone(),
                    service.base_url().to_string(),
                    Vec::new(),
                    FALLBACK_GEOCODE_TIMEOUT,
                )) as Box<dyn GeocodingProvider>
            })
        });

        Self::new(providers, default_regions(), geocoder)
    }

    /// Ids of the configured city providers.
    #[must_use]
    pub fn provider_ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// Resolves crime statistics.
    ///
    /// `city_hint` takes precedence over detecting the city from
    /// `address`. Coordinates are used only when both are present.
    pub async fn resolve<R: Rng + Send + ?Sized>(
        &self,
        address: &str,
        latitude: Option<f64>,
        longitude: Option<f64>,
        city_hint: Option<&str>,
        rng: &mut R,
    ) -> CrimeResult {
        let coordinates = latitude.zip(longitude);
        let chain = AssertUnwindSafe(self.resolve_chain(address, coordinates, city_hint));

        match chain.catch_unwind().await {
            Ok(Some(result)) => result,
            Ok(None) => {
                log::warn!("Using simulated crime data for: {address}");
                simulate_crime(rng)
            }
            Err(_) => {
                log::error!("Crime data lookup panicked for: {address}");
                let mut result = simulate_crime(rng);
                result.source = CrimeSource::SimulatedError;
                result
            }
        }
    }

    async fn resolve_chain(
        &self,
        address: &str,
        coordinates: Option<(f64, f64)>,
        city_hint: Option<&str>,
    ) -> Option<CrimeResult> {
        let hint = city_hint
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_lowercase);
        let city = hint
            .clone()
            .or_else(|| detect_city(address).map(str::to_string));

        if let Some((latitude, longitude)) = coordinates {
            if let Some(city) = &city {
                log::info!("Trying real crime API for: {city}");
                if let Some(result) = self.query_city(city, latitude, longitude).await {
                    return Some(result);
                }
            }

            log::info!("Using coordinate-based estimation");
            return estimate_from_coordinates(&self.regions, latitude, longitude);
        }

        let (latitude, longitude) = self.geocode(address).await?;

        if hint.is_none() {
            if let Some(city) = &city {
                if let Some(result) = self.query_city(city, latitude, longitude).await {
                    return Some(result);
                }
            }
        }

        estimate_from_coordinates(&self.regions, latitude, longitude).map(|mut result| {
            result.source = CrimeSource::CoordinateBased;
            result
        })
    }

    async fn query_city(&self, city: &str, latitude: f64, longitude: f64) -> Option<CrimeResult> {
        let Some(provider) = self.providers.iter().find(|p| p.serves(city)) else {
            log::debug!("No crime API available for {city}");
            return None;
        };

        match provider.fetch_stats(latitude, longitude).await {
            Ok(Some(result)) => {
                log::info!("Got real data from {}", result.source);
                Some(result)
            }
            Ok(None) => {
                log::debug!("{} returned no records", provider.id());
                None
            }
            Err(e) => {
                log::debug!("{} query failed: {e}", provider.id());
                None
            }
        }
    }

    async fn geocode(&self, address: &str) -> Option<(f64, f64)> {
        if address.trim().is_empty() {
            return None;
        }
        let geocoder = self.geocoder.as_ref()?;

        match geocoder.geocode(address).await {
            Ok(Some(found)) if is_valid_coordinates(found.latitude, found.longitude) => {
                log::info!("Geocoded: {}, {}", found.latitude, found.longitude);
                Some((found.latitude, found.longitude))
            }
            Ok(_) => None,
            Err(e) => {
                log::debug!("Geocoding failed: {e}");
                None
            }
        }
    }
}
