//! Ordered geocoding fallback chain.
//!
//! [`GeolocationResolver`] walks its providers in priority order and
//! returns the first valid match, enriched with the neighborhood
//! heuristic. Provider errors are logged and skipped; when every provider
//! misses, a simulated location is returned instead.

use std::panic::AssertUnwindSafe;

use futures::FutureExt as _;
use property_risk_models::{GeoResult, GeoSource};
use rand::Rng;

use crate::classify::{classify_neighborhood, is_valid_coordinates};
use crate::google::GoogleMapsGeocoder;
use crate::nominatim::NominatimGeocoder;
use crate::photon::PhotonGeocoder;
use crate::service_registry::{GeocodingService, ProviderConfig, enabled_services};
use crate::simulated::simulate_geo;
use crate::{GeocodedAddress, GeocoderConfig, GeocodingProvider};

/// Resolves addresses to [`GeoResult`]s through an ordered provider list.
pub struct GeolocationResolver {
    providers: Vec<Box<dyn GeocodingProvider>>,
}

impl GeolocationResolver {
    /// Creates a resolver over an explicit provider list (tried in order).
    #[must_use]
    pub fn new(providers: Vec<Box<dyn GeocodingProvider>>) -> Self {
        Self { providers }
    }

    /// Builds the provider chain from the embedded service registry.
    #[must_use]
    pub fn from_registry(client: &reqwest::Client, config: &GeocoderConfig) -> Self {
        Self::from_services(client, &enabled_services(), config)
    }

    /// Builds the provider chain from the given service definitions,
    /// skipping Google Maps when no API key is configured.
    #[must_use]
    pub fn from_services(
        client: &reqwest::Client,
        services: &[GeocodingService],
        config: &GeocoderConfig,
    ) -> Self {
        let providers = services
            .iter()
            .filter_map(|service| build_provider(client, service, config))
            .collect();
        Self::new(providers)
    }

    /// Provenance tags of the configured providers, in chain order.
    #[must_use]
    pub fn provider_sources(&self) -> Vec<GeoSource> {
        self.providers.iter().map(|p| p.source()).collect()
    }

    /// Resolves an address. Never fails.
    ///
    /// Blank addresses skip the providers entirely and are simulated with
    /// [`GeoSource::SimulatedEmptyAddress`]. When every provider misses,
    /// the result is simulated with [`GeoSource::SimulatedFallback`], as
    /// it is when a provider panics. In every simulated case
    /// `formatted_address` is the caller's input.
    pub async fn resolve<R: Rng + Send + ?Sized>(&self, address: &str, rng: &mut R) -> GeoResult {
        if address.trim().is_empty() {
            log::warn!("Empty address provided, using simulated data");
            return simulated(address, GeoSource::SimulatedEmptyAddress, rng);
        }

        log::info!("Geocoding address: {address}");

        match AssertUnwindSafe(self.try_providers(address))
            .catch_unwind()
            .await
        {
            Ok(Some(found)) => return found,
            Ok(None) => {}
            Err(_) => log::error!("Geocoding panicked for: {address}"),
        }

        log::warn!("All geocoding methods failed for: {address}, using simulated data");
        simulated(address, GeoSource::SimulatedFallback, rng)
    }

    /// Tries each provider in order, returning the first valid match.
    pub async fn try_providers(&self, address: &str) -> Option<GeoResult> {
        for provider in &self.providers {
            let source = provider.source();
            match provider.geocode(address).await {
                Ok(Some(found)) if is_valid_coordinates(found.latitude, found.longitude) => {
                    log::info!(
                        "{source} geocoded: {}, {} - {}",
                        found.latitude,
                        found.longitude,
                        found.formatted_address.as_deref().unwrap_or(address)
                    );
                    return Some(enrich(found, address));
                }
                Ok(Some(found)) => log::warn!(
                    "{source} returned invalid coordinates: {}, {}",
                    found.latitude,
                    found.longitude
                ),
                Ok(None) => log::debug!("{source} found no match for '{address}'"),
                Err(e) => log::debug!("{source} geocoding error: {e}"),
            }
        }
        None
    }
}

fn build_provider(
    client: &reqwest::Client,
    service: &GeocodingService,
    config: &GeocoderConfig,
) -> Option<Box<dyn GeocodingProvider>> {
    let base_url = service.base_url().to_string();
    let timeout = service.timeout();

    match &service.provider {
        ProviderConfig::GoogleMaps { .. } => {
            let Some(api_key) = config.google_maps_api_key.clone() else {
                log::debug!("No Google Maps API key configured, skipping {}", service.id);
                return None;
            };
            Some(Box::new(GoogleMapsGeocoder::new(
                client.clone(),
                base_url,
                api_key,
                timeout,
            )))
        }
        ProviderConfig::Nominatim {
            address_suffixes, ..
        } => Some(Box::new(NominatimGeocoder::new(
            client.clone(),
            base_url,
            address_suffixes.clone(),
            timeout,
        ))),
        ProviderConfig::Photon { .. } => Some(Box::new(PhotonGeocoder::new(
            client.clone(),
            base_url,
            timeout,
        ))),
    }
}

fn enrich(found: GeocodedAddress, address: &str) -> GeoResult {
    GeoResult::new(
        found.latitude,
        found.longitude,
        classify_neighborhood(found.latitude, found.longitude),
        found
            .formatted_address
            .unwrap_or_else(|| address.to_string()),
        found.source,
    )
}

fn simulated<R: Rng + ?Sized>(address: &str, source: GeoSource, rng: &mut R) -> GeoResult {
    let mut result = simulate_geo(rng);
    result.source = source;
    result.formatted_address = address.to_string();
    result
}
