//! Synthetic geolocation used when no provider can resolve an address.

use property_risk_models::{GeoResult, GeoSource, NeighborhoodType};
use rand::Rng;

/// Generates a plausible US location with a random neighborhood type.
///
/// Coordinates are always present so that downstream crime estimation
/// and map display keep working.
pub fn simulate_geo<R: Rng + ?Sized>(rng: &mut R) -> GeoResult {
    let all = NeighborhoodType::all();
    let neighborhood = all[rng.gen_range(0..all.len())];

    let (latitude, longitude) = match neighborhood {
        NeighborhoodType::Urban => (rng.gen_range(40.0..41.0), rng.gen_range(-74.0..-73.0)),
        NeighborhoodType::Suburban => (rng.gen_range(38.0..42.0), rng.gen_range(-75.0..-70.0)),
        NeighborhoodType::Rural => (rng.gen_range(35.0..45.0), rng.gen_range(-85.0..-70.0)),
    };

    GeoResult::new(
        latitude,
        longitude,
        neighborhood,
        format!("Simulated {neighborhood} location"),
        GeoSource::Simulated,
    )
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn simulated_locations_stay_in_their_boxes() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let geo = simulate_geo(&mut rng);
            assert_eq!(geo.source, GeoSource::Simulated);
            assert_eq!(
                geo.population_density,
                geo.neighborhood_type.population_density()
            );
            let (lat, lon) = match geo.neighborhood_type {
                NeighborhoodType::Urban => (40.0..41.0, -74.0..-73.0),
                NeighborhoodType::Suburban => (38.0..42.0, -75.0..-70.0),
                NeighborhoodType::Rural => (35.0..45.0, -85.0..-70.0),
            };
            assert!(lat.contains(&geo.latitude));
            assert!(lon.contains(&geo.longitude));
            assert_eq!(
                geo.formatted_address,
                format!("Simulated {} location", geo.neighborhood_type)
            );
        }
    }

    #[test]
    fn same_seed_same_location() {
        let a = simulate_geo(&mut StdRng::seed_from_u64(7));
        let b = simulate_geo(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }
}
