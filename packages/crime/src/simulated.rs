//! Synthetic crime statistics, the last step of the resolver chain.

use property_risk_models::{CrimeResult, CrimeSource};
use rand::Rng;

/// Generates plausible crime statistics with source
/// [`CrimeSource::Simulated`].
pub fn simulate_crime<R: Rng + ?Sized>(rng: &mut R) -> CrimeResult {
    CrimeResult::new(
        rng.gen_range(20..=80),
        rng.gen_range(15..=70),
        rng.gen_range(0..=10),
        CrimeSource::Simulated,
    )
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn simulated_values_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let crime = simulate_crime(&mut rng);
            assert!((20..=80).contains(&crime.violent_crime_index));
            assert!((15..=70).contains(&crime.property_crime_index));
            assert!(crime.recent_incidents <= 10);
            assert_eq!(crime.source, CrimeSource::Simulated);
            assert!(crime.total_incidents_analyzed.is_none());
        }
    }
}
