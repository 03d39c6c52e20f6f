//! Tiered security recommendations.

const ADVANCED: &[&str] = &[
    "Install advanced CCTV with remote monitoring",
    "Deploy regular security patrols",
    "Add smart perimeter lighting",
    "Upgrade fences and gates",
    "Enable controlled access systems",
];

const ENHANCED: &[&str] = &[
    "Install 1080p CCTV cameras",
    "Enable motion-activated lighting",
    "Improve fencing and gate systems",
];

const STANDARD: &[&str] = &[
    "Install basic CCTV",
    "Improve door/window locks",
    "Trim shrubs to increase visibility",
];

const BASIC: &[&str] = &["Basic home security recommended"];

/// Advisory used when generation fails.
pub const FALLBACK_RECOMMENDATION: &str = "Unable to generate recommendations";

/// Recommendations for an overall score. Tier boundaries are exclusive:
/// a score of exactly 75 stays in the lower tier.
#[must_use]
pub fn generate_recommendations(score: f64) -> Vec<String> {
    let tier = if score > 75.0 {
        ADVANCED
    } else if score > 60.0 {
        ENHANCED
    } else if score > 40.0 {
        STANDARD
    } else {
        BASIC
    };
    tier.iter().map(|r| (*r).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers() {
        assert_eq!(generate_recommendations(90.0).len(), 5);
        assert_eq!(generate_recommendations(61.0).len(), 3);
        assert_eq!(generate_recommendations(61.0)[0], "Install 1080p CCTV cameras");
        assert_eq!(generate_recommendations(41.0)[0], "Install basic CCTV");
        assert_eq!(
            generate_recommendations(12.5),
            ["Basic home security recommended"]
        );
    }

    #[test]
    fn boundaries_are_exclusive() {
        assert_eq!(generate_recommendations(75.0), ENHANCED);
        assert_eq!(generate_recommendations(75.01), ADVANCED);
        assert_eq!(generate_recommendations(60.0), STANDARD);
        assert_eq!(generate_recommendations(40.0), BASIC);
    }

    #[test]
    fn never_empty() {
        for score in [0.0, 40.0, 40.01, 60.0, 60.01, 75.0, 75.01, 100.0] {
            assert!(!generate_recommendations(score).is_empty());
        }
    }
}
