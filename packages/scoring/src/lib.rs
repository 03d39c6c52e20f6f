#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Deterministic scoring stages of a property risk assessment.
//!
//! Everything here is a pure function of its inputs:
//!
//! - [`profile`] maps a property category to its base exposure.
//! - [`dimensions`] folds crime, geolocation and property inputs into
//!   five clamped risk dimensions with summaries.
//! - [`aggregate`] combines the dimensions into an overall score and
//!   derives a confidence level from data provenance.
//! - [`recommendations`] turns the overall score into advisories.

pub mod aggregate;
pub mod dimensions;
pub mod profile;
pub mod recommendations;

/// Clamps a raw dimension value to `0..=100` and rounds it half to even.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_score(raw: f64) -> u32 {
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0).round_ties_even() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_to_even() {
        assert_eq!(to_score(72.5), 72);
        assert_eq!(to_score(73.5), 74);
        assert_eq!(to_score(41.4), 41);
    }

    #[test]
    fn clamps_out_of_range() {
        assert_eq!(to_score(-12.0), 0);
        assert_eq!(to_score(250.0), 100);
        assert_eq!(to_score(f64::NAN), 0);
    }
}
