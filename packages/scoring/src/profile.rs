//! Property profile lookup.

use property_risk_models::{PropertyProfile, PropertyType};

/// Base exposure for each property category.
#[must_use]
pub const fn property_profile(property_type: PropertyType) -> PropertyProfile {
    let base_exposure = match property_type {
        PropertyType::Home => 25,
        PropertyType::Rental => 35,
        PropertyType::VacationHome => 45,
        PropertyType::Business => 50,
    };
    PropertyProfile { base_exposure }
}
