//! The five risk dimensions.
//!
//! Each dimension is computed as a raw `f64`, clamped to `0..=100` and
//! rounded half to even. Summaries are generated from the same inputs.

use std::collections::BTreeSet;

use property_risk_models::{
    CrimeResult, DimensionSummaries, GeoResult, NeighborhoodType, PropertyProfile, PropertyType,
    RiskDimensions,
};

use crate::to_score;

/// Everything the dimension scorer looks at.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInputs<'a> {
    /// Crime statistics for the area.
    pub crime: &'a CrimeResult,
    /// Geolocation of the property.
    pub geo: &'a GeoResult,
    /// Base exposure of the property category.
    pub profile: PropertyProfile,
    /// Property category.
    pub property_type: PropertyType,
    /// Whether the property has a perimeter fence.
    pub fenced: bool,
    /// Whether the property has a gated entry.
    pub gated: bool,
    /// Free-form operating hours, e.g. `"24/7"`.
    pub operating_hours: Option<&'a str>,
    /// Free-form user notes.
    pub notes: Option<&'a str>,
}

/// Computes all five dimensions and their summaries.
#[must_use]
pub fn compute_risk_dimensions(inputs: &ScoringInputs<'_>) -> RiskDimensions {
    let crime = inputs.crime;
    let geo = inputs.geo;

    let crime_raw = crime_risk(
        crime.violent_crime_index,
        crime.property_crime_index,
        crime.recent_incidents,
    );
    let exposure_raw = property_exposure_risk(
        inputs.profile.base_exposure,
        inputs.property_type,
        inputs.fenced,
        inputs.gated,
    );
    let accessibility_raw =
        accessibility_risk(geo.neighborhood_type, inputs.property_type, inputs.fenced);
    let neighborhood_raw = neighborhood_risk(geo.population_density, &geo.nearby_risks);
    let operational_raw =
        operational_risk(inputs.property_type, inputs.operating_hours, inputs.notes);

    let summaries = DimensionSummaries {
        crime_risk: crime_summary(
            crime_raw,
            crime.violent_crime_index,
            crime.property_crime_index,
            crime.recent_incidents,
        ),
        property_exposure_risk: exposure_summary(
            inputs.property_type,
            inputs.fenced,
            inputs.gated,
        ),
        accessibility_risk: accessibility_summary(
            geo.neighborhood_type,
            inputs.property_type,
            inputs.fenced,
        ),
        neighborhood_risk: neighborhood_summary(geo.population_density, &geo.nearby_risks),
        operational_risk: operational_summary(
            inputs.property_type,
            inputs.operating_hours,
            inputs.notes,
        ),
    };

    let dimensions = RiskDimensions {
        crime_risk: to_score(crime_raw),
        property_exposure_risk: to_score(exposure_raw),
        accessibility_risk: to_score(accessibility_raw),
        neighborhood_risk: to_score(neighborhood_raw),
        operational_risk: to_score(operational_raw),
        summaries,
    };

    log::debug!(
        "Risk dimensions: crime={} exposure={} accessibility={} neighborhood={} operational={}",
        dimensions.crime_risk,
        dimensions.property_exposure_risk,
        dimensions.accessibility_risk,
        dimensions.neighborhood_risk,
        dimensions.operational_risk
    );

    dimensions
}

/// Recent incidents weigh heaviest. Capped at 100.
#[must_use]
pub fn crime_risk(violent: u32, property: u32, recent: u32) -> f64 {
    (f64::from(violent) * 0.6 + f64::from(property) * 0.3 + f64::from(recent) * 3.0).min(100.0)
}

/// Base exposure adjusted for perimeter features and property type.
#[must_use]
pub fn property_exposure_risk(
    base_exposure: u32,
    property_type: PropertyType,
    fenced: bool,
    gated: bool,
) -> f64 {
    let mut exposure = f64::from(base_exposure);
    exposure += perimeter_adjustment(fenced);
    exposure += perimeter_adjustment(gated);
    exposure += match property_type {
        PropertyType::VacationHome => 15.0,
        PropertyType::Home => -5.0,
        PropertyType::Rental | PropertyType::Business => 0.0,
    };
    exposure
}

/// Urban sites start higher; fencing lowers access, unfenced raises it.
#[must_use]
pub fn accessibility_risk(
    neighborhood: NeighborhoodType,
    property_type: PropertyType,
    fenced: bool,
) -> f64 {
    let mut risk = if neighborhood == NeighborhoodType::Urban {
        60.0
    } else {
        40.0
    };
    risk += perimeter_adjustment(fenced);
    risk += match property_type {
        PropertyType::VacationHome => 12.0,
        PropertyType::Home => -3.0,
        PropertyType::Rental | PropertyType::Business => 0.0,
    };
    risk
}

/// Density per hundred residents plus a penalty per nearby facility.
/// Tags are matched case-insensitively.
#[must_use]
pub fn neighborhood_risk(population_density: u32, nearby_risks: &BTreeSet<String>) -> f64 {
    let tags = lowercase_tags(nearby_risks);
    let mut risk = f64::from(population_density) / 100.0;
    if tags.contains("nightclub") {
        risk += 20.0;
    }
    if tags.contains("warehouse") {
        risk += 15.0;
    }
    if tags.contains("school") {
        risk += 5.0;
    }
    risk
}

/// Occupancy pattern plus 24-hour operation and reported theft.
#[must_use]
pub fn operational_risk(
    property_type: PropertyType,
    operating_hours: Option<&str>,
    notes: Option<&str>,
) -> f64 {
    let mut risk = 20.0;
    risk += match property_type {
        // Extended unoccupied periods, predictable absence.
        PropertyType::VacationHome => 25.0 + 10.0,
        PropertyType::Home => -5.0,
        PropertyType::Rental | PropertyType::Business => 0.0,
    };
    if runs_around_the_clock(operating_hours) {
        risk += 30.0;
    }
    if mentions_theft(notes) {
        risk += 20.0;
    }
    risk
}

const fn perimeter_adjustment(present: bool) -> f64 {
    if present { -5.0 } else { 10.0 }
}

fn runs_around_the_clock(operating_hours: Option<&str>) -> bool {
    operating_hours.is_some_and(|h| h.contains("24"))
}

fn mentions_theft(notes: Option<&str>) -> bool {
    notes.is_some_and(|n| n.to_lowercase().contains("theft"))
}

fn lowercase_tags(tags: &BTreeSet<String>) -> BTreeSet<String> {
    tags.iter().map(|t| t.to_lowercase()).collect()
}

// ── Summaries ────────────────────────────────────────────────────────────

fn crime_summary(score: f64, violent: u32, property: u32, recent: u32) -> String {
    if score >= 70.0 {
        format!(
            "High crime area with {violent} violent and {property} property crime indices. \
             {recent} recent incidents reported."
        )
    } else if score >= 40.0 {
        format!(
            "Moderate crime levels. {violent} violent crime index, {property} property crime \
             index, {recent} recent incidents."
        )
    } else {
        format!(
            "Relatively low crime area. {violent} violent crime index, {property} property \
             crime index, {recent} recent incidents."
        )
    }
}

fn exposure_summary(property_type: PropertyType, fenced: bool, gated: bool) -> String {
    let context = match property_type {
        PropertyType::VacationHome => {
            " Vacation homes face higher exposure risk due to extended unoccupied periods."
        }
        PropertyType::Home => {
            " Primary residence benefits from regular occupancy providing natural deterrence."
        }
        PropertyType::Rental | PropertyType::Business => "",
    };

    match (fenced, gated) {
        (false, false) => format!(
            "Property lacks perimeter security (no fencing or gating), increasing exposure \
             risk.{context}"
        ),
        (true, true) => format!(
            "Property has both fencing and gating, providing strong perimeter security.{context}"
        ),
        (fenced, _) => {
            let feature = if fenced { "fenced" } else { "gated" };
            format!("Property has {feature} perimeter, providing moderate protection.{context}")
        }
    }
}

fn accessibility_summary(
    neighborhood: NeighborhoodType,
    property_type: PropertyType,
    fenced: bool,
) -> String {
    let area = capitalize(neighborhood.as_ref());
    let note = match property_type {
        PropertyType::VacationHome => {
            " Vacation homes face higher accessibility risk due to less frequent monitoring."
        }
        PropertyType::Home => {
            " Primary residence benefits from regular presence providing natural monitoring."
        }
        PropertyType::Rental | PropertyType::Business => "",
    };

    if fenced {
        format!("{area} area with fencing reduces unauthorized access risk.{note}")
    } else {
        format!("{area} area without fencing increases accessibility risk for potential threats.{note}")
    }
}

fn neighborhood_summary(population_density: u32, nearby_risks: &BTreeSet<String>) -> String {
    let tags = lowercase_tags(nearby_risks);
    let items: Vec<&str> = [
        ("nightclub", "nightlife"),
        ("warehouse", "industrial activity"),
        ("school", "school zone"),
    ]
    .into_iter()
    .filter(|(tag, _)| tags.contains(*tag))
    .map(|(_, label)| label)
    .collect();

    let density = if population_density > 5000 {
        "High"
    } else if population_density > 2000 {
        "Moderate"
    } else {
        "Low"
    };

    if items.is_empty() {
        format!(
            "{density} population density ({population_density}/sq mi) with minimal nearby \
             risk factors."
        )
    } else {
        format!(
            "{density} density area ({population_density}/sq mi) with nearby {}.",
            items.join(", ")
        )
    }
}

fn operational_summary(
    property_type: PropertyType,
    operating_hours: Option<&str>,
    notes: Option<&str>,
) -> String {
    let mut factors = match property_type {
        PropertyType::VacationHome => {
            vec!["extended unoccupied periods", "predictable absence patterns"]
        }
        PropertyType::Home => vec!["regular occupancy provides deterrence"],
        PropertyType::Rental | PropertyType::Business => Vec::new(),
    };
    if runs_around_the_clock(operating_hours) {
        factors.push("24/7 operation");
    }
    if mentions_theft(notes) {
        factors.push("recent theft incidents");
    }

    if factors.is_empty() {
        "Standard operational risk with no significant concerns identified.".to_string()
    } else {
        format!("Operational risk factors: {}.", factors.join(", "))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
