//! Incident classification utilities.
//!
//! City APIs name their offense fields differently and use their own
//! vocabularies, so each city definition supplies its own field list and
//! keyword sets. Classification is keyword-based and case-insensitive.

use serde::Deserialize;

/// Coarse class of a single incident record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentClass {
    /// Crime against persons.
    Violent,
    /// Crime against property.
    Property,
    /// Anything else.
    Other,
}

/// Per-city classification rules.
#[derive(Debug, Clone, Deserialize)]
pub struct Classification {
    /// Candidate offense fields; the first non-empty one is used.
    pub category_fields: Vec<String>,
    /// Substrings marking an incident as violent (checked first).
    pub violent_keywords: Vec<String>,
    /// Substrings marking an incident as property crime.
    pub property_keywords: Vec<String>,
}

impl Classification {
    /// Classifies one raw incident record.
    #[must_use]
    pub fn classify(&self, record: &serde_json::Value) -> IncidentClass {
        let offense = self
            .category_fields
            .iter()
            .filter_map(|field| record.get(field).and_then(serde_json::Value::as_str))
            .find(|value| !value.is_empty())
            .unwrap_or_default()
            .to_lowercase();

        if contains_any(&offense, &self.violent_keywords) {
            IncidentClass::Violent
        } else if contains_any(&offense, &self.property_keywords) {
            IncidentClass::Property
        } else {
            IncidentClass::Other
        }
    }
}

/// Returns `true` if `haystack` contains any of the `needles`.
fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chicago() -> Classification {
        Classification {
            category_fields: vec![
                "primary_type".to_string(),
                "primary_type_description".to_string(),
            ],
            violent_keywords: ["assault", "battery", "homicide", "robbery"]
                .map(String::from)
                .to_vec(),
            property_keywords: ["theft", "burglary", "arson"].map(String::from).to_vec(),
        }
    }

    #[test]
    fn classifies_by_keyword() {
        let rules = chicago();
        assert_eq!(
            rules.classify(&serde_json::json!({ "primary_type": "BATTERY" })),
            IncidentClass::Violent
        );
        assert_eq!(
            rules.classify(&serde_json::json!({ "primary_type": "MOTOR VEHICLE THEFT" })),
            IncidentClass::Property
        );
        assert_eq!(
            rules.classify(&serde_json::json!({ "primary_type": "NARCOTICS" })),
            IncidentClass::Other
        );
    }

    #[test]
    fn violent_wins_over_property() {
        let rules = chicago();
        assert_eq!(
            rules.classify(&serde_json::json!({ "primary_type": "ROBBERY THEFT" })),
            IncidentClass::Violent
        );
    }

    #[test]
    fn falls_through_empty_fields() {
        let rules = chicago();
        let record = serde_json::json!({
            "primary_type": "",
            "primary_type_description": "Burglary"
        });
        assert_eq!(rules.classify(&record), IncidentClass::Property);
    }

    #[test]
    fn missing_fields_are_other() {
        assert_eq!(
            chicago().classify(&serde_json::json!({ "id": "1" })),
            IncidentClass::Other
        );
    }
}
