//! City detection from free-form addresses.

/// Supported cities in match priority order.
///
/// Longer, more specific names come first so that e.g. "san francisco"
/// is matched before any shorter name it might contain.
pub const SUPPORTED_CITIES: &[&str] = &[
    "san francisco",
    "los angeles",
    "new york",
    "philadelphia",
    "chicago",
];

/// Detects a supported city by case-insensitive substring match.
///
/// This is a plain substring test: an address that mentions a supported
/// city anywhere (e.g. "Chicago Ave, Evanston") is attributed to it.
#[must_use]
pub fn detect_city(address: &str) -> Option<&'static str> {
    if address.is_empty() {
        return None;
    }

    let lower = address.to_lowercase();
    SUPPORTED_CITIES
        .iter()
        .find(|city| lower.contains(*city))
        .copied()
}
