//! Config-driven city crime sources.
//!
//! [`CitySourceDefinition`] captures everything unique about a city API in
//! a TOML file under `cities/`: the dataset, the offense fields and keyword
//! sets, the index floors and multipliers, and how recent incidents are
//! counted. A single generic implementation, [`SocrataCitySource`], serves
//! every city.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use property_risk_models::{CrimeResult, CrimeSource};
use serde::Deserialize;

use crate::socrata::{SocrataQuery, fetch_recent};
use crate::type_mapping::{Classification, IncidentClass};
use crate::{CrimeDataError, CrimeStatsProvider};

// ── Top-level source definition ──────────────────────────────────────────

/// A complete, config-driven city source definition.
#[derive(Debug, Clone, Deserialize)]
pub struct CitySourceDefinition {
    /// Provenance tag (e.g., `"chicago_api_realtime"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Lowercase city name as produced by city detection.
    pub city: String,
    /// Short exact-match hints (e.g., `"nyc"`).
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// How to fetch raw records.
    pub fetcher: FetcherConfig,
    /// How to classify records.
    pub classification: Classification,
    /// How to scale ratios into indices.
    pub indices: IndexScaling,
    /// How to count recent incidents.
    pub recent: RecentRule,
}

/// How to fetch raw records from the city API.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FetcherConfig {
    /// Socrata SODA API.
    Socrata {
        /// Dataset URL.
        api_url: String,
        /// Date column for ordering and filtering.
        date_column: String,
        /// Maximum records per request.
        limit: u64,
        /// Restrict to the last N days.
        #[serde(default)]
        window_days: Option<u32>,
    },
}

/// Floor and multiplier applied to one crime ratio.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IndexScale {
    /// Minimum index value.
    pub floor: i64,
    /// Multiplier applied to the percentage.
    pub multiplier: f64,
}

impl IndexScale {
    /// Scales a `0..=1` ratio into an index in `floor..=100`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn index(self, ratio: f64) -> i64 {
        let scaled = (ratio * 100.0 * self.multiplier).trunc() as i64;
        scaled.max(self.floor).min(100)
    }
}

/// Violent and property index scaling.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IndexScaling {
    /// Violent crime scaling.
    pub violent: IndexScale,
    /// Property crime scaling.
    pub property: IndexScale,
}

/// How the recent-incident count is derived.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecentRule {
    /// Records dated within the last `days` days.
    WithinDays {
        /// Recency window.
        days: u32,
        /// Upper bound.
        cap: i64,
    },
    /// One per `divisor` records fetched, as a rough proxy.
    PerRecords {
        /// Records per recent incident.
        divisor: u64,
        /// Upper bound.
        cap: i64,
    },
}

// ── Reduction ────────────────────────────────────────────────────────────

impl CitySourceDefinition {
    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn date_column(&self) -> &str {
        match &self.fetcher {
            FetcherConfig::Socrata { date_column, .. } => date_column,
        }
    }

    const fn window_days(&self) -> Option<u32> {
        match &self.fetcher {
            FetcherConfig::Socrata { window_days, .. } => *window_days,
        }
    }

    /// Reduces raw incident records to a [`CrimeResult`].
    ///
    /// Returns `None` for an empty record set.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn summarize(
        &self,
        records: &[serde_json::Value],
        now: DateTime<Utc>,
    ) -> Option<CrimeResult> {
        if records.is_empty() {
            return None;
        }

        let mut violent = 0_u64;
        let mut property = 0_u64;
        for record in records {
            match self.classification.classify(record) {
                IncidentClass::Violent => violent += 1,
                IncidentClass::Property => property += 1,
                IncidentClass::Other => {}
            }
        }

        let total = records.len() as u64;
        let violent_ratio = violent as f64 / total as f64;
        let property_ratio = property as f64 / total as f64;

        let recent = match self.recent {
            RecentRule::WithinDays { days, cap } => {
                let cutoff = now
                    .date_naive()
                    .checked_sub_days(Days::new(u64::from(days)))
                    .unwrap_or_else(|| now.date_naive());
                let count = records
                    .iter()
                    .filter(|r| record_date(r, self.date_column()).is_some_and(|d| d >= cutoff))
                    .count();
                i64::try_from(count).unwrap_or(i64::MAX).min(cap)
            }
            RecentRule::PerRecords { divisor, cap } => {
                i64::try_from(total / divisor.max(1)).unwrap_or(i64::MAX).min(cap)
            }
        };

        log::info!(
            "{}: {total} incidents, {violent} violent, {property} property, {recent} recent",
            self.name
        );

        Some(
            CrimeResult::new(
                self.indices.violent.index(violent_ratio),
                self.indices.property.index(property_ratio),
                recent,
                CrimeSource::CityApi(self.id.clone()),
            )
            .with_sample(total, self.window_days()),
        )
    }
}

/// Extracts the calendar date from a Socrata floating timestamp
/// (`2024-01-15T12:00:00.000`).
fn record_date(record: &serde_json::Value, column: &str) -> Option<NaiveDate> {
    let raw = record.get(column)?.as_str()?;
    NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
}

// ── Provider ─────────────────────────────────────────────────────────────

/// A city crime API backed by a [`CitySourceDefinition`].
pub struct SocrataCitySource {
    client: reqwest::Client,
    definition: CitySourceDefinition,
}

impl SocrataCitySource {
    /// Creates a new city source.
    #[must_use]
    pub const fn new(client: reqwest::Client, definition: CitySourceDefinition) -> Self {
        Self { client, definition }
    }
}

#[async_trait]
impl CrimeStatsProvider for SocrataCitySource {
    fn id(&self) -> &str {
        &self.definition.id
    }

    /// Full city names match anywhere in the hint ("chicago, il");
    /// aliases must match exactly so that "la" does not match
    /// "philadelphia".
    fn serves(&self, city: &str) -> bool {
        city.contains(self.definition.city.as_str())
            || self.definition.aliases.iter().any(|a| a == city)
    }

    async fn fetch_stats(
        &self,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<Option<CrimeResult>, CrimeDataError> {
        let FetcherConfig::Socrata {
            api_url,
            date_column,
            limit,
            window_days,
        } = &self.definition.fetcher;

        let query = SocrataQuery {
            api_url,
            date_column,
            limit: *limit,
            window_days: *window_days,
            timeout: self.definition.timeout(),
        };

        let now = Utc::now();
        let records = fetch_recent(&self.client, &query, now).await?;
        Ok(self.definition.summarize(&records, now))
    }
}

// ── Compile-time embedded TOML files ─────────────────────────────────────

const CITY_TOMLS: &[(&str, &str)] = &[
    ("chicago", include_str!("../cities/chicago.toml")),
    ("new_york", include_str!("../cities/new_york.toml")),
    ("los_angeles", include_str!("../cities/los_angeles.toml")),
    ("san_francisco", include_str!("../cities/san_francisco.toml")),
];

/// Returns every embedded city source definition.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_city_sources() -> Vec<CitySourceDefinition> {
    CITY_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse city source '{name}': {e}"))
        })
        .collect()
}
