//! Socrata SODA API fetcher.
//!
//! Fetches a single bounded page of the most recent records from a
//! Socrata dataset using the `$limit`, `$order` and `$where` query
//! parameters. Used by the Chicago, NYC, LA and SF city sources.

use std::time::Duration;

use chrono::{DateTime, Days, Utc};

use crate::CrimeDataError;

/// Configuration for a Socrata fetch.
pub struct SocrataQuery<'a> {
    /// Dataset URL (e.g., `"https://data.lacity.org/resource/y9pe-qdrd.json"`).
    pub api_url: &'a str,
    /// Date column used for ordering and `$where` filtering.
    pub date_column: &'a str,
    /// Maximum number of records.
    pub limit: u64,
    /// Only fetch records from the last `window_days` days.
    pub window_days: Option<u32>,
    /// Request timeout.
    pub timeout: Duration,
}

impl SocrataQuery<'_> {
    /// Builds the SODA query parameters relative to `now`.
    #[must_use]
    pub fn params(&self, now: DateTime<Utc>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("$limit", self.limit.to_string()),
            ("$order", format!("{} DESC", self.date_column)),
        ];

        if let Some(days) = self.window_days {
            let since = now
                .date_naive()
                .checked_sub_days(Days::new(u64::from(days)))
                .unwrap_or_else(|| now.date_naive());
            params.push((
                "$where",
                format!("{} >= '{}'", self.date_column, since.format("%Y-%m-%d")),
            ));
        }

        params
    }
}

/// Fetches the most recent records from a Socrata dataset.
///
/// # Errors
///
/// Returns [`CrimeDataError`] if the request fails, times out, returns a
/// non-success status, or the body is not a JSON array.
pub async fn fetch_recent(
    client: &reqwest::Client,
    query: &SocrataQuery<'_>,
    now: DateTime<Utc>,
) -> Result<Vec<serde_json::Value>, CrimeDataError> {
    let resp = client
        .get(query.api_url)
        .query(&query.params(now))
        .timeout(query.timeout)
        .send()
        .await?;

    if !resp.status().is_success() {
        return Err(CrimeDataError::Status {
            status: resp.status().as_u16(),
        });
    }

    let body = resp.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
