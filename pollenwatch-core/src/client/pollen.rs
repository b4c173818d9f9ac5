//! Daily pollen forecast client for the Google Pollen API.
//!
//! The upstream is queried for a fixed location (Atlanta, GA) with a
//! one-day horizon; the response is reduced to the three index values
//! displayed in the UI plus at most one health recommendation per
//! pollen type.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::client::ClientId;
use crate::config::resolve_api_key;
use crate::error::{ConfigError, FetchError};
use crate::model::{FetchOutcome, PollenObservation};
use crate::rate_limit::RateLimiter;
use crate::retry::{RetryPolicy, run_with_retry};

const BASE_URL: &str = "https://pollen.googleapis.com/v1/forecast:lookup";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Source label attached to every successful pollen fetch.
pub const POLLEN_SOURCE_LABEL: &str = "Google Pollen API Data";

pub const ATLANTA_LATITUDE: f64 = 33.749;
pub const ATLANTA_LONGITUDE: f64 = -84.388;

/// Display color for a 0-5 pollen index. Out-of-range values fall back
/// to the neutral "gray".
pub fn index_color(index: u8) -> &'static str {
    match index {
        0 => "gray",
        1 => "darkgreen",
        2 => "lightgreen",
        3 => "yellow",
        4 => "orange",
        5 => "red",
        _ => "gray",
    }
}

/// Display level for a 0-5 pollen index. Out-of-range values report
/// "Unknown".
pub fn index_level(index: u8) -> &'static str {
    match index {
        0 => "None",
        1 => "Very Low",
        2 => "Low",
        3 => "Moderate",
        4 => "High",
        5 => "Very High",
        _ => "Unknown",
    }
}

#[derive(Debug)]
pub struct PollenClient {
    api_key: String,
    base_url: String,
    http: Client,
    request_timeout: Duration,
    latitude: f64,
    longitude: f64,
    limiter: RateLimiter,
    policy: RetryPolicy,
}

impl PollenClient {
    /// Requires an API key: the explicit parameter if given, otherwise
    /// the `GOOGLE_POLLEN_API_KEY` environment variable.
    pub fn new(api_key: Option<String>) -> Result<Self, ConfigError> {
        let api_key = resolve_api_key(api_key, ClientId::GooglePollen)?;

        Ok(Self {
            api_key,
            base_url: BASE_URL.to_string(),
            http: Client::new(),
            request_timeout: REQUEST_TIMEOUT,
            latitude: ATLANTA_LATITUDE,
            longitude: ATLANTA_LONGITUDE,
            limiter: RateLimiter::default(),
            policy: RetryPolicy::default(),
        })
    }

    /// Point the client at a different endpoint, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.limiter = RateLimiter::new(interval);
        self
    }

    /// Fetch today's pollen forecast. A well-formed response with no
    /// daily data is reported immediately, without retrying.
    pub async fn fetch(&self) -> FetchOutcome<PollenObservation> {
        match run_with_retry(&self.policy, "pollen", || self.fetch_once()).await {
            Ok(observation) => FetchOutcome::Fetched {
                observation,
                source: POLLEN_SOURCE_LABEL.to_string(),
            },
            Err(reason) => FetchOutcome::Unavailable { reason },
        }
    }

    async fn fetch_once(&self) -> Result<PollenObservation, FetchError> {
        self.limiter.wait().await;

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("location.longitude", &self.longitude.to_string()),
                ("location.latitude", &self.latitude.to_string()),
                ("days", "1"),
            ])
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(FetchError::from_request)?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::from_status(status));
        }

        let body = res.text().await.map_err(FetchError::from_request)?;
        let payload: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

        let daily = payload
            .daily_info
            .into_iter()
            .next()
            .ok_or(FetchError::NoData)?;

        Ok(reduce_daily_info(daily))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastResponse {
    #[serde(default)]
    daily_info: Vec<DailyInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyInfo {
    #[serde(default)]
    pollen_type_info: Vec<PollenTypeInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PollenTypeInfo {
    #[serde(default)]
    code: String,
    index_info: Option<IndexInfo>,
    #[serde(default)]
    health_recommendations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct IndexInfo {
    #[serde(default)]
    value: u8,
}

/// Pick out the GRASS/TREE/WEED indices and the first non-empty
/// recommendation per type. Entries with other codes are ignored.
fn reduce_daily_info(daily: DailyInfo) -> PollenObservation {
    let mut observation = PollenObservation::default();

    for entry in daily.pollen_type_info {
        let value = entry.index_info.as_ref().map(|i| i.value).unwrap_or(0);

        let slot = match entry.code.as_str() {
            "GRASS" => &mut observation.grass_index,
            "TREE" => &mut observation.tree_index,
            "WEED" => &mut observation.weed_index,
            _ => continue,
        };
        *slot = value;

        if let Some(rec) = entry.health_recommendations.iter().find(|r| !r.is_empty()) {
            observation
                .health_recommendations
                .push(format!("{}: {rec}", title_case(&entry.code)));
        }
    }

    observation
}

fn title_case(code: &str) -> String {
    let mut chars = code.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
