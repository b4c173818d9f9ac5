//! Current-conditions client for the OpenWeatherMap API.

use std::time::Duration;

use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use serde::Deserialize;

use crate::client::ClientId;
use crate::config::resolve_api_key;
use crate::error::{ConfigError, FetchError};
use crate::model::{FetchOutcome, WeatherObservation};
use crate::rate_limit::RateLimiter;
use crate::retry::{RetryPolicy, run_with_retry};

const BASE_URL: &str = "http://api.openweathermap.org/data/2.5/weather";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Source label attached to every successful weather fetch.
pub const WEATHER_SOURCE_LABEL: &str = "Open Weather API Data";

/// True when the city name is usable as a query, i.e. non-empty after
/// trimming whitespace.
pub fn validate_city_name(city_name: &str) -> bool {
    !city_name.trim().is_empty()
}

#[derive(Debug)]
pub struct WeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
    request_timeout: Duration,
    limiter: RateLimiter,
    policy: RetryPolicy,
}

impl WeatherClient {
    /// Requires an API key: the explicit parameter if given, otherwise
    /// the `OPENWEATHER_API_KEY` environment variable.
    pub fn new(api_key: Option<String>) -> Result<Self, ConfigError> {
        let api_key = resolve_api_key(api_key, ClientId::OpenWeather)?;

        Ok(Self {
            api_key,
            base_url: BASE_URL.to_string(),
            http: Client::new(),
            request_timeout: REQUEST_TIMEOUT,
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

    /// Fetch current conditions for a city. All failures are absorbed
    /// into the `Unavailable` diagnostic; this never panics or raises.
    pub async fn fetch(&self, city_name: &str) -> FetchOutcome<WeatherObservation> {
        let city = city_name.trim().to_lowercase();

        match run_with_retry(&self.policy, "weather", || self.fetch_once(&city)).await {
            Ok(observation) => FetchOutcome::Fetched {
                observation,
                source: WEATHER_SOURCE_LABEL.to_string(),
            },
            Err(reason) => FetchOutcome::Unavailable { reason },
        }
    }

    async fn fetch_once(&self, city: &str) -> Result<WeatherObservation, FetchError> {
        self.limiter.wait().await;

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "imperial"),
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
        let payload: OwCurrentResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

        let description = payload
            .weather
            .first()
            .map(|w| w.description.clone())
            .ok_or_else(|| {
                FetchError::Parse("weather response carried no condition descriptions".to_string())
            })?;

        let date = unix_to_date(payload.dt)
            .ok_or_else(|| FetchError::Parse(format!("timestamp {} out of range", payload.dt)))?;

        Ok(WeatherObservation {
            date,
            temperature_f: payload.main.temp,
            description,
            humidity_pct: payload.main.humidity,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
}

/// Calendar day (UTC) of a Unix-epoch-seconds timestamp.
fn unix_to_date(ts: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_names_validate_on_non_whitespace_content() {
        assert!(validate_city_name("Atlanta"));
        assert!(validate_city_name("  New York  "));
        assert!(!validate_city_name(""));
        assert!(!validate_city_name("   \t\n"));
    }

    #[test]
    fn unix_timestamp_maps_to_utc_calendar_day() {
        let date = unix_to_date(1721455200).expect("in range");
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 7, 20).expect("valid"));
    }

    #[test]
    fn well_formed_payload_parses() {
        let payload: OwCurrentResponse = serde_json::from_str(
            r#"{"dt": 1721455200, "main": {"temp": 75.5, "humidity": 60},
                "weather": [{"description": "clear sky"}]}"#,
        )
        .expect("should parse");

        assert_eq!(payload.dt, 1721455200);
        assert_eq!(payload.main.temp, 75.5);
        assert_eq!(payload.main.humidity, 60);
        assert_eq!(payload.weather[0].description, "clear sky");
    }

    #[test]
    fn missing_main_block_is_a_parse_error() {
        let res: Result<OwCurrentResponse, _> =
            serde_json::from_str(r#"{"dt": 1721455200, "weather": []}"#);
        assert!(res.is_err());
    }

    #[test]
    fn missing_api_key_is_a_construction_error() {
        // Deterministic regardless of the surrounding environment.
        unsafe { std::env::remove_var("OPENWEATHER_API_KEY") };

        let err = WeatherClient::new(None).unwrap_err();
        assert!(err.to_string().contains("OPENWEATHER_API_KEY"));
    }
}
