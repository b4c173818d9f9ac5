//! Core library for the `pollenwatch` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - HTTP clients for the weather and pollen upstreams, with per-instance
//!   rate limiting and a shared retry/backoff driver
//! - Shared domain models and the flat-file observation logger
//!
//! It is used by `pollenwatch-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod model;
pub mod rate_limit;
pub mod retry;

pub use client::{
    ClientId, PollenClient, WeatherClient, index_color, index_level, validate_city_name,
};
pub use client::openweather::WEATHER_SOURCE_LABEL;
pub use client::pollen::{ATLANTA_LATITUDE, ATLANTA_LONGITUDE, POLLEN_SOURCE_LABEL};
pub use config::{ClientConfig, Config, resolve_api_key};
pub use error::{ConfigError, FetchError, LogError};
pub use logger::{DEFAULT_LOG_FILE, WeatherLogger};
pub use model::{FetchOutcome, PollenObservation, WeatherObservation};
pub use retry::RetryPolicy;
