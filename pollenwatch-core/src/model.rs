use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One successful weather fetch, as shown to the user and logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub date: NaiveDate,
    pub temperature_f: f64,
    pub description: String,
    pub humidity_pct: u8,
}

/// One successful pollen fetch. Indices follow the upstream 0-5 scale.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PollenObservation {
    pub grass_index: u8,
    pub tree_index: u8,
    pub weed_index: u8,
    pub health_recommendations: Vec<String>,
}

/// Result of one fetch call: either an observation plus the label of
/// the upstream that produced it, or no data plus a human-readable
/// diagnostic. A fetch never yields both.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Fetched { observation: T, source: String },
    Unavailable { reason: String },
}

impl<T> FetchOutcome<T> {
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched { .. })
    }

    pub fn observation(&self) -> Option<&T> {
        match self {
            Self::Fetched { observation, .. } => Some(observation),
            Self::Unavailable { .. } => None,
        }
    }

    /// The source label on success, the diagnostic on failure.
    pub fn describe(&self) -> &str {
        match self {
            Self::Fetched { source, .. } => source,
            Self::Unavailable { reason } => reason,
        }
    }

    pub fn into_parts(self) -> (Option<T>, String) {
        match self {
            Self::Fetched {
                observation,
                source,
            } => (Some(observation), source),
            Self::Unavailable { reason } => (None, reason),
        }
    }
}
