use crate::client::ClientId;

/// Construction-time configuration failures. Unlike [`FetchError`],
/// these are fatal: a client without an API key is never usable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "API key not found for '{client}'. Set the {env_var} environment variable, \
         run `pollenwatch configure {client}`, or pass a key explicitly."
    )]
    MissingApiKey {
        client: ClientId,
        env_var: &'static str,
    },
}

/// Per-attempt fetch failures, classified so the retry driver can pick
/// the right recovery (standard backoff, 60s rate-limit pause, or bail).
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    /// HTTP 429 from the upstream.
    #[error("rate limited (HTTP 429)")]
    RateLimited,

    /// Any other non-2xx status.
    #[error("HTTP error {0}")]
    Status(u16),

    /// Transport-level failure: connection refused, DNS, TLS.
    #[error("network error: {0}")]
    Network(String),

    /// Response body was malformed or missing a required field.
    #[error("malformed response: {0}")]
    Parse(String),

    /// Well-formed response that carried no data. Terminal: retrying
    /// would return the same empty payload.
    #[error("no data available in API response")]
    NoData,
}

impl FetchError {
    /// Classify a transport error from `reqwest`.
    pub(crate) fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err.to_string())
        }
    }

    /// Classify a non-success HTTP status.
    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimited
        } else {
            Self::Status(status.as_u16())
        }
    }
}

/// Failures from the CSV observation logger. Never fatal to a fetch:
/// the observation has already been returned to the caller.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("no weather data to log")]
    NoData,

    #[error("could not save data to log file: {0}")]
    Io(#[from] std::io::Error),
}
