use std::convert::TryFrom;

pub mod openweather;
pub mod pollen;

pub use openweather::{WeatherClient, validate_city_name};
pub use pollen::{PollenClient, index_color, index_level};

/// Identifies one of the two upstream API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientId {
    OpenWeather,
    GooglePollen,
}

impl ClientId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientId::OpenWeather => "openweather",
            ClientId::GooglePollen => "googlepollen",
        }
    }

    /// Environment variable consulted when no key is passed explicitly.
    pub fn env_var(&self) -> &'static str {
        match self {
            ClientId::OpenWeather => "OPENWEATHER_API_KEY",
            ClientId::GooglePollen => "GOOGLE_POLLEN_API_KEY",
        }
    }

    pub const fn all() -> &'static [ClientId] {
        &[ClientId::OpenWeather, ClientId::GooglePollen]
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ClientId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ClientId::OpenWeather),
            "googlepollen" => Ok(ClientId::GooglePollen),
            _ => Err(anyhow::anyhow!(
                "Unknown client '{value}'. Supported clients: openweather, googlepollen."
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_id_as_str_roundtrip() {
        for id in ClientId::all() {
            let s = id.as_str();
            let parsed = ClientId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn client_id_parse_is_case_insensitive() {
        let parsed = ClientId::try_from("OpenWeather").expect("should parse");
        assert_eq!(parsed, ClientId::OpenWeather);
    }

    #[test]
    fn unknown_client_error() {
        let err = ClientId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown client"));
    }
}
