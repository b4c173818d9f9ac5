//! Flat-file log of successful weather fetches.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::LogError;
use crate::model::WeatherObservation;

pub const DEFAULT_LOG_FILE: &str = "weather_log.csv";

/// Appends one comma-separated line per successful weather fetch:
/// `date, city, temperature, description, humidity, source_label`.
#[derive(Debug, Clone)]
pub struct WeatherLogger {
    log_file: PathBuf,
}

impl WeatherLogger {
    pub fn new(log_file: impl Into<PathBuf>) -> Self {
        Self {
            log_file: log_file.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.log_file
    }

    /// Append one line for the observation. Failures are reported, not
    /// raised: the observation already belongs to the caller and a log
    /// problem must not invalidate it.
    pub fn log(
        &self,
        city_name: &str,
        observation: Option<&WeatherObservation>,
        source_info: &str,
    ) -> Result<(), LogError> {
        let observation = observation.ok_or(LogError::NoData)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;

        writeln!(
            file,
            "{}, {}, {}, {}, {}, {}",
            observation.date,
            city_name,
            observation.temperature_f,
            observation.description,
            observation.humidity_pct,
            source_info
        )?;

        Ok(())
    }
}

impl Default for WeatherLogger {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_FILE)
    }
}
