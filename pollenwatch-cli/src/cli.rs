use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use pollenwatch_core::{
    ClientId, Config, FetchOutcome, PollenClient, PollenObservation, WeatherClient, WeatherLogger,
    WeatherObservation, index_color, index_level, validate_city_name,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "pollenwatch", version, about = "Weather & pollen conditions CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an API key for an upstream client.
    Configure {
        /// Client short name, "openweather" or "googlepollen".
        client: String,
    },

    /// Show current weather for a city and append it to the log file.
    Weather {
        /// City name, e.g. "Atlanta".
        city: String,

        /// Where successful observations are appended.
        #[arg(long, default_value = pollenwatch_core::DEFAULT_LOG_FILE)]
        log_file: PathBuf,

        /// Skip appending the observation to the log file.
        #[arg(long)]
        no_log: bool,
    },

    /// Show today's pollen indices for Atlanta.
    Pollen,

    /// Combined weather & pollen report.
    Report {
        /// City for the weather side of the report.
        #[arg(default_value = "Atlanta")]
        city: String,

        /// Where successful observations are appended.
        #[arg(long, default_value = pollenwatch_core::DEFAULT_LOG_FILE)]
        log_file: PathBuf,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { client } => configure(&client),
            Command::Weather {
                city,
                log_file,
                no_log,
            } => show_weather(&city, &log_file, no_log).await,
            Command::Pollen => show_pollen().await,
            Command::Report { city, log_file } => show_report(&city, &log_file).await,
        }
    }
}

fn configure(client: &str) -> anyhow::Result<()> {
    let id = ClientId::try_from(client)?;

    let mut config = Config::load()?;

    let api_key = inquire::Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.upsert_client_api_key(id, api_key);
    config.save()?;

    println!(
        "Saved API key for {id} to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

async fn show_weather(city: &str, log_file: &Path, no_log: bool) -> anyhow::Result<()> {
    anyhow::ensure!(validate_city_name(city), "Please enter a city name.");

    let config = Config::load()?;
    let client = weather_client(&config)?;

    match client.fetch(city).await {
        FetchOutcome::Fetched {
            observation,
            source,
        } => {
            print_weather(city, &observation, &source);

            if !no_log {
                let logger = WeatherLogger::new(log_file);
                if let Err(err) = logger.log(city, Some(&observation), &source) {
                    eprintln!("warning: {err}");
                }
            }
            Ok(())
        }
        FetchOutcome::Unavailable { reason } => {
            anyhow::bail!("Could not fetch weather: {reason}")
        }
    }
}

async fn show_pollen() -> anyhow::Result<()> {
    let config = Config::load()?;
    let client = pollen_client(&config)?;

    match client.fetch().await {
        FetchOutcome::Fetched { observation, .. } => {
            print_pollen(&observation);
            Ok(())
        }
        FetchOutcome::Unavailable { reason } => {
            anyhow::bail!("Could not fetch pollen data: {reason}")
        }
    }
}

/// One parameterized report covers both the single-city and dashboard
/// use cases. Weather failures are hard errors; a pollen failure
/// degrades to a warning so the weather half still renders.
async fn show_report(city: &str, log_file: &Path) -> anyhow::Result<()> {
    anyhow::ensure!(validate_city_name(city), "Please enter a city name.");

    let config = Config::load()?;
    let weather = weather_client(&config)?;
    let pollen = match pollen_client(&config) {
        Ok(client) => Some(client),
        Err(err) => {
            eprintln!("warning: pollen unavailable: {err}");
            None
        }
    };

    // The two clients are independent; fetch them concurrently.
    let (weather_outcome, pollen_outcome) = tokio::join!(weather.fetch(city), async {
        match &pollen {
            Some(client) => Some(client.fetch().await),
            None => None,
        }
    });

    match weather_outcome {
        FetchOutcome::Fetched {
            observation,
            source,
        } => {
            print_weather(city, &observation, &source);

            let logger = WeatherLogger::new(log_file);
            if let Err(err) = logger.log(city, Some(&observation), &source) {
                eprintln!("warning: {err}");
            }
        }
        FetchOutcome::Unavailable { reason } => {
            anyhow::bail!("Could not fetch weather: {reason}")
        }
    }

    match pollen_outcome {
        Some(FetchOutcome::Fetched { observation, .. }) => {
            println!();
            print_pollen(&observation);
        }
        Some(FetchOutcome::Unavailable { reason }) => {
            eprintln!("warning: pollen unavailable: {reason}");
        }
        None => {}
    }

    Ok(())
}

fn weather_client(config: &Config) -> anyhow::Result<WeatherClient> {
    let key = config
        .client_api_key(ClientId::OpenWeather)
        .map(str::to_owned);
    Ok(WeatherClient::new(key)?)
}

fn pollen_client(config: &Config) -> anyhow::Result<PollenClient> {
    let key = config
        .client_api_key(ClientId::GooglePollen)
        .map(str::to_owned);
    Ok(PollenClient::new(key)?)
}

fn print_weather(city: &str, observation: &WeatherObservation, source: &str) {
    println!("Weather for {city} ({}):", observation.date);
    println!("  Temperature: {:.1} °F", observation.temperature_f);
    println!("  Conditions:  {}", observation.description);
    println!("  Humidity:    {}%", observation.humidity_pct);
    println!("  Source:      {source}");
}

fn print_pollen(observation: &PollenObservation) {
    println!("Pollen (Atlanta):");
    for (name, index) in [
        ("Grass", observation.grass_index),
        ("Tree", observation.tree_index),
        ("Weed", observation.weed_index),
    ] {
        println!(
            "  {name:<5} {index} - {} ({})",
            index_level(index),
            index_color(index)
        );
    }

    if !observation.health_recommendations.is_empty() {
        println!("Recommendations:");
        for rec in &observation.health_recommendations {
            println!("  - {rec}");
        }
    }
}
