use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Select, Text};
use weather_core::{
    Config, Coordinates, FileStore, FixedLocation, IpGeolocation, LookupSession,
    OpenWeatherClient, RecentSearchesStore, WeatherFetchOrchestrator,
};

use crate::render::TerminalRenderer;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// Log request details to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the OpenWeather API key and endpoint.
    Configure,

    /// Show current weather and the 5-day forecast for a city.
    Show {
        /// City name; letters, spaces and hyphens only.
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },

    /// Show weather for your current location.
    Here {
        /// Latitude; without coordinates the location is derived from your IP address.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    /// List recent searches.
    Recent {
        /// Pick one interactively and show its weather.
        #[arg(long)]
        pick: bool,
    },
}

type Orchestrator = WeatherFetchOrchestrator<OpenWeatherClient, FileStore>;

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => configure().map(|()| ExitCode::SUCCESS),
            command => lookup(command, self.verbose).await,
        }
    }
}

/// Lookup failures are rendered by the session and only surface here as the
/// exit status; setup problems (config, prompts) are returned as errors.
async fn lookup(command: Command, verbose: bool) -> anyhow::Result<ExitCode> {
    let config = Config::load()?;
    let orchestrator = build_orchestrator(&config)?;
    let mut session = LookupSession::new(&orchestrator, TerminalRenderer::new(verbose));

    let outcome = match command {
        Command::Configure => return configure().map(|()| ExitCode::SUCCESS),
        Command::Show { city } => session.search(&city.join(" ")).await.map(|_| ()),
        Command::Here { lat: Some(lat), lon: Some(lon) } => {
            let here = FixedLocation(Coordinates { lat, lon });
            session.use_location(&here).await.map(|_| ())
        }
        Command::Here { .. } => {
            let here = IpGeolocation::new(&config.geolocation_url, config.request_timeout())?;
            session.use_location(&here).await.map(|_| ())
        }
        Command::Recent { pick: false } => {
            if orchestrator.recent().load().is_empty() {
                println!("No recent searches yet.");
            } else {
                session.refresh_recent();
            }
            Ok(())
        }
        Command::Recent { pick: true } => {
            let recent = orchestrator.recent().load();
            if recent.is_empty() {
                println!("No recent searches yet.");
                return Ok(ExitCode::SUCCESS);
            }
            let place = Select::new("Recent searches", recent)
                .prompt()
                .context("Failed to read selection")?;
            session.select_recent(&place).await.map(|_| ())
        }
    };

    Ok(exit_status(&outcome))
}

fn exit_status<T, E>(outcome: &Result<T, E>) -> ExitCode {
    if outcome.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn build_orchestrator(config: &Config) -> anyhow::Result<Orchestrator> {
    let api_key = config.require_api_key()?;
    let client = OpenWeatherClient::new(&config.base_url, config.request_timeout())?;
    let recent = RecentSearchesStore::new(FileStore::open_default()?);

    Ok(WeatherFetchOrchestrator::new(client, recent, api_key)
        .with_request_timeout(config.request_timeout())
        .with_forecast_days(config.forecast_days))
}

fn configure() -> anyhow::Result<()> {
    // Stored values only; an API key from the environment is not written back.
    let mut config = Config::load_from(&Config::config_file_path()?)?;

    let api_key = Text::new("OpenWeather API key:")
        .with_initial_value(config.api_key.as_deref().unwrap_or_default())
        .prompt()
        .context("Failed to read API key")?;
    let base_url = Text::new("API base URL:")
        .with_initial_value(&config.base_url)
        .prompt()
        .context("Failed to read base URL")?;

    let api_key = api_key.trim();
    config.api_key = (!api_key.is_empty()).then(|| api_key.to_string());
    config.base_url = base_url.trim().to_string();
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
