use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use crossterm::style::Stylize;
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::warn;
use willitrain_core::{
    Config, FALLBACK_LOCATION, ForecastClient, IpLocator, LocationSource, RandomCityPicker,
    UnitsRequest, format_forecast, mentions_rain,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "willitrain",
    version,
    about = "Get the rain forecast for the day",
    after_help = "Enjoy the rain! (...or not)",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub show: ShowArgs,

    /// Path to the config file (defaults to the platform config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key, GeoNames username and default location.
    Configure,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// The location to get the forecast for, e.g. "London" or "London,GB".
    #[arg(conflicts_with = "random_location")]
    pub location: Option<String>,

    /// The units to use for the forecast (metric, imperial or random).
    #[arg(short, long, default_value = "metric")]
    pub units: String,

    /// Pick a random populated place instead of a named location.
    #[arg(long)]
    pub random_location: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = load_config(self.config.as_deref())?;

        match self.command {
            Some(Command::Configure) => configure(config, self.config.as_deref()),
            None => show(&self.show, &config).await,
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn show(args: &ShowArgs, config: &Config) -> anyhow::Result<()> {
    let units: UnitsRequest = args.units.parse()?;
    let client = ForecastClient::from_config(config)?;
    let location = resolve_location(args, config).await?;

    let forecast = client.fetch(&location, units).await?;
    let lines = format_forecast(&forecast);

    println!("Forecast for {location} ({}):", forecast.units);
    if lines.is_empty() {
        println!("No forecast samples left for today.");
    }
    for line in lines {
        if mentions_rain(&line) {
            println!("{}", line.blue());
        } else {
            println!("{line}");
        }
    }

    Ok(())
}

/// Argument, then `--random-location`, then config default, then IP lookup.
async fn resolve_location(args: &ShowArgs, config: &Config) -> anyhow::Result<String> {
    if let Some(location) = &args.location {
        return Ok(location.clone());
    }

    if args.random_location {
        let picker = RandomCityPicker::from_config(config)?;
        return Ok(picker.locate().await?);
    }

    if let Some(location) = config.default_location() {
        return Ok(location.to_string());
    }

    match IpLocator::new().locate().await {
        Ok(location) => Ok(location),
        Err(err) => {
            warn!(error = %err, fallback = FALLBACK_LOCATION, "IP location lookup failed");
            Ok(FALLBACK_LOCATION.to_string())
        }
    }
}

fn configure(mut config: Config, path: Option<&Path>) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read OpenWeather API key")?;
    if api_key.trim().is_empty() {
        anyhow::bail!("An OpenWeather API key is required.");
    }
    config.set_openweather_api_key(api_key.trim().to_string());

    let username = Text::new("GeoNames username (for --random-location, optional):")
        .with_default(config.geonames_username().unwrap_or_default())
        .prompt()
        .context("Failed to read GeoNames username")?;
    if !username.trim().is_empty() {
        config.set_geonames_username(username.trim().to_string());
    }

    let location = Text::new("Default location (optional, empty uses IP lookup):")
        .with_default(config.default_location().unwrap_or_default())
        .prompt()
        .context("Failed to read default location")?;
    config.default_location = Some(location.trim().to_string()).filter(|l| !l.is_empty());

    let saved_to = match path {
        Some(path) => {
            config.save_to(path)?;
            path.to_path_buf()
        }
        None => config.save()?,
    };
    println!("Configuration saved to {}", saved_to.display());

    Ok(())
}
