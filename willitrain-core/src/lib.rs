//! Core library for the `willitrain` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Fetching today's forecast from OpenWeather
//! - Formatting forecast entries for display
//! - Location sources (random populated place, IP lookup)
//!
//! It is used by `willitrain-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod forecast;
pub mod format;
pub mod location;
pub mod model;

pub use config::Config;
pub use error::ForecastError;
pub use forecast::ForecastClient;
pub use format::{format_forecast, mentions_rain};
pub use location::{FALLBACK_LOCATION, IpLocator, LocationSource, RandomCityPicker};
pub use model::{ForecastEntry, ForecastResult, UnitSystem, UnitsRequest};
