use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::ForecastError;

pub mod geonames;
pub mod ipapi;

pub use geonames::RandomCityPicker;
pub use ipapi::IpLocator;

/// Used when no location is given and none can be derived.
pub const FALLBACK_LOCATION: &str = "Cluj-Napoca";

/// Something that can come up with a location name to forecast for.
#[async_trait]
pub trait LocationSource: Send + Sync + Debug {
    async fn locate(&self) -> Result<String, ForecastError>;
}
