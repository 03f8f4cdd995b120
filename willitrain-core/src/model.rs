use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::ForecastError;

/// Concrete unit system a forecast was requested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Value of the `units` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Units as asked for on the command line; `Random` is resolved before fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitsRequest {
    Metric,
    Imperial,
    Random,
}

impl UnitsRequest {
    /// Pick the concrete unit system. `Random` is a fair coin flip.
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> UnitSystem {
        match self {
            UnitsRequest::Metric => UnitSystem::Metric,
            UnitsRequest::Imperial => UnitSystem::Imperial,
            UnitsRequest::Random => {
                if rng.gen_bool(0.5) {
                    UnitSystem::Metric
                } else {
                    UnitSystem::Imperial
                }
            }
        }
    }
}

impl FromStr for UnitsRequest {
    type Err = ForecastError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "metric" => Ok(UnitsRequest::Metric),
            "imperial" => Ok(UnitsRequest::Imperial),
            "random" => Ok(UnitsRequest::Random),
            _ => Err(ForecastError::InvalidUnits { given: value.to_string() }),
        }
    }
}

/// One forecast sample that falls within the current day.
///
/// `temperature` is the source value rounded with [`f64::round`], so halfway
/// cases round away from zero (`2.5` becomes `3`, `-2.5` becomes `-3`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// `HH:MM` in UTC.
    pub time_of_day: String,
    pub temperature: i32,
    pub description: String,
}

/// Today's entries in upstream order, with the units they were fetched in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub entries: Vec<ForecastEntry>,
    pub units: UnitSystem,
}
