use thiserror::Error;

/// Errors produced while resolving a location or fetching today's forecast.
///
/// Every variant is fatal for a run; callers decide how to report it.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// The units directive was not one of `metric`, `imperial` or `random`.
    #[error("Invalid units. Please use either metric or imperial.")]
    InvalidUnits { given: String },

    /// The weather endpoint answered 401.
    #[error("Access denied. Please check your API key.")]
    Authentication,

    /// The weather endpoint answered 404.
    #[error(
        "Sorry but I couldn't find that location. To make the search more precise, \
         please put the city's name, comma, 2-letter country code (ISO3166)."
    )]
    LocationNotFound { location: String },

    /// Any other non-2xx answer from an upstream service.
    #[error("Sorry but something went wrong ({service}): {status}")]
    Upstream { service: &'static str, status: u16 },

    /// GeoNames reports failures in the payload with a 200 status.
    #[error("GeoNames request failed: {message}")]
    GeoNames { message: String },

    #[error("GeoNames returned no populated places")]
    NoPlaces,

    #[error("Could not determine a location from the IP address: {reason}")]
    IpLookup { reason: String },

    #[error("Forecast sample has an out-of-range timestamp: {0}")]
    InvalidTimestamp(i64),

    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse upstream response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ForecastError {
    /// Map a non-success HTTP status from the weather endpoint to an error.
    pub(crate) fn from_weather_status(status: u16, location: &str) -> Self {
        match status {
            401 => ForecastError::Authentication,
            404 => ForecastError::LocationNotFound { location: location.to_string() },
            _ => ForecastError::Upstream { service: "openweather", status },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_status_401_is_authentication() {
        let err = ForecastError::from_weather_status(401, "London");
        assert!(matches!(err, ForecastError::Authentication));
        assert_eq!(err.to_string(), "Access denied. Please check your API key.");
    }

    #[test]
    fn weather_status_404_is_location_not_found() {
        let err = ForecastError::from_weather_status(404, "Bad Location 333");
        assert!(matches!(
            &err,
            ForecastError::LocationNotFound { location } if location == "Bad Location 333"
        ));
        assert_eq!(
            err.to_string(),
            "Sorry but I couldn't find that location. To make the search more precise, please put the \
             city's name, comma, 2-letter country code (ISO3166)."
        );
    }

    #[test]
    fn other_statuses_carry_the_code() {
        for status in [400, 429, 500, 503] {
            let err = ForecastError::from_weather_status(status, "London");
            assert!(matches!(err, ForecastError::Upstream { status: s, .. } if s == status));
            assert!(err.to_string().contains(&status.to_string()));
        }
    }
}
