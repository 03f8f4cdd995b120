use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{config::Config, error::ForecastError};

use super::LocationSource;

pub const GEONAMES_SEARCH_URL: &str = "http://api.geonames.org/searchJSON";

/// Feature class "P": cities, villages and other populated places.
const POPULATED_PLACES: &str = "P";
const MAX_ROWS: &str = "1000";

/// Picks a random populated place through the GeoNames search API.
#[derive(Debug, Clone)]
pub struct RandomCityPicker {
    username: String,
    base_url: String,
    http: Client,
}

impl RandomCityPicker {
    pub fn new(username: String) -> Self {
        Self {
            username,
            base_url: GEONAMES_SEARCH_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let username = config.geonames_username().ok_or_else(|| {
            anyhow::anyhow!(
                "No GeoNames username configured, which --random-location needs.\n\
                 Hint: run `willitrain configure` and enter your GeoNames username."
            )
        })?;

        Ok(Self::new(username.to_owned()))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch up to 1000 populated places.
    pub async fn fetch_places(&self) -> Result<Vec<String>, ForecastError> {
        info!("requesting populated places from GeoNames");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("username", self.username.as_str()),
                ("featureClass", POPULATED_PLACES),
                ("maxRows", MAX_ROWS),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(ForecastError::Upstream { service: "geonames", status: status.as_u16() });
        }

        let body = res.text().await?;
        parse_places(&body)
    }
}

#[derive(Debug, Deserialize)]
struct GnPlace {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GnStatus {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GnSearchResponse {
    #[serde(default)]
    geonames: Vec<GnPlace>,
    status: Option<GnStatus>,
}

fn parse_places(body: &str) -> Result<Vec<String>, ForecastError> {
    let parsed: GnSearchResponse = serde_json::from_str(body)?;

    if let Some(status) = parsed.status {
        return Err(ForecastError::GeoNames { message: status.message });
    }

    Ok(parsed.geonames.into_iter().map(|p| p.name).collect())
}

#[async_trait]
impl LocationSource for RandomCityPicker {
    async fn locate(&self) -> Result<String, ForecastError> {
        let places = self.fetch_places().await?;
        debug!(count = places.len(), "received populated places");

        places.choose(&mut rand::thread_rng()).cloned().ok_or(ForecastError::NoPlaces)
    }
}
