use chrono::{DateTime, Duration, Local, Offset, TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    config::Config,
    error::ForecastError,
    model::{ForecastEntry, ForecastResult, UnitSystem, UnitsRequest},
};

pub const OPENWEATHER_FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

const SECONDS_PER_DAY: i64 = 86_400;

/// Client for the OpenWeather 5-day / 3-hour forecast endpoint.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl ForecastClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: OPENWEATHER_FORECAST_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Build a client with the API key stored in `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.openweather_api_key().ok_or_else(|| {
            anyhow::anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `willitrain configure` and enter your API key."
            )
        })?;

        Ok(Self::new(api_key.to_owned()))
    }

    /// Point the client at another endpoint, e.g. a local stub.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch the forecast for `location` and keep only today's samples.
    pub async fn fetch(
        &self,
        location: &str,
        units: UnitsRequest,
    ) -> Result<ForecastResult, ForecastError> {
        let units = units.resolve(&mut rand::thread_rng());
        let day_start = current_day_start(Local::now());

        self.fetch_day(location, units, day_start).await
    }

    /// Fetch the forecast for `location` in `units`, keeping the samples of
    /// the day starting at the UNIX timestamp `day_start`.
    pub async fn fetch_day(
        &self,
        location: &str,
        units: UnitSystem,
        day_start: i64,
    ) -> Result<ForecastResult, ForecastError> {
        info!(location, units = units.as_str(), "requesting forecast");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", location),
                ("units", units.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "forecast request rejected");
            return Err(ForecastError::from_weather_status(status.as_u16(), location));
        }

        let body = res.text().await?;
        let parsed: OwForecastResponse = serde_json::from_str(&body)?;

        let entries = filter_current_day(&parsed.list, day_start)?;
        debug!(
            received = parsed.list.len(),
            kept = entries.len(),
            day_start,
            "filtered forecast to the current day"
        );

        Ok(ForecastResult { entries, units })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwMain {
    pub temp: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwWeather {
    pub description: String,
}

/// One element of the forecast `list`.
#[derive(Debug, Clone, Deserialize)]
pub struct OwForecastSample {
    pub dt: i64,
    pub main: OwMain,
    #[serde(default)]
    pub weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastSample>,
}

/// UNIX timestamp of local midnight on the day of `now`.
///
/// When midnight falls into a DST gap this is the first valid instant of the
/// day: midnight read with the offset in effect just before the gap.
pub fn current_day_start<Tz: TimeZone>(now: DateTime<Tz>) -> i64 {
    let tz = now.timezone();
    let midnight = now.date_naive().and_time(chrono::NaiveTime::MIN);

    if let Some(start) = tz.from_local_datetime(&midnight).earliest() {
        return start.timestamp();
    }

    let before_gap = midnight - Duration::hours(1);
    let offset = tz
        .offset_from_local_datetime(&before_gap)
        .earliest()
        .map(|o| o.fix())
        .unwrap_or_else(|| now.offset().fix());

    midnight.and_utc().timestamp() - i64::from(offset.local_minus_utc())
}

/// Keep the samples with `day_start <= dt < day_start + 86400`, in order.
pub fn filter_current_day(
    samples: &[OwForecastSample],
    day_start: i64,
) -> Result<Vec<ForecastEntry>, ForecastError> {
    let day_end = day_start.saturating_add(SECONDS_PER_DAY);

    samples
        .iter()
        .filter(|s| (day_start..day_end).contains(&s.dt))
        .map(to_entry)
        .collect()
}

fn to_entry(sample: &OwForecastSample) -> Result<ForecastEntry, ForecastError> {
    let time = DateTime::<Utc>::from_timestamp(sample.dt, 0)
        .ok_or(ForecastError::InvalidTimestamp(sample.dt))?;

    let description = sample
        .weather
        .first()
        .map(|w| w.description.clone())
        .unwrap_or_else(|| "unknown".to_string());

    Ok(ForecastEntry {
        time_of_day: time.format("%H:%M").to_string(),
        temperature: sample.main.temp.round() as i32,
        description,
    })
}
