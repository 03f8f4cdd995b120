use async_trait::async_trait;
use reqwest::{Client, header::USER_AGENT};
use serde::Deserialize;
use tracing::info;

use crate::error::ForecastError;

use super::LocationSource;

pub const IPAPI_URL: &str = "https://ipapi.co/json/";

/// Derives a `City,CC` location from the caller's public IP address.
#[derive(Debug, Clone)]
pub struct IpLocator {
    base_url: String,
    http: Client,
}

impl Default for IpLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IpLocator {
    pub fn new() -> Self {
        Self { base_url: IPAPI_URL.to_string(), http: Client::new() }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Default, Deserialize)]
struct IpApiResponse {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
    /// Set together with `reason` on rate limiting or reserved addresses.
    #[serde(default)]
    error: bool,
    #[serde(default)]
    reason: Option<String>,
}

/// `City,CC`, or just `City` when the country is unknown.
fn location_name(resp: IpApiResponse) -> Option<String> {
    let city = resp.city.filter(|c| !c.is_empty())?;

    match resp.country_code.filter(|c| !c.is_empty()) {
        Some(cc) => Some(format!("{city},{cc}")),
        None => Some(city),
    }
}

#[async_trait]
impl LocationSource for IpLocator {
    async fn locate(&self) -> Result<String, ForecastError> {
        info!("looking up location from IP address");

        let res = self
            .http
            .get(&self.base_url)
            .header(USER_AGENT, concat!("willitrain/", env!("CARGO_PKG_VERSION")))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(ForecastError::Upstream { service: "ipapi", status: status.as_u16() });
        }

        let body = res.text().await?;
        let parsed: IpApiResponse = serde_json::from_str(&body)?;

        if parsed.error {
            let reason = parsed.reason.unwrap_or_else(|| "unknown error".to_string());
            return Err(ForecastError::IpLookup { reason });
        }

        location_name(parsed)
            .ok_or_else(|| ForecastError::IpLookup { reason: "no city in response".to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_with_country_code() {
        let resp: IpApiResponse = serde_json::from_str(
            r#"{"ip": "1.2.3.4", "city": "Cluj-Napoca", "region": "Cluj", "country_code": "RO"}"#,
        )
        .unwrap();

        assert_eq!(location_name(resp).as_deref(), Some("Cluj-Napoca,RO"));
    }

    #[test]
    fn city_without_country() {
        let resp = IpApiResponse { city: Some("Oslo".into()), ..Default::default() };
        assert_eq!(location_name(resp).as_deref(), Some("Oslo"));
    }

    #[test]
    fn no_city_means_no_location() {
        assert_eq!(location_name(IpApiResponse::default()), None);

        let resp = IpApiResponse {
            city: Some(String::new()),
            country_code: Some("RO".into()),
            ..Default::default()
        };
        assert_eq!(location_name(resp), None);
    }

    #[test]
    fn error_payload_parses() {
        let resp: IpApiResponse =
            serde_json::from_str(r#"{"error": true, "reason": "RateLimited"}"#).unwrap();

        assert!(resp.error);
        assert_eq!(resp.reason.as_deref(), Some("RateLimited"));
    }
}
