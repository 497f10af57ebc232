//! OpenWeather Lookup
//!
//! [`WeatherLookup`] backed by the OpenWeather current-weather endpoint.
//!
//! # OpenWeather API
//!
//! `GET {base_url}/data/2.5/weather?q={location}&appid={key}&units={units}`
//!
//! Success bodies carry `name`, `main.temp`, `main.temp_max`, `main.temp_min`
//! and the observation time `dt` (unix seconds). Failures carry `cod` and
//! `message`, e.g. `{"cod":"404","message":"city not found"}`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::traits::{validate_query, LookupError, WeatherLookup};
use crate::config::LookupConfig;
use crate::model::{Units, WeatherReport};

/// Path of the current-weather endpoint below the base URL
const WEATHER_PATH: &str = "/data/2.5/weather";

/// OpenWeather client
#[derive(Clone)]
pub struct OpenWeatherLookup {
    /// API key, checked at lookup time
    api_key: Option<String>,
    /// Scheme and host, without trailing slash
    base_url: String,
    /// Unit system requested
    units: Units,
    /// HTTP client
    http_client: reqwest::Client,
}

impl std::fmt::Debug for OpenWeatherLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherLookup")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("units", &self.units)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherLookup {
    /// Create a client
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Http`] if the HTTP client cannot be built.
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        units: Units,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            units,
            http_client,
        })
    }

    /// Create from the `[lookup]` configuration section
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &LookupConfig) -> Result<Self, LookupError> {
        Self::new(
            config.api_key.clone(),
            config.base_url.clone(),
            config.units,
            config.timeout,
        )
    }

    /// Create from environment variables only
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Http`] if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, LookupError> {
        Self::from_config(&LookupConfig::from_env())
    }

    /// Full endpoint URL (without query string)
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}{WEATHER_PATH}", self.base_url)
    }

    /// Whether an API key is present
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl WeatherLookup for OpenWeatherLookup {
    fn name(&self) -> &'static str {
        "OpenWeather"
    }

    async fn lookup(&self, query: &str) -> Result<WeatherReport, LookupError> {
        let location = validate_query(query)?;
        let api_key = self.api_key.as_deref().ok_or(LookupError::MissingApiKey)?;

        tracing::info!(location, units = self.units.as_query(), "Requesting current weather");

        let response = self
            .http_client
            .get(self.endpoint())
            .query(&[
                ("q", location),
                ("appid", api_key),
                ("units", self.units.as_query()),
            ])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        let result = parse_response(status, &body);

        match &result {
            Ok(report) => tracing::info!(location, name = %report.name, "Weather lookup succeeded"),
            Err(e) => tracing::warn!(location, error = %e, "Weather lookup failed"),
        }
        result
    }
}

// =============================================================================
// Response Parsing
// =============================================================================

#[derive(Debug, Deserialize)]
struct ApiBody {
    name: Option<String>,
    main: Option<ApiMain>,
    dt: Option<i64>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiMain {
    temp: f64,
    temp_max: f64,
    temp_min: f64,
}

/// Turn an HTTP status and body into a report or a lookup error
///
/// # Errors
///
/// Returns [`LookupError::Api`] for non-success statuses and
/// [`LookupError::Malformed`] when a success body lacks the weather fields.
pub fn parse_response(status: u16, body: &str) -> Result<WeatherReport, LookupError> {
    let parsed: Result<ApiBody, _> = serde_json::from_str(body);

    if !(200..300).contains(&status) {
        let message = parsed
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| "request rejected".to_string());
        return Err(LookupError::Api { status, message });
    }

    let body = parsed.map_err(|e| LookupError::Malformed(e.to_string()))?;
    let main = body
        .main
        .ok_or_else(|| LookupError::Malformed("missing 'main' section".to_string()))?;
    let name = body
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| LookupError::Malformed("missing 'name'".to_string()))?;

    let report = WeatherReport::new(name, main.temp, main.temp_max, main.temp_min);
    Ok(match body.dt.and_then(|dt| DateTime::<Utc>::from_timestamp(dt, 0)) {
        Some(observed_at) => report.with_observed_at(observed_at),
        None => report,
    })
}
