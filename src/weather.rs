use crate::config::WeatherConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const UNAVAILABLE_MESSAGE: &str = "Weather data not available";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub description: String,
    /// °C
    pub temperature: f64,
    pub feels_like: f64,
    /// Percent.
    pub humidity: f64,
    /// km/h
    pub wind_speed: f64,
    /// Icon URL; empty when the API sent none.
    pub icon: String,
}

impl WeatherReport {
    /// One-line summary for prompts.
    pub fn summary(&self) -> String {
        format!(
            "{}, {}°C (feels like {}°C), humidity {}%, wind {} km/h",
            self.description, self.temperature, self.feels_like, self.humidity, self.wind_speed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum WeatherOutcome {
    Available(WeatherReport),
    Unavailable(String),
}

impl WeatherOutcome {
    pub fn summary(&self) -> String {
        match self {
            Self::Available(report) => report.summary(),
            Self::Unavailable(_) => "unavailable".into(),
        }
    }
}

// Weatherstack answers errors with HTTP 200 and an `error` object.
#[derive(Deserialize)]
struct CurrentResponse {
    current: Option<Current>,
    error: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct Current {
    temperature: f64,
    #[serde(default)]
    weather_descriptions: Vec<String>,
    #[serde(default)]
    weather_icons: Vec<String>,
    feelslike: f64,
    humidity: f64,
    wind_speed: f64,
}

/// Current weather for a city. Never fails: problems become `Unavailable`
/// with a message suitable for display.
pub async fn get_weather_info(http: &HttpClient, config: &WeatherConfig, city: &str) -> WeatherOutcome {
    match fetch_current(http, config, city).await {
        Ok(Some(report)) => {
            info!(city, temperature = report.temperature, "weather fetched");
            WeatherOutcome::Available(report)
        }
        Ok(None) => {
            warn!(city, "weather API returned an error body");
            WeatherOutcome::Unavailable(UNAVAILABLE_MESSAGE.into())
        }
        Err(e) => {
            warn!(city, "weather lookup failed: {e}");
            WeatherOutcome::Unavailable(format!("Something went wrong: {e}"))
        }
    }
}

async fn fetch_current(
    http: &HttpClient,
    config: &WeatherConfig,
    city: &str,
) -> Result<Option<WeatherReport>> {
    let api_key = config.api_key();
    if api_key.is_empty() {
        return Err(Error::config(format!("{} not set", config.api_key_env)));
    }

    let url = format!("{}/current", config.base_url.trim_end_matches('/'));
    let resp: CurrentResponse = http
        .get_json_with(&url, &[("access_key", api_key.as_str()), ("query", city)], &[])
        .await?;

    if resp.error.is_some() {
        return Ok(None);
    }
    let current = resp
        .current
        .ok_or_else(|| Error::parse("weather response has no `current` block"))?;

    Ok(Some(WeatherReport {
        description: current
            .weather_descriptions
            .into_iter()
            .next()
            .unwrap_or_default(),
        temperature: current.temperature,
        feels_like: current.feelslike,
        humidity: current.humidity,
        wind_speed: current.wind_speed,
        icon: current.weather_icons.into_iter().next().unwrap_or_default(),
    }))
}
