use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: crate::llm::Provider,
    /// Defaults to the provider's own default model.
    pub model: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: crate::llm::Provider::default(),
            model: None,
            max_tokens: default_max_tokens(),
            api_key_env: None,
            base_url: None,
        }
    }
}

/// Pexels image search.
#[derive(Debug, Deserialize)]
pub struct ImagesConfig {
    /// Inline key; takes precedence over `api_key_env`.
    pub api_key: Option<String>,
    #[serde(default = "default_pexels_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_pexels_url")]
    pub base_url: String,
    #[serde(default = "default_image_count")]
    pub count: usize,
    #[serde(default = "default_orientation")]
    pub orientation: String,
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
}

impl ImagesConfig {
    pub fn api_key(&self) -> String {
        resolve_api_key(self.api_key.as_deref(), &self.api_key_env)
    }
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_pexels_key_env(),
            base_url: default_pexels_url(),
            count: default_image_count(),
            orientation: default_orientation(),
            keywords: default_keywords(),
        }
    }
}

/// Weatherstack current-conditions lookup.
#[derive(Debug, Deserialize)]
pub struct WeatherConfig {
    /// Inline key; takes precedence over `api_key_env`.
    pub api_key: Option<String>,
    #[serde(default = "default_weatherstack_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_weatherstack_url")]
    pub base_url: String,
}

impl WeatherConfig {
    pub fn api_key(&self) -> String {
        resolve_api_key(self.api_key.as_deref(), &self.api_key_env)
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_weatherstack_key_env(),
            base_url: default_weatherstack_url(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GeocodingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_nominatim_url")]
    pub base_url: String,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_nominatim_url(),
        }
    }
}

/// Prompt parameters shared by the cost and itinerary prompts.
#[derive(Debug, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_home_country")]
    pub home_country: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            home_country: default_home_country(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// Defaults
fn default_max_tokens() -> u32 {
    8192
}
fn default_pexels_key_env() -> String {
    "PEXELS_API_KEY".into()
}
fn default_pexels_url() -> String {
    "https://api.pexels.com/v1".into()
}
fn default_image_count() -> usize {
    5
}
fn default_orientation() -> String {
    "landscape".into()
}
fn default_keywords() -> Vec<String> {
    [
        "fort",
        "palace",
        "landmark",
        "cityscape",
        "skyline",
        "architecture",
        "aerial view",
        "landscape",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
fn default_weatherstack_key_env() -> String {
    "WEATHERSTACK_API_KEY".into()
}
fn default_weatherstack_url() -> String {
    "http://api.weatherstack.com".into()
}
fn default_true() -> bool {
    true
}
fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org".into()
}
fn default_currency() -> String {
    "INR".into()
}
fn default_home_country() -> String {
    "India".into()
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8501
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::config(format!("Failed to parse config: {e}")))
    }

    /// Load the config file if present, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.images.count == 0 {
            return Err(Error::config("images.count must be at least 1"));
        }
        if self.images.keywords.is_empty() {
            return Err(Error::config("images.keywords must not be empty"));
        }
        if self.planner.currency.trim().is_empty() {
            return Err(Error::config("planner.currency must not be empty"));
        }
        Ok(())
    }
}

/// Inline key if set, else the environment variable. Unset yields an empty key.
fn resolve_api_key(inline: Option<&str>, env_var: &str) -> String {
    match inline {
        Some(key) if !key.is_empty() => key.to_string(),
        _ => std::env::var(env_var).unwrap_or_default(),
    }
}
