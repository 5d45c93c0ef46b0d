// Generation flow: photos → weather → coordinates → cost table → itinerary.

use crate::config::Config;
use crate::error::Result;
use crate::geocode::{self, Coordinates};
use crate::http::HttpClient;
use crate::images;
use crate::llm::LlmClient;
use crate::prompts;
use crate::trip::TripRequest;
use crate::weather::{self, WeatherOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Everything a trip page is rendered from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripPlan {
    pub request: TripRequest,
    pub image_urls: Vec<String>,
    pub weather: WeatherOutcome,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    pub cost_estimate: String,
    pub itinerary: String,
    pub generated_at: DateTime<Utc>,
}

/// Clients and settings shared by every generation.
pub struct Services {
    pub config: Config,
    pub http: HttpClient,
    pub llm: LlmClient,
}

impl Services {
    pub fn new(config: Config, llm: LlmClient) -> Result<Self> {
        let http = HttpClient::new(concat!("trip-planner/", env!("CARGO_PKG_VERSION")))?;
        Ok(Self { config, http, llm })
    }
}

/// Run the full generation flow for one request. Calls are made one after
/// another; weather is fetched once and reused for the prompt and the page.
pub async fn generate_trip_plan(services: &Services, request: &TripRequest) -> Result<TripPlan> {
    request.validate()?;
    let cfg = &services.config;
    let destination = request.destination.as_str();
    info!(destination, days = request.days, style = %request.travel_style, "generating trip plan");

    let image_urls =
        images::fetch_destination_images(&services.http, &cfg.images, destination, cfg.images.count)
            .await;
    if image_urls.is_empty() {
        warn!(destination, "no destination photos found");
    }

    let weather = weather::get_weather_info(&services.http, &cfg.weather, destination).await;
    let coordinates = geocode::get_coordinates(&services.http, &cfg.geocoding, destination).await;

    let cost_estimate = prompts::get_cost_estimates(&services.llm, request, &cfg.planner).await?;
    let itinerary = prompts::generate_itinerary(
        &services.llm,
        request,
        &weather.summary(),
        &cost_estimate,
        &cfg.planner,
    )
    .await?;

    info!(destination, images = image_urls.len(), "trip plan ready");
    Ok(TripPlan {
        request: request.clone(),
        image_urls,
        weather,
        coordinates,
        cost_estimate,
        itinerary,
        generated_at: Utc::now(),
    })
}
