// Local stand-ins for Pexels, Weatherstack, Nominatim and the LLM providers.
#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use trip_planner::config::Config;
use trip_planner::llm::{LlmClient, Provider};
use trip_planner::planner::Services;

pub const API_KEY: &str = "test-key";

pub const COST_TABLE: &str = "\
| Category | Cost (INR) | Notes |
|----------|------------|-------|
| Flight (round trip) | INR 12000 | Budget airline |
| **Total Estimate** | INR 40000 | For 2 days total |
";

pub const ITINERARY: &str = "\
Welcome to **Goa**!
### Day 1: Arrival
- Check in near the beach
- Watch the sunset
### Day 2: Old Goa
* Visit the museum
";

#[derive(Clone, Default)]
pub struct Hits {
    pub photos: Arc<AtomicUsize>,
    pub llm: Arc<AtomicUsize>,
}

impl Hits {
    pub fn photos(&self) -> usize {
        self.photos.load(Ordering::SeqCst)
    }
    pub fn llm(&self) -> usize {
        self.llm.load(Ordering::SeqCst)
    }
}

pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn pexels_search(
    State(hits): State<Hits>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    hits.photos.fetch_add(1, Ordering::SeqCst);
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let query = params.get("query").cloned().unwrap_or_default();
    if query.ends_with("palace") {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    assert_eq!(params.get("per_page").map(String::as_str), Some("1"));
    assert_eq!(params.get("orientation").map(String::as_str), Some("landscape"));
    Ok(Json(json!({
        "photos": [{ "src": { "large": format!("https://images.test/{}.jpg", query.replace(' ', "_")) } }]
    })))
}

async fn weatherstack_current(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    if params.get("access_key").map(String::as_str) != Some(API_KEY) {
        return Json(json!({ "success": false, "error": { "code": 101, "type": "invalid_access_key" } }));
    }
    if params.get("query").map(String::as_str) == Some("Atlantis") {
        return Json(json!({ "success": false, "error": { "code": 615, "type": "request_failed" } }));
    }
    Json(json!({
        "current": {
            "temperature": 31,
            "weather_descriptions": ["Partly cloudy"],
            "weather_icons": ["https://icons.test/cloud.png"],
            "feelslike": 35,
            "humidity": 70,
            "wind_speed": 11
        }
    }))
}

async fn nominatim_search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    if params.get("q").map(String::as_str) == Some("Atlantis") {
        return Json(json!([]));
    }
    Json(json!([{ "lat": "15.4909", "lon": "73.8278", "display_name": "Goa, India" }]))
}

async fn gemini_generate(
    State(hits): State<Hits>,
    Path(action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    hits.llm.fetch_add(1, Ordering::SeqCst);
    if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
        return Err(StatusCode::FORBIDDEN);
    }
    if action.starts_with("broken") {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    if action.starts_with("blocked") {
        return Ok(Json(json!({ "promptFeedback": { "blockReason": "SAFETY" } })));
    }
    let prompt = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default();
    let text = if prompt.contains("Estimate the following costs") {
        COST_TABLE
    } else {
        ITINERARY
    };
    Ok(Json(json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    })))
}

/// Echoes the system prompt back so callers can see it arrived as `system`.
async fn anthropic_messages(
    State(hits): State<Hits>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    hits.llm.fetch_add(1, Ordering::SeqCst);
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    if headers.get("anthropic-version").is_none() {
        return Err(StatusCode::BAD_REQUEST);
    }
    assert_eq!(body["messages"][0]["role"], "user");
    let system = body["system"].as_str().unwrap_or_default();
    if system == "silent" {
        return Ok(Json(json!({ "content": [] })));
    }
    Ok(Json(json!({
        "content": [
            { "type": "text", "text": format!("A:{system}") },
            { "type": "text", "text": body["messages"][0]["content"] }
        ]
    })))
}

/// Echoes the first message's role and the model name.
async fn chat_completions(
    State(hits): State<Hits>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    hits.llm.fetch_add(1, Ordering::SeqCst);
    let expected = format!("Bearer {API_KEY}");
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let model = body["model"].as_str().unwrap_or_default();
    if model == "no-choices" {
        return Ok(Json(json!({ "choices": [] })));
    }
    assert_eq!(body["messages"][1]["role"], "user");
    let role = body["messages"][0]["role"].as_str().unwrap_or_default();
    Ok(Json(json!({
        "choices": [{ "message": { "role": "assistant", "content": format!("O:{role}:{model}") } }]
    })))
}

/// One server answering for every API, each under its own prefix.
pub async fn spawn_apis() -> (String, Hits) {
    let hits = Hits::default();
    let app = Router::new()
        .route("/pexels/search", get(pexels_search))
        .route("/weatherstack/current", get(weatherstack_current))
        .route("/nominatim/search", get(nominatim_search))
        .route("/gemini/models/{action}", post(gemini_generate))
        .route("/anthropic/messages", post(anthropic_messages))
        .route("/openai/chat/completions", post(chat_completions))
        .with_state(hits.clone());
    (spawn(app).await, hits)
}

pub fn config_for(base: &str) -> Config {
    let mut config = Config::default();
    config.images.base_url = format!("{base}/pexels");
    config.images.api_key = Some(API_KEY.into());
    config.weather.base_url = format!("{base}/weatherstack");
    config.weather.api_key = Some(API_KEY.into());
    config.geocoding.base_url = format!("{base}/nominatim");
    config
}

pub fn services_for(base: &str, model: &str) -> Services {
    let llm = LlmClient::new(
        Provider::Gemini,
        API_KEY.into(),
        model.into(),
        1024,
        Some(format!("{base}/gemini")),
    )
    .unwrap();
    Services::new(config_for(base), llm).unwrap()
}

pub fn llm_for(base: &str, provider: Provider, model: &str) -> LlmClient {
    let prefix = match provider {
        Provider::Gemini => "gemini",
        Provider::Anthropic => "anthropic",
        Provider::OpenRouter | Provider::OpenAi => "openai",
    };
    LlmClient::new(
        provider,
        API_KEY.into(),
        model.into(),
        256,
        Some(format!("{base}/{prefix}")),
    )
    .unwrap()
}
