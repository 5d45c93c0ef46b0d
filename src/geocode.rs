use crate::config::GeocodingConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

impl Coordinates {
    pub fn map_url(&self) -> String {
        format!(
            "https://www.openstreetmap.org/?mlat={lat:.4}&mlon={lon:.4}#map=11/{lat:.4}/{lon:.4}",
            lat = self.latitude,
            lon = self.longitude
        )
    }
}

// Nominatim returns coordinates as strings.
#[derive(Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

/// Resolve a city name to coordinates. Any failure yields `None`.
pub async fn get_coordinates(
    http: &HttpClient,
    config: &GeocodingConfig,
    city: &str,
) -> Option<Coordinates> {
    if !config.enabled {
        return None;
    }
    match search(http, config, city).await {
        Ok(found) => found,
        Err(e) => {
            debug!(city, "geocoding failed: {e}");
            None
        }
    }
}

async fn search(
    http: &HttpClient,
    config: &GeocodingConfig,
    city: &str,
) -> Result<Option<Coordinates>> {
    let url = format!("{}/search", config.base_url.trim_end_matches('/'));
    let places: Vec<Place> = http
        .get_json_with(&url, &[("q", city), ("format", "json"), ("limit", "1")], &[])
        .await?;

    let Some(place) = places.into_iter().next() else {
        debug!(city, "no geocoding results");
        return Ok(None);
    };

    let latitude = place
        .lat
        .parse::<f64>()
        .map_err(|e| Error::parse(format!("latitude {:?}: {e}", place.lat)))?;
    let longitude = place
        .lon
        .parse::<f64>()
        .map_err(|e| Error::parse(format!("longitude {:?}: {e}", place.lon)))?;

    debug!(city, latitude, longitude, "resolved coordinates");
    Ok(Some(Coordinates {
        latitude,
        longitude,
        display_name: place.display_name,
    }))
}
