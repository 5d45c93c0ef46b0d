use crate::config::ImagesConfig;
use crate::http::HttpClient;
use serde::Deserialize;
use tracing::{debug, info, warn};

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Deserialize)]
struct Photo {
    src: PhotoSources,
}

#[derive(Deserialize)]
struct PhotoSources {
    large: String,
}

/// Collect up to `count` landscape photos of a destination from Pexels.
///
/// One query per configured keyword (`"{destination} {keyword}"`, one photo
/// each) until enough URLs are gathered. A failed query is logged and
/// skipped, and a missing API key yields no photos.
pub async fn fetch_destination_images(
    http: &HttpClient,
    config: &ImagesConfig,
    destination: &str,
    count: usize,
) -> Vec<String> {
    let api_key = config.api_key();
    if api_key.is_empty() {
        warn!("{} not set, skipping destination photos", config.api_key_env);
        return Vec::new();
    }

    let url = format!("{}/search", config.base_url.trim_end_matches('/'));
    let mut image_urls = Vec::with_capacity(count);

    for keyword in &config.keywords {
        if image_urls.len() >= count {
            break;
        }
        let query = format!("{destination} {keyword}");
        debug!(%query, "searching destination photos");

        let resp: SearchResponse = match http
            .get_json_with(
                &url,
                &[
                    ("query", query.as_str()),
                    ("per_page", "1"),
                    ("orientation", config.orientation.as_str()),
                ],
                &[("Authorization", api_key.as_str())],
            )
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!(%query, "photo search failed: {e}");
                continue;
            }
        };

        for photo in resp.photos {
            image_urls.push(photo.src.large);
            if image_urls.len() >= count {
                break;
            }
        }
    }

    info!(count = image_urls.len(), destination, "collected destination photos");
    image_urls
}
