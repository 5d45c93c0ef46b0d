use crate::error::{Error, Result};
use reqwest::{Client, RequestBuilder, Response, header};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

const MAX_BACKOFF_MS: u64 = 30_000;
/// Error pages (Nominatim and Pexels answer with HTML) are cut to this many chars.
const ERROR_BODY_LIMIT: usize = 300;

/// Shared reqwest client. Connect and timeout failures are retried with
/// exponential backoff; every other outcome is returned on the first try.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
    base_delay_ms: u64,
}

impl HttpClient {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(180))
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::http(e.to_string()))?;

        Ok(Self {
            client,
            max_retries: 3,
            base_delay_ms: 1000,
        })
    }

    /// GET with query parameters (URL-encoded by reqwest) and extra headers.
    pub async fn get_text_with(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<String> {
        self.send(|| with_headers(self.client.get(url).query(query), headers))
            .await
    }

    pub async fn get_json_with<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<T> {
        let body = self.get_text_with(url, query, headers).await?;
        serde_json::from_str(&body).map_err(|e| Error::parse(format!("JSON parse: {e}")))
    }

    pub async fn post_json_raw(
        &self,
        url: &str,
        body: &str,
        headers: &[(&str, &str)],
    ) -> Result<String> {
        self.send(|| {
            let req = self
                .client
                .post(url)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.to_owned());
            with_headers(req, headers)
        })
        .await
    }

    async fn send<F>(&self, build: F) -> Result<String>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            match build().send().await {
                Ok(resp) => return read_body(resp).await,
                Err(e) if is_transient(&e) && attempt < self.max_retries => {
                    let delay = backoff(self.base_delay_ms, attempt);
                    attempt += 1;
                    warn!(attempt, delay_ms = delay.as_millis() as u64, "transient failure, will retry");
                    sleep(delay).await;
                }
                Err(e) => {
                    debug!(attempt, "request failed: {e}");
                    return Err(Error::http(e.without_url().to_string()));
                }
            }
        }
    }
}

fn with_headers(mut req: RequestBuilder, headers: &[(&str, &str)]) -> RequestBuilder {
    for (name, value) in headers {
        req = req.header(*name, *value);
    }
    req
}

fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect()
}

/// Delay before retry number `attempt + 1`: base, 2×base, 4×base, … capped.
fn backoff(base_ms: u64, attempt: u32) -> Duration {
    let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
    Duration::from_millis(base_ms.saturating_mul(factor).min(MAX_BACKOFF_MS))
}

async fn read_body(resp: Response) -> Result<String> {
    let status = resp.status();
    let platform = extract_domain(resp.url().as_str());

    if status.is_success() {
        return resp.text().await.map_err(|e| Error::http(e.to_string()));
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = resp
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        return Err(Error::RateLimit {
            platform,
            retry_after_secs,
        });
    }

    let body = resp.text().await.unwrap_or_default();
    Err(Error::api_with_status(
        platform,
        snippet(&body),
        status.as_u16(),
    ))
}

fn snippet(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(ERROR_BODY_LIMIT) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_string(),
    }
}

/// Host part of a URL; API keys passed as query parameters never reach error messages.
fn extract_domain(url: &str) -> String {
    url.split("//")
        .nth(1)
        .and_then(|s| s.split(['/', '?']).next())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_domain_strips_path_and_query() {
        assert_eq!(
            extract_domain("https://api.pexels.com/v1/search?query=x"),
            "api.pexels.com"
        );
        assert_eq!(
            extract_domain("http://api.weatherstack.com?access_key=secret"),
            "api.weatherstack.com"
        );
        assert_eq!(extract_domain("not a url"), "unknown");
    }

    #[test]
    fn backoff_doubles_up_to_cap() {
        assert_eq!(backoff(1000, 0), Duration::from_millis(1000));
        assert_eq!(backoff(1000, 1), Duration::from_millis(2000));
        assert_eq!(backoff(1000, 2), Duration::from_millis(4000));
        assert_eq!(backoff(1000, 10), Duration::from_millis(MAX_BACKOFF_MS));
        assert_eq!(backoff(1000, 200), Duration::from_millis(MAX_BACKOFF_MS));
    }

    #[test]
    fn long_error_bodies_are_cut() {
        assert_eq!(snippet("  short  "), "short");
        let page = "é".repeat(ERROR_BODY_LIMIT + 50);
        let cut = snippet(&page);
        assert_eq!(cut.chars().count(), ERROR_BODY_LIMIT + 1);
        assert!(cut.ends_with('…'));
    }
}
