use crate::{error::NetworkError, source::BreedSource};
use async_trait::async_trait;
use model::records::record::Record;
use reqwest::{
    StatusCode,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://api.thecatapi.com/v1";
pub const BREEDS_ENDPOINT: &str = "/breeds";
pub const IMAGES_ENDPOINT: &str = "/images/search";
pub const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client for TheCatAPI.
#[derive(Clone)]
pub struct CatApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatApiClient {
    /// Builds a client that sends `api_key` (when given) with every request
    /// and gives up after `timeout`.
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, NetworkError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            let mut value = HeaderValue::from_str(key)
                .map_err(|_| NetworkError::transport("API key contains invalid header characters"))?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self::with_client(client, base_url))
    }

    /// Wraps a preconfigured client.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_records(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<Record>, NetworkError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {} {:?}", url, query);

        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;
        let status = response.status();

        // Anything but a plain 200 is treated as a failed request.
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(NetworkError::status(
                status.as_u16(),
                error_message(status, &body),
            ));
        }

        response
            .json::<Vec<Record>>()
            .await
            .map_err(|e| NetworkError::transport(format!("Unexpected response from {url}: {e}")))
    }
}

/// Prefers the API's JSON `message`, then the raw body, then the status text.
fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string));

    match from_json {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("Unexpected status")
            .to_string(),
    }
}

#[async_trait]
impl BreedSource for CatApiClient {
    async fn fetch_all_breeds(&self) -> Result<Vec<Record>, NetworkError> {
        let breeds = self.get_records(BREEDS_ENDPOINT, &[]).await?;
        info!("Fetched {} breeds from {}", breeds.len(), self.base_url);
        Ok(breeds)
    }

    async fn fetch_breed_image(&self, breed_id: &str) -> Result<Vec<Record>, NetworkError> {
        self.get_records(IMAGES_ENDPOINT, &[("breed_ids", breed_id)])
            .await
    }
}
