use crate::{error::NetworkError, source::BreedSource};
use async_trait::async_trait;
use model::records::record::Record;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

/// Serves breeds from a local JSON dump of the `/breeds` endpoint.
///
/// Image lookups are answered from the breed's own `image` object, shaped
/// like an `/images/search` result.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read(&self) -> Result<Vec<Record>, NetworkError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            NetworkError::transport(format!("Failed to read {}: {e}", self.path.display()))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            NetworkError::transport(format!(
                "Invalid breed file {}: {e}",
                self.path.display()
            ))
        })
    }
}

#[async_trait]
impl BreedSource for JsonFileSource {
    async fn fetch_all_breeds(&self) -> Result<Vec<Record>, NetworkError> {
        let breeds = self.read().await?;
        info!("Loaded {} breeds from {}", breeds.len(), self.path.display());
        Ok(breeds)
    }

    async fn fetch_breed_image(&self, breed_id: &str) -> Result<Vec<Record>, NetworkError> {
        let breeds = self.read().await?;

        Ok(breeds
            .into_iter()
            .filter(|breed| breed.id() == Some(breed_id))
            .map(|breed| {
                let image = breed.get("image").cloned().unwrap_or(json!({}));
                Record::new()
                    .with("id", image.get("id").cloned().unwrap_or(json!(breed_id)))
                    .with("url", image.get("url").cloned().unwrap_or(json!(null)))
                    .with("breeds", json!([breed.into_map()]))
            })
            .collect())
    }
}
