use crate::error::NetworkError;
use async_trait::async_trait;
use model::records::record::Record;

/// Remote provider of breed records.
#[async_trait]
pub trait BreedSource: Send + Sync {
    /// Every breed the provider knows about.
    async fn fetch_all_breeds(&self) -> Result<Vec<Record>, NetworkError>;

    /// Image search results for one breed. Each result nests the breed
    /// record under `breeds`.
    async fn fetch_breed_image(&self, breed_id: &str) -> Result<Vec<Record>, NetworkError>;
}
