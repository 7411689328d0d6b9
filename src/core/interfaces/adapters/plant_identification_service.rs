use anyhow::Result;
use async_trait::async_trait;

use crate::core::models::PlantImage;

#[async_trait]
pub trait PlantIdentificationService: Send + Sync {
    /// `Ok(None)` means the service answered without any text payload.
    async fn identify_plant(&self, image: &PlantImage) -> Result<Option<String>>;
}
