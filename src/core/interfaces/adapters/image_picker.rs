use anyhow::Result;
use async_trait::async_trait;

use crate::core::models::PlantImage;

#[async_trait]
pub trait ImagePicker: Send + Sync {
    /// `Ok(None)` when the user dismisses the picker.
    async fn pick_image(&self) -> Result<Option<PlantImage>>;
}
