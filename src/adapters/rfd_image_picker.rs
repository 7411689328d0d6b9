use anyhow::Result;
use async_trait::async_trait;

use crate::core::interfaces::adapters::ImagePicker;
use crate::core::models::PlantImage;
use crate::global_constants::{LOG_TAG_FILE_PICKER, SELECTABLE_IMAGE_EXTENSIONS};

/// Native file dialog. Only the image filter restricts what can be chosen.
#[derive(Default)]
pub struct RfdImagePicker;

impl RfdImagePicker {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImagePicker for RfdImagePicker {
    async fn pick_image(&self) -> Result<Option<PlantImage>> {
        log::info!("{} Opening file dialog", LOG_TAG_FILE_PICKER);

        let Some(file_handle) = rfd::AsyncFileDialog::new()
            .set_title("Elegir imagen de la planta")
            .add_filter("Imágenes", SELECTABLE_IMAGE_EXTENSIONS)
            .pick_file()
            .await
        else {
            log::info!("{} No file selected", LOG_TAG_FILE_PICKER);
            return Ok(None);
        };

        let image = PlantImage::load_from_path(file_handle.path()).await?;
        log::info!("{} Loaded {:?}", LOG_TAG_FILE_PICKER, image);

        Ok(Some(image))
    }
}
