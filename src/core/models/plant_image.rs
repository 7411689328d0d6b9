use std::path::Path;

use anyhow::{Context, Result};
use base64::Engine;
use iced::widget::image;

use crate::core::models::CameraFrame;
use crate::global_constants::{
    CAPTURED_IMAGE_FILE_NAME, CAPTURED_IMAGE_MIME_TYPE, FALLBACK_MIME_TYPE, LOG_TAG_PLANT_IMAGE,
};

/// The image the user wants identified. Ephemeral: replaced wholesale on
/// every new selection or capture.
#[derive(Clone)]
pub struct PlantImage {
    pub file_name: String,
    pub mime_type: String,
    pub image_handle: image::Handle,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for PlantImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlantImage")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

impl PlantImage {
    pub fn build_from_bytes(file_name: String, mime_type: String, bytes: Vec<u8>) -> Self {
        log::debug!(
            "{} building image {} ({}, {} bytes)",
            LOG_TAG_PLANT_IMAGE,
            file_name,
            mime_type,
            bytes.len()
        );

        Self {
            file_name,
            mime_type,
            image_handle: image::Handle::from_bytes(bytes.clone()),
            bytes,
        }
    }

    pub fn build_from_selected_file(file_name: String, bytes: Vec<u8>) -> Self {
        let mime_type = detect_mime_type(&file_name, &bytes);
        Self::build_from_bytes(file_name, mime_type, bytes)
    }

    pub fn build_from_camera_frame(frame: &CameraFrame) -> Result<Self> {
        let png_bytes = frame.encode_png()?;
        Ok(Self::build_from_bytes(
            CAPTURED_IMAGE_FILE_NAME.to_string(),
            CAPTURED_IMAGE_MIME_TYPE.to_string(),
            png_bytes,
        ))
    }

    pub async fn load_from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read image file {:?}", path))?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Ok(Self::build_from_selected_file(file_name, bytes))
    }

    pub fn size_in_bytes(&self) -> usize {
        self.bytes.len()
    }

    pub fn encode_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

fn detect_mime_type(file_name: &str, bytes: &[u8]) -> String {
    if let Ok(format) = ::image::ImageFormat::from_path(file_name) {
        return format.to_mime_type().to_string();
    }

    match ::image::guess_format(bytes) {
        Ok(format) => format.to_mime_type().to_string(),
        Err(_) => {
            log::debug!(
                "{} Could not determine MIME type of {}, using fallback",
                LOG_TAG_PLANT_IMAGE,
                file_name
            );
            FALLBACK_MIME_TYPE.to_string()
        }
    }
}
