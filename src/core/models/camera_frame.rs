use anyhow::{Context, Result};
use iced::widget::image;

use crate::global_constants::LOG_TAG_CAMERA_FRAME;

#[derive(Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    raw_rgba_data: Vec<u8>,
}

impl std::fmt::Debug for CameraFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl CameraFrame {
    pub fn build_from_raw_data(width_pixels: u32, height_pixels: u32, raw_rgba_data: Vec<u8>) -> Self {
        Self {
            width: width_pixels,
            height: height_pixels,
            raw_rgba_data,
        }
    }

    pub fn build_from_rgb_image(rgb_image: ::image::RgbImage) -> Self {
        let rgba_image = ::image::DynamicImage::ImageRgb8(rgb_image).to_rgba8();
        let (width, height) = rgba_image.dimensions();
        Self::build_from_raw_data(width, height, rgba_image.into_raw())
    }

    pub fn to_image_handle(&self) -> image::Handle {
        image::Handle::from_rgba(self.width, self.height, self.raw_rgba_data.clone())
    }

    /// Freezes the frame into PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        if self.width == 0 || self.height == 0 {
            anyhow::bail!("Cannot encode an empty camera frame");
        }

        let rgba_image =
            ::image::RgbaImage::from_raw(self.width, self.height, self.raw_rgba_data.clone())
                .ok_or_else(|| anyhow::anyhow!("Frame data does not match its dimensions"))?;

        let mut encoded = std::io::Cursor::new(Vec::new());
        ::image::DynamicImage::ImageRgba8(rgba_image)
            .write_to(&mut encoded, ::image::ImageFormat::Png)
            .context("Failed to encode camera frame as PNG")?;

        log::debug!(
            "{} Encoded {}x{} frame into {} PNG bytes",
            LOG_TAG_CAMERA_FRAME,
            self.width,
            self.height,
            encoded.get_ref().len()
        );

        Ok(encoded.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_from_rgb_image_expands_to_rgba() {
        let rgb_image = ::image::RgbImage::from_pixel(4, 3, ::image::Rgb([10, 20, 30]));

        let frame = CameraFrame::build_from_rgb_image(rgb_image);

        assert_eq!(frame.width, 4);
        assert_eq!(frame.height, 3);
        assert_eq!(frame.raw_rgba_data.len(), 4 * 3 * 4);
        assert_eq!(&frame.raw_rgba_data[0..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_encode_png_produces_decodable_png() {
        let frame = CameraFrame::build_from_raw_data(2, 2, vec![200u8; 2 * 2 * 4]);

        let png_bytes = frame.encode_png().unwrap();

        assert_eq!(
            ::image::guess_format(&png_bytes).unwrap(),
            ::image::ImageFormat::Png
        );
        let decoded = ::image::load_from_memory(&png_bytes).unwrap();
        assert_eq!(decoded.width(), 2);
        assert_eq!(decoded.height(), 2);
    }

    #[test]
    fn test_encode_png_rejects_mismatched_data() {
        let frame = CameraFrame::build_from_raw_data(10, 10, vec![0u8; 12]);

        assert!(frame.encode_png().is_err());
    }

    #[test]
    fn test_encode_png_rejects_empty_frame() {
        let frame = CameraFrame::build_from_raw_data(0, 0, Vec::new());

        assert!(frame.encode_png().is_err());
    }
}
