mod camera_device;
mod image_picker;
mod plant_identification_service;

pub use camera_device::{CameraDevice, CameraStream};
pub use image_picker::ImagePicker;
pub use plant_identification_service::PlantIdentificationService;
