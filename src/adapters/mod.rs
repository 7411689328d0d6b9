mod gemini_identification_service;
mod nokhwa_camera_device;
mod rfd_image_picker;

pub use gemini_identification_service::GeminiIdentificationService;
pub use nokhwa_camera_device::NokhwaCameraDevice;
pub use rfd_image_picker::RfdImagePicker;
