mod camera_frame;
mod identification;
mod plant_image;
mod user_settings;

pub use camera_frame::CameraFrame;
pub use identification::{IdentificationOutcome, WorkflowState};
pub use plant_image::PlantImage;
pub use user_settings::{DonationPromptStyle, ThemeMode, UserSettings};
