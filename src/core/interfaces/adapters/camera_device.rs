use anyhow::Result;

use crate::core::models::CameraFrame;

pub trait CameraDevice: Send + Sync {
    fn open_stream(&self) -> Result<Box<dyn CameraStream>>;
}

/// A live camera stream. Owns the device until `stop` is called or it is dropped.
pub trait CameraStream: Send {
    /// Most recent frame since the last poll, if any. Errors once the device has failed.
    fn poll_latest_frame(&mut self) -> Result<Option<CameraFrame>>;

    fn stop(&mut self);
}
