use anyhow::Result;
use iced::widget::image;

use crate::core::interfaces::adapters::{CameraDevice, CameraStream};
use crate::core::models::{CameraFrame, PlantImage};
use crate::global_constants::LOG_TAG_CAMERA;

/// Live camera preview that ends in at most one captured image.
#[derive(Default)]
pub struct CaptureSession {
    stream: Option<Box<dyn CameraStream>>,
    latest_frame: Option<CameraFrame>,
    preview_handle: Option<image::Handle>,
}

impl CaptureSession {
    pub fn is_capturing(&self) -> bool {
        self.stream.is_some()
    }

    /// Built once per received frame so redraws reuse the same texture.
    pub fn preview_handle(&self) -> Option<&image::Handle> {
        self.preview_handle.as_ref()
    }

    /// Returns whether the preview is running. Access failures are logged
    /// and leave the session untouched.
    pub fn start(&mut self, camera_device: &dyn CameraDevice) -> bool {
        if self.is_capturing() {
            log::debug!("{} Camera already streaming", LOG_TAG_CAMERA);
            return true;
        }

        match camera_device.open_stream() {
            Ok(stream) => {
                log::info!("{} Camera stream opened", LOG_TAG_CAMERA);
                self.stream = Some(stream);
                self.latest_frame = None;
                self.preview_handle = None;
                true
            }
            Err(e) => {
                log::error!("{} Error accessing the camera: {:#}", LOG_TAG_CAMERA, e);
                false
            }
        }
    }

    /// Pulls the newest frame into the preview. A failed stream is released
    /// and the session falls back to not capturing.
    pub fn refresh_preview(&mut self) {
        let Some(stream) = self.stream.as_mut() else {
            return;
        };

        match stream.poll_latest_frame() {
            Ok(Some(frame)) => {
                self.preview_handle = Some(frame.to_image_handle());
                self.latest_frame = Some(frame);
            }
            Ok(None) => {}
            Err(e) => {
                log::error!("{} Camera stream failed: {:#}", LOG_TAG_CAMERA, e);
                self.release();
            }
        }
    }

    /// Freezes the latest frame and releases the camera. `Ok(None)` while no
    /// frame has arrived yet; the stream keeps running in that case.
    pub fn capture_photo(&mut self) -> Result<Option<PlantImage>> {
        if !self.is_capturing() {
            log::warn!("{} Capture requested without an active stream", LOG_TAG_CAMERA);
            return Ok(None);
        }

        self.refresh_preview();

        let Some(frame) = self.latest_frame.as_ref() else {
            log::warn!("{} No frame available yet, capture skipped", LOG_TAG_CAMERA);
            return Ok(None);
        };

        let captured = PlantImage::build_from_camera_frame(frame);
        self.release();

        let image = captured?;
        log::info!("{} Photo captured: {:?}", LOG_TAG_CAMERA, image);
        Ok(Some(image))
    }

    pub fn cancel(&mut self) {
        log::info!("{} Camera preview cancelled", LOG_TAG_CAMERA);
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            log::info!("{} Camera stream stopped", LOG_TAG_CAMERA);
        }
        self.latest_frame = None;
        self.preview_handle = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct MockCameraStream {
        frames: VecDeque<Result<Option<CameraFrame>>>,
        stop_count: Arc<AtomicUsize>,
    }

    impl CameraStream for MockCameraStream {
        fn poll_latest_frame(&mut self) -> Result<Option<CameraFrame>> {
            self.frames.pop_front().unwrap_or(Ok(None))
        }

        fn stop(&mut self) {
            self.stop_count.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct MockCameraDevice {
        frames: Mutex<Option<Vec<Result<Option<CameraFrame>>>>>,
        stop_count: Arc<AtomicUsize>,
        deny_access: bool,
    }

    impl MockCameraDevice {
        fn with_frames(frames: Vec<Result<Option<CameraFrame>>>) -> Self {
            Self {
                frames: Mutex::new(Some(frames)),
                stop_count: Arc::new(AtomicUsize::new(0)),
                deny_access: false,
            }
        }

        fn denying_access() -> Self {
            Self {
                deny_access: true,
                ..Self::with_frames(Vec::new())
            }
        }

        fn stop_count(&self) -> usize {
            self.stop_count.load(Ordering::SeqCst)
        }
    }

    impl CameraDevice for MockCameraDevice {
        fn open_stream(&self) -> Result<Box<dyn CameraStream>> {
            if self.deny_access {
                anyhow::bail!("Permission denied");
            }
            let frames = self.frames.lock().unwrap().take().unwrap_or_default();
            Ok(Box::new(MockCameraStream {
                frames: frames.into(),
                stop_count: Arc::clone(&self.stop_count),
            }))
        }
    }

    fn create_test_frame() -> CameraFrame {
        CameraFrame::build_from_raw_data(4, 4, vec![90u8; 4 * 4 * 4])
    }

    #[test]
    fn test_denied_camera_leaves_session_idle() {
        let device = MockCameraDevice::denying_access();
        let mut session = CaptureSession::default();

        let started = session.start(&device);

        assert!(!started);
        assert!(!session.is_capturing());
        assert!(session.preview_handle().is_none());
    }

    #[test]
    fn test_capture_stops_stream_and_yields_one_image() {
        let device = MockCameraDevice::with_frames(vec![Ok(Some(create_test_frame()))]);
        let mut session = CaptureSession::default();
        assert!(session.start(&device));

        session.refresh_preview();
        let image = session.capture_photo().unwrap();

        let image = image.expect("capture should produce an image");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.file_name, "captured.png");
        assert!(!session.is_capturing());
        assert_eq!(device.stop_count(), 1);
    }

    #[test]
    fn test_capture_before_first_frame_keeps_streaming() {
        let device = MockCameraDevice::with_frames(vec![Ok(None)]);
        let mut session = CaptureSession::default();
        session.start(&device);

        let image = session.capture_photo().unwrap();

        assert!(image.is_none());
        assert!(session.is_capturing());
        assert_eq!(device.stop_count(), 0);
    }

    #[test]
    fn test_second_capture_produces_nothing() {
        let device = MockCameraDevice::with_frames(vec![Ok(Some(create_test_frame()))]);
        let mut session = CaptureSession::default();
        session.start(&device);

        let first = session.capture_photo().unwrap();
        let second = session.capture_photo().unwrap();

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(device.stop_count(), 1);
    }

    #[test]
    fn test_preview_handle_is_reused_until_a_new_frame_arrives() {
        let device = MockCameraDevice::with_frames(vec![
            Ok(Some(create_test_frame())),
            Ok(None),
            Ok(Some(create_test_frame())),
        ]);
        let mut session = CaptureSession::default();
        session.start(&device);
        assert!(session.preview_handle().is_none());

        session.refresh_preview();
        let first_handle = session.preview_handle().cloned().unwrap();

        session.refresh_preview();
        assert_eq!(session.preview_handle().unwrap().id(), first_handle.id());

        session.refresh_preview();
        assert_ne!(session.preview_handle().unwrap().id(), first_handle.id());
    }

    #[test]
    fn test_stream_failure_releases_camera() {
        let device = MockCameraDevice::with_frames(vec![Err(anyhow::anyhow!("device unplugged"))]);
        let mut session = CaptureSession::default();
        session.start(&device);

        session.refresh_preview();

        assert!(!session.is_capturing());
        assert_eq!(device.stop_count(), 1);
    }

    #[test]
    fn test_cancel_releases_camera_without_image() {
        let device = MockCameraDevice::with_frames(vec![Ok(Some(create_test_frame()))]);
        let mut session = CaptureSession::default();
        session.start(&device);
        session.refresh_preview();

        session.cancel();

        assert!(!session.is_capturing());
        assert!(session.preview_handle().is_none());
        assert_eq!(device.stop_count(), 1);
    }
}
