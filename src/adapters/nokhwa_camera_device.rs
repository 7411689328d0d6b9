use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    ApiBackend, CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType,
    Resolution,
};
use nokhwa::{Camera, NokhwaError};

use crate::core::interfaces::adapters::{CameraDevice, CameraStream};
use crate::core::models::CameraFrame;
use crate::global_constants::{
    CAMERA_FRAME_CHANNEL_CAPACITY, CAMERA_REQUESTED_FPS, CAMERA_REQUESTED_HEIGHT,
    CAMERA_REQUESTED_WIDTH, LOG_TAG_CAMERA, PREFERRED_CAMERA_KEYWORDS,
};

#[derive(Debug)]
enum CameraThreadMsg {
    Frame(CameraFrame),
    Error(String),
}

pub struct NokhwaCameraDevice {
    configured_index: Option<u32>,
}

impl NokhwaCameraDevice {
    pub fn initialize(configured_index: Option<u32>) -> Self {
        log::debug!(
            "{} initializing nokhwa camera device, configured index: {:?}",
            LOG_TAG_CAMERA,
            configured_index
        );
        Self { configured_index }
    }

    fn resolve_camera_index(&self) -> Result<CameraIndex> {
        if let Some(index) = self.configured_index {
            return Ok(CameraIndex::Index(index));
        }

        let cameras = nokhwa::query(ApiBackend::Auto).context("Failed to list cameras")?;
        let names: Vec<String> = cameras.iter().map(|info| info.human_name()).collect();
        log::debug!("{} available cameras: {:?}", LOG_TAG_CAMERA, names);

        let position = choose_preferred_camera(&names)
            .ok_or_else(|| anyhow::anyhow!("No camera devices found"))?;
        let chosen = &cameras[position];

        log::info!("{} using camera {}", LOG_TAG_CAMERA, chosen.human_name());
        Ok(chosen.index().clone())
    }
}

impl CameraDevice for NokhwaCameraDevice {
    fn open_stream(&self) -> Result<Box<dyn CameraStream>> {
        let index = self.resolve_camera_index()?;

        let (msg_sender, msg_receiver) = crossbeam_channel::bounded(CAMERA_FRAME_CHANNEL_CAPACITY);
        let stop_signal = Arc::new(AtomicBool::new(false));
        let thread_stop_signal = Arc::clone(&stop_signal);

        let capture_thread = thread::Builder::new()
            .name("camera-capture".to_string())
            .spawn(move || camera_capture_loop(index, msg_sender, thread_stop_signal))
            .context("Failed to spawn camera capture thread")?;

        Ok(Box::new(NokhwaCameraStream {
            msg_receiver,
            stop_signal,
            capture_thread: Some(capture_thread),
        }))
    }
}

pub struct NokhwaCameraStream {
    msg_receiver: Receiver<CameraThreadMsg>,
    stop_signal: Arc<AtomicBool>,
    capture_thread: Option<JoinHandle<()>>,
}

impl CameraStream for NokhwaCameraStream {
    fn poll_latest_frame(&mut self) -> Result<Option<CameraFrame>> {
        let mut latest_frame = None;

        for msg in self.msg_receiver.try_iter() {
            match msg {
                CameraThreadMsg::Frame(frame) => latest_frame = Some(frame),
                CameraThreadMsg::Error(error) => anyhow::bail!(error),
            }
        }

        let thread_exited = self
            .capture_thread
            .as_ref()
            .is_some_and(|handle| handle.is_finished());
        if latest_frame.is_none() && thread_exited {
            anyhow::bail!("Camera capture thread exited unexpectedly");
        }

        Ok(latest_frame)
    }

    fn stop(&mut self) {
        self.stop_signal.store(true, Ordering::Relaxed);

        if let Some(handle) = self.capture_thread.take() {
            if handle.join().is_err() {
                log::error!("{} Camera capture thread panicked", LOG_TAG_CAMERA);
            }
        }
    }
}

impl Drop for NokhwaCameraStream {
    fn drop(&mut self) {
        self.stop();
    }
}

fn camera_capture_loop(
    index: CameraIndex,
    msg_sender: Sender<CameraThreadMsg>,
    stop_signal: Arc<AtomicBool>,
) {
    log::info!("{} Camera capture loop started", LOG_TAG_CAMERA);

    let requested_format = build_requested_format();
    log::debug!("{} Requested camera format: {:?}", LOG_TAG_CAMERA, requested_format);

    let mut camera = match Camera::new(index, requested_format) {
        Ok(camera) => camera,
        Err(err) => {
            report_error(&msg_sender, format!("Failed to open camera: {}", err));
            return;
        }
    };

    if let Err(err) = camera.open_stream() {
        report_error(&msg_sender, format!("Failed to open stream: {}", err));
        return;
    }
    log::info!(
        "{} Camera stream opened with format {:?}",
        LOG_TAG_CAMERA,
        camera.camera_format()
    );

    while !stop_signal.load(Ordering::Relaxed) {
        match camera.frame() {
            Ok(buffer) => match buffer.decode_image::<RgbFormat>() {
                Ok(rgb_image) => {
                    let frame = CameraFrame::build_from_rgb_image(rgb_image);
                    match msg_sender.try_send(CameraThreadMsg::Frame(frame)) {
                        Ok(()) | Err(TrySendError::Full(_)) => {}
                        Err(TrySendError::Disconnected(_)) => {
                            log::info!("{} Stream handle dropped, stopping", LOG_TAG_CAMERA);
                            break;
                        }
                    }
                }
                Err(err) => {
                    log::warn!("{} Failed to decode frame: {}", LOG_TAG_CAMERA, err);
                    thread::sleep(std::time::Duration::from_millis(50));
                }
            },
            Err(NokhwaError::ReadFrameError(msg)) if msg.contains("Timeout") => {
                log::warn!("{} Camera frame read timeout", LOG_TAG_CAMERA);
                thread::sleep(std::time::Duration::from_millis(100));
            }
            Err(err) => {
                report_error(&msg_sender, format!("Failed to capture frame: {}", err));
                break;
            }
        }
    }

    if let Err(err) = camera.stop_stream() {
        log::error!("{} Failed to stop camera stream cleanly: {}", LOG_TAG_CAMERA, err);
    }
    log::info!("{} Camera capture loop finished", LOG_TAG_CAMERA);
}

/// Bounded so every preview tick stays a modest copy; the camera picks the
/// closest mode it supports.
fn build_requested_format() -> RequestedFormat<'static> {
    let requested_camera_format = CameraFormat::new(
        Resolution::new(CAMERA_REQUESTED_WIDTH, CAMERA_REQUESTED_HEIGHT),
        FrameFormat::MJPEG,
        CAMERA_REQUESTED_FPS,
    );
    RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(requested_camera_format))
}

fn report_error(msg_sender: &Sender<CameraThreadMsg>, error_msg: String) {
    log::error!("{} {}", LOG_TAG_CAMERA, error_msg);
    let _ = msg_sender.send(CameraThreadMsg::Error(error_msg));
}

/// Rear-facing cameras win when the device name gives it away.
fn choose_preferred_camera(camera_names: &[String]) -> Option<usize> {
    if camera_names.is_empty() {
        return None;
    }

    let rear_facing = camera_names.iter().position(|name| {
        let lowercase_name = name.to_lowercase();
        PREFERRED_CAMERA_KEYWORDS
            .iter()
            .any(|keyword| lowercase_name.contains(keyword))
    });

    Some(rear_facing.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_choose_preferred_camera_picks_rear_facing() {
        let cameras = names(&["Front Camera", "Back Camera"]);

        assert_eq!(choose_preferred_camera(&cameras), Some(1));
    }

    #[test]
    fn test_choose_preferred_camera_matches_spanish_name() {
        let cameras = names(&["Cámara frontal", "Cámara TRASERA"]);

        assert_eq!(choose_preferred_camera(&cameras), Some(1));
    }

    #[test]
    fn test_choose_preferred_camera_defaults_to_first() {
        let cameras = names(&["Integrated Webcam", "USB Camera"]);

        assert_eq!(choose_preferred_camera(&cameras), Some(0));
    }

    #[test]
    fn test_choose_preferred_camera_without_devices() {
        assert_eq!(choose_preferred_camera(&[]), None);
    }

    #[test]
    fn test_requested_format_is_bounded_to_preview_size() {
        let requested_format = build_requested_format();

        match requested_format.requested_format_type() {
            RequestedFormatType::Closest(camera_format) => {
                assert_eq!(camera_format.width(), CAMERA_REQUESTED_WIDTH);
                assert_eq!(camera_format.height(), CAMERA_REQUESTED_HEIGHT);
            }
            other => panic!("Expected a closest-match request, got {:?}", other),
        }
    }

    #[test]
    fn test_stream_reports_thread_error() {
        let (msg_sender, msg_receiver) = crossbeam_channel::bounded(2);
        let mut stream = NokhwaCameraStream {
            msg_receiver,
            stop_signal: Arc::new(AtomicBool::new(false)),
            capture_thread: None,
        };

        msg_sender
            .send(CameraThreadMsg::Error("Permission denied".to_string()))
            .unwrap();

        let error = stream.poll_latest_frame().unwrap_err();
        assert!(error.to_string().contains("Permission denied"));
    }

    #[test]
    fn test_stream_returns_newest_frame_and_stop_sets_signal() {
        let (msg_sender, msg_receiver) = crossbeam_channel::bounded(2);
        let stop_signal = Arc::new(AtomicBool::new(false));
        let mut stream = NokhwaCameraStream {
            msg_receiver,
            stop_signal: Arc::clone(&stop_signal),
            capture_thread: None,
        };

        msg_sender
            .send(CameraThreadMsg::Frame(CameraFrame::build_from_raw_data(1, 1, vec![0; 4])))
            .unwrap();
        msg_sender
            .send(CameraThreadMsg::Frame(CameraFrame::build_from_raw_data(2, 2, vec![0; 16])))
            .unwrap();

        let frame = stream.poll_latest_frame().unwrap().unwrap();
        assert_eq!(frame.width, 2);
        assert!(stream.poll_latest_frame().unwrap().is_none());

        stream.stop();
        assert!(stop_signal.load(Ordering::Relaxed));
    }
}
