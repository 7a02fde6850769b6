use anyhow::{Result, anyhow};
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    query,
    utils::{
        ApiBackend, CameraIndex, CameraInfo, FrameFormat, RequestedFormat, RequestedFormatType,
    },
};

use super::{
    rgb_converter,
    source::{CaptureError, FrameSource},
};
use crate::types::Frame;

// Raw formats first: they skip a decode step and some built-in cameras
// reject YUYV even when they advertise it.
const PREFERRED_PIXEL_FORMATS: &[FrameFormat] = &[
    FrameFormat::RAWRGB,
    FrameFormat::RAWBGR,
    FrameFormat::YUYV,
    FrameFormat::NV12,
    FrameFormat::MJPEG,
    FrameFormat::GRAY,
];

fn requested_formats() -> [RequestedFormat<'static>; 3] {
    [
        RequestedFormat::with_formats(
            RequestedFormatType::AbsoluteHighestFrameRate,
            PREFERRED_PIXEL_FORMATS,
        ),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::None),
    ]
}

#[derive(Clone, Debug)]
pub struct CameraDevice {
    pub index: CameraIndex,
    pub label: String,
}

pub fn available_cameras() -> Result<Vec<CameraDevice>> {
    let cameras = query(ApiBackend::Auto)?;
    Ok(cameras
        .into_iter()
        .map(|info| CameraDevice {
            index: info.index().clone(),
            label: format_camera_label(&info),
        })
        .collect())
}

fn format_camera_label(info: &CameraInfo) -> String {
    format!("{} ({})", info.human_name(), info.description())
}

fn build_camera(index: CameraIndex) -> Result<Camera> {
    let mut last_err = None;

    for requested in requested_formats() {
        match Camera::new(index.clone(), requested) {
            Ok(mut camera) => match camera.open_stream() {
                Ok(()) => return Ok(camera),
                Err(err) => last_err = Some(err.into()),
            },
            Err(err) => last_err = Some(err.into()),
        }
    }

    Err(last_err.unwrap_or_else(|| anyhow!("failed to open camera with any supported format")))
}

/// Synchronous webcam capture: every `read` blocks until the next frame.
pub struct CameraCapture {
    index: CameraIndex,
    camera: Option<Camera>,
    sequence: u64,
}

impl CameraCapture {
    pub fn new(index: u32) -> Self {
        Self {
            index: CameraIndex::Index(index),
            camera: None,
            sequence: 0,
        }
    }
}

impl FrameSource for CameraCapture {
    fn open(&mut self) -> Result<(), CaptureError> {
        let camera = build_camera(self.index.clone()).map_err(|err| CaptureError::Open {
            device: self.describe(),
            reason: format!("{err:#}"),
        })?;
        log::info!(
            "opened camera {} at {}",
            self.index,
            camera.camera_format()
        );
        self.camera = Some(camera);
        Ok(())
    }

    fn is_opened(&self) -> bool {
        self.camera
            .as_ref()
            .is_some_and(|camera| camera.is_stream_open())
    }

    fn read(&mut self) -> Result<Option<Frame>, CaptureError> {
        let device = self.describe();
        let camera = self
            .camera
            .as_mut()
            .ok_or_else(|| CaptureError::NotOpened(device.clone()))?;

        let buffer = camera.frame().map_err(|err| CaptureError::Read {
            device,
            reason: err.to_string(),
        })?;
        let image = rgb_converter::convert_camera_frame(&buffer)
            .map_err(|err| CaptureError::Decode(format!("{err:#}")))?;

        let frame = Frame::new(image, self.sequence);
        self.sequence += 1;
        Ok(Some(frame))
    }

    fn describe(&self) -> String {
        format!("camera {}", self.index)
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        if let Some(camera) = self.camera.as_mut() {
            if let Err(err) = camera.stop_stream() {
                log::warn!("failed to stop camera stream: {err:?}");
            }
        }
    }
}
