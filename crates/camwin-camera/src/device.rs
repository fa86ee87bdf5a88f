use camwin_bridge::CameraInfo;
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        ApiBackend, CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType,
        Resolution,
    },
};

use crate::{CameraError, Frame, FrameSource, PixelFormat, RawFrame};

/// A physical camera streaming through `nokhwa`.
pub struct NokhwaCamera {
    index: u32,
    name: String,
    /// `None` once the camera has been released.
    camera: Option<Camera>,
}

impl std::fmt::Display for NokhwaCamera {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{} ({})", self.name, self.index)
    }
}

impl NokhwaCamera {
    /// Opens the camera at `index` and starts streaming.
    ///
    /// The camera is asked for the format closest to
    /// [`crate::REQUESTED_WIDTH`]x[`crate::REQUESTED_HEIGHT`] at
    /// [`crate::REQUESTED_FPS`]; the device may pick something else, see
    /// [`FrameSource::describe`] for what it actually delivers.
    pub fn open(index: u32) -> Result<Self, CameraError> {
        log::info!("Initializing camera (index {index})...");

        let format = CameraFormat::new(
            Resolution::new(crate::REQUESTED_WIDTH, crate::REQUESTED_HEIGHT),
            FrameFormat::YUYV,
            crate::REQUESTED_FPS,
        );
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format));

        let open_error = |reason: String| CameraError::Open { index, reason };
        let mut camera = Camera::new(CameraIndex::Index(index), requested)
            .map_err(|e| open_error(e.to_string()))?;
        camera
            .open_stream()
            .map_err(|e| open_error(e.to_string()))?;

        let name = camera.info().human_name();
        let opened = Self {
            index,
            name,
            camera: Some(camera),
        };
        log::info!("Camera {opened} initialized");
        Ok(opened)
    }
}

impl FrameSource for NokhwaCamera {
    fn read_frame(&mut self) -> Result<Frame, CameraError> {
        let camera = self.camera.as_mut().ok_or(CameraError::Released)?;
        let buffer = camera
            .frame()
            .map_err(|e| CameraError::Read(e.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CameraError::Read(e.to_string()))?;

        let (width, height) = decoded.dimensions();
        Ok(Frame::Raw(RawFrame::new(
            width,
            height,
            PixelFormat::Rgb8,
            decoded.into_raw(),
        )))
    }

    fn release(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                log::warn!("Failed to stop camera stream: {e}");
            }
            log::info!("Camera released");
        }
    }

    fn describe(&self) -> CameraInfo {
        let (width, height, fps) = match &self.camera {
            Some(camera) => {
                let format = camera.camera_format();
                (
                    format.resolution().width(),
                    format.resolution().height(),
                    format.frame_rate(),
                )
            }
            None => (0, 0, 0),
        };

        CameraInfo {
            camera_index: self.index,
            name: Some(self.name.clone()),
            width,
            height,
            fps,
        }
    }
}

impl Drop for NokhwaCamera {
    fn drop(&mut self) {
        self.release();
    }
}

/// Returns `(index, name)` pairs of all cameras reported by the native
/// backend. Cameras addressed by something other than a number are skipped.
pub fn list_cameras() -> Result<Vec<(u32, String)>, CameraError> {
    let cameras =
        nokhwa::query(ApiBackend::Auto).map_err(|e| CameraError::Read(e.to_string()))?;
    Ok(cameras
        .iter()
        .filter_map(|info| {
            let index = info.index().as_index().ok()?;
            Some((index, info.human_name()))
        })
        .collect())
}
