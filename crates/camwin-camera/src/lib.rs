//! Camera frame sources for the capture loop.
//!
//! This crate hides where frames come from behind the [`FrameSource`] trait
//! and normalizes whatever a backend delivers into a single RGB
//! representation. It focuses on:
//! - A tagged [`Frame`] union so backends never need to decode eagerly.
//! - Opening physical cameras with `nokhwa` (behind the `camera` feature).
//! - Listing the cameras known to the host.

pub mod frame;

#[cfg(feature = "camera")]
pub mod device;

use camwin_bridge::CameraInfo;

pub use frame::{Frame, PixelFormat, RawFrame};

/// Frame width requested from physical cameras.
pub const REQUESTED_WIDTH: u32 = 640;
/// Frame height requested from physical cameras.
pub const REQUESTED_HEIGHT: u32 = 480;
/// Frame rate requested from physical cameras.
pub const REQUESTED_FPS: u32 = 30;

/// Errors that can occur while opening a camera or reading frames from it.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    /// The camera could not be opened. This usually means the device is used
    /// by another application, permissions were not granted, or the index
    /// is wrong.
    #[error("cannot open camera {index}: {reason}")]
    Open { index: u32, reason: String },
    /// The camera is open but did not deliver a frame.
    #[error("failed to grab frame: {0}")]
    Read(String),
    /// A raw frame's buffer does not match its declared dimensions.
    #[error("frame of {width}x{height} needs {expected} bytes, got {actual}")]
    FrameSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    /// Frames were requested after [`FrameSource::release`].
    #[error("camera was already released")]
    Released,
    /// The binary was built without any camera backend.
    #[error("camera support is not compiled in (enable the `camera` feature)")]
    Unsupported,
}

/// A producer of camera frames.
///
/// Implementations are polled from a single thread once per loop iteration.
/// `read_frame` may block until the next frame is available.
pub trait FrameSource {
    /// Reads the next frame.
    fn read_frame(&mut self) -> Result<Frame, CameraError>;

    /// Stops streaming and releases the device. Calling it twice is a no-op.
    fn release(&mut self);

    /// Describes the camera and the format it actually delivers.
    fn describe(&self) -> CameraInfo;
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn read_frame(&mut self) -> Result<Frame, CameraError> {
        (**self).read_frame()
    }

    fn release(&mut self) {
        (**self).release()
    }

    fn describe(&self) -> CameraInfo {
        (**self).describe()
    }
}

/// Opens the camera at `index` with the compiled-in backend.
pub fn open_camera(index: u32) -> Result<Box<dyn FrameSource>, CameraError> {
    #[cfg(feature = "camera")]
    {
        Ok(Box::new(device::NokhwaCamera::open(index)?))
    }
    #[cfg(not(feature = "camera"))]
    {
        log::error!("Cannot open camera {index}: no camera backend is compiled in");
        Err(CameraError::Unsupported)
    }
}

/// Returns `(index, name)` pairs of all cameras the host reports.
pub fn list_cameras() -> Result<Vec<(u32, String)>, CameraError> {
    #[cfg(feature = "camera")]
    {
        device::list_cameras()
    }
    #[cfg(not(feature = "camera"))]
    {
        Err(CameraError::Unsupported)
    }
}
