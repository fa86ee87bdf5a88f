use image::RgbImage;

use crate::CameraError;

/// Byte order of a packed 8-bit, 3-channel pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb8,
    /// Blue first, as delivered by most OpenCV-style capture APIs.
    Bgr8,
}

/// Frame exactly as a capture backend produced it.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl RawFrame {
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            format,
            data,
        }
    }
}

/// A captured frame, either still in the backend's representation or
/// already decoded to RGB.
///
/// Frames are normalized exactly once with [`Frame::into_rgb`] when they
/// cross into the capture loop; everything behind the loop only ever sees
/// [`RgbImage`].
#[derive(Debug, Clone)]
pub enum Frame {
    Raw(RawFrame),
    Decoded(RgbImage),
}

impl Frame {
    /// Converts the frame into an RGB image, swapping channels if needed.
    pub fn into_rgb(self) -> Result<RgbImage, CameraError> {
        match self {
            Frame::Decoded(image) => Ok(image),
            Frame::Raw(raw) => {
                let expected = raw.width as usize * raw.height as usize * 3;
                if raw.data.len() != expected {
                    return Err(CameraError::FrameSize {
                        width: raw.width,
                        height: raw.height,
                        expected,
                        actual: raw.data.len(),
                    });
                }

                let mut data = raw.data;
                if raw.format == PixelFormat::Bgr8 {
                    swap_red_blue(&mut data);
                }

                RgbImage::from_raw(raw.width, raw.height, data).ok_or(CameraError::FrameSize {
                    width: raw.width,
                    height: raw.height,
                    expected,
                    actual: expected,
                })
            }
        }
    }
}

/// Swaps the first and third channel of every packed 3-byte pixel in place,
/// turning BGR into RGB and back. A trailing partial pixel is left untouched.
pub fn swap_red_blue(pixels: &mut [u8]) {
    for pixel in pixels.chunks_exact_mut(3) {
        pixel.swap(0, 2);
    }
}
