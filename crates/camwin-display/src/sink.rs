use image::RgbImage;

use crate::DisplayError;

/// One logical window of a render sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Live camera frame with the caption overlay.
    Camera,
    /// Caption history.
    Text,
    /// Older captions that no longer fit the [`Surface::Text`] window.
    OverflowText,
}

impl Surface {
    /// Window title of the surface.
    pub fn title(&self) -> &'static str {
        match self {
            Surface::Camera => "Camera Feed",
            Surface::Text => "Generated Captions",
            Surface::OverflowText => "Earlier Captions",
        }
    }
}

/// Something that can present canvases to the user.
pub trait RenderSink {
    /// Presents `canvas` on `surface`, replacing what was shown before.
    fn show(&mut self, surface: Surface, canvas: &RgbImage) -> Result<(), DisplayError>;

    /// Returns `true` once the user asked to quit (e.g. pressed `q` or
    /// closed a window). Called once per loop iteration.
    fn poll_quit(&mut self) -> bool;

    /// Closes every surface. Calling it twice is a no-op.
    fn close(&mut self);
}

impl<T: RenderSink + ?Sized> RenderSink for Box<T> {
    fn show(&mut self, surface: Surface, canvas: &RgbImage) -> Result<(), DisplayError> {
        (**self).show(surface, canvas)
    }

    fn poll_quit(&mut self) -> bool {
        (**self).poll_quit()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// A sink without any window. Captions only reach the log.
#[derive(Debug, Default)]
pub struct HeadlessSink;

impl RenderSink for HeadlessSink {
    fn show(&mut self, surface: Surface, _: &RgbImage) -> Result<(), DisplayError> {
        log::trace!("Discarding a {surface:?} canvas without a window");
        Ok(())
    }

    fn poll_quit(&mut self) -> bool {
        false
    }

    fn close(&mut self) {}
}
