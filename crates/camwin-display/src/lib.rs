//! Caption layout, rasterization and the windows that show the result.
//!
//! The layout engine turns caption history into positioned glyphs, the
//! rasterizer draws them onto an RGB canvas and a [`RenderSink`] presents the
//! canvas. Canvases are rebuilt from scratch on every update; nothing in this
//! crate keeps pixel state between frames.
//!
//! Native windows are available behind the `preview` feature.

pub mod canvas;
pub mod font;
pub mod layout;
pub mod overlay;
pub mod renderer;
pub mod sink;

#[cfg(feature = "preview")]
pub mod window;

pub use layout::ColumnLayout;
pub use renderer::CaptionRenderer;
pub use sink::{HeadlessSink, RenderSink, Surface};

/// Errors that can occur while opening windows or presenting canvases.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    /// The windowing backend refused to create or update a window.
    #[error("window error: {0}")]
    Window(String),
    /// A canvas was sent to a surface that was never opened.
    #[error("no window for surface {0:?}")]
    UnknownSurface(Surface),
    /// The binary was built without a windowing backend.
    #[error("windows are not compiled in (enable the `preview` feature)")]
    Unsupported,
}

/// Opens a sink with one window per surface using the compiled-in backend.
/// An empty `surfaces` slice gives a [`HeadlessSink`].
pub fn open_sink(
    surfaces: &[Surface],
    width: u32,
    height: u32,
) -> Result<Box<dyn RenderSink>, DisplayError> {
    if surfaces.is_empty() {
        return Ok(Box::new(HeadlessSink));
    }

    #[cfg(feature = "preview")]
    {
        Ok(Box::new(window::WindowSink::open(surfaces, width, height)?))
    }
    #[cfg(not(feature = "preview"))]
    {
        log::error!("Cannot open {surfaces:?} ({width}x{height}): no window backend is compiled in");
        Err(DisplayError::Unsupported)
    }
}
