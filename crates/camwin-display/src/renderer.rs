use camwin_bridge::DisplayConfig;
use image::RgbImage;

use crate::{
    canvas,
    font::GlyphFont,
    layout::{ColumnLayout, TextLayout},
    overlay,
};

/// Size of the overlay text drawn over camera frames.
const OVERLAY_FONT_SIZE: u32 = 16;

/// Turns caption history and camera frames into canvases.
///
/// Built once from the immutable [`DisplayConfig`]; every call produces a
/// brand new canvas.
#[derive(Debug)]
pub struct CaptionRenderer {
    layout: ColumnLayout,
    font: GlyphFont,
    overlay_font: GlyphFont,
}

impl CaptionRenderer {
    pub fn new(config: &DisplayConfig) -> Self {
        if let Some(limit) = config.chars_per_column {
            log::warn!(
                "chars_per_column = {limit} has no effect, columns are cut at the window edge"
            );
        }

        let font_path = config.font_path.as_deref();
        Self {
            layout: ColumnLayout::new(config),
            font: GlyphFont::load(font_path, config.font_size),
            overlay_font: GlyphFont::load(font_path, OVERLAY_FONT_SIZE),
        }
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Lays out and rasterizes `captions` (oldest first) with `total` as
    /// the footer count.
    pub fn render_history<'a, I>(&self, captions: I, total: u64) -> RgbImage
    where
        I: IntoIterator<Item = &'a str>,
        I::IntoIter: DoubleEndedIterator,
    {
        let placed: TextLayout = self.layout.lay_out(captions, total);
        let (width, height) = self.layout.size();
        canvas::rasterize(&placed, width, height, &self.font)
    }

    /// Draws `caption` and the current time over a copy of `frame`.
    pub fn render_camera(&self, frame: &RgbImage, caption: &str) -> RgbImage {
        overlay::compose_camera_frame(frame, caption, &overlay::clock_stamp(), &self.overlay_font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_canvas_has_the_window_size() {
        let config = DisplayConfig {
            window_width: 320,
            window_height: 200,
            ..DisplayConfig::default()
        };
        let renderer = CaptionRenderer::new(&config);
        let canvas = renderer.render_history(["a cat", "a dog"], 2);
        assert_eq!(canvas.dimensions(), (320, 200));
        assert_eq!(renderer.layout().capacity(), (320 - 40) / 25);
    }

    #[test]
    fn inert_column_limit_does_not_change_the_layout() {
        let base = DisplayConfig::default();
        let limited = DisplayConfig {
            chars_per_column: Some(5),
            ..base.clone()
        };
        let long = "a very long caption that needs more than five rows";
        assert_eq!(
            CaptionRenderer::new(&base).layout().lay_out([long], 1),
            CaptionRenderer::new(&limited).layout().lay_out([long], 1)
        );
    }

    #[test]
    fn camera_canvas_keeps_the_frame_size() {
        let renderer = CaptionRenderer::new(&DisplayConfig::default());
        let frame = RgbImage::new(64, 48);
        assert_eq!(renderer.render_camera(&frame, "hello").dimensions(), (64, 48));
    }
}
