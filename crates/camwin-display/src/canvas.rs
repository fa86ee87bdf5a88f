use image::{Rgb, RgbImage};

use crate::{font::GlyphFont, layout::TextLayout};

pub const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);
pub const FOREGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Rasterizes `layout` onto a fresh black canvas of `width` x `height`.
pub fn rasterize(layout: &TextLayout, width: u32, height: u32, font: &GlyphFont) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND);

    for glyph in layout.glyphs() {
        font.draw_char(
            &mut canvas,
            glyph.x as i64,
            glyph.y as i64,
            glyph.ch,
            FOREGROUND,
        );
    }

    let footer = &layout.footer;
    font.draw_text(
        &mut canvas,
        footer.x as i64,
        footer.y as i64,
        &footer.text,
        FOREGROUND,
    );

    canvas
}

/// Packs an RGB canvas into `0x00RRGGBB` words, row by row.
pub fn to_packed_rgb(canvas: &RgbImage) -> Vec<u32> {
    canvas
        .pixels()
        .map(|Rgb([r, g, b])| ((*r as u32) << 16) | ((*g as u32) << 8) | *b as u32)
        .collect()
}
