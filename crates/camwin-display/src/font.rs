use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};

/// Side length of a glyph in the built-in bitmap font.
const BITMAP_GLYPH_SIZE: u32 = 8;

/// A font that can draw text onto a canvas.
///
/// Loading a font file never fails: when the file is missing or cannot be
/// parsed the built-in 8x8 bitmap font, scaled to roughly the requested
/// size, is used instead.
pub enum GlyphFont {
    Outline { font: FontVec, scale: PxScale },
    Bitmap { scale: u32 },
}

impl std::fmt::Debug for GlyphFont {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlyphFont::Outline { scale, .. } => write!(formatter, "Outline({}px)", scale.y),
            GlyphFont::Bitmap { scale } => write!(formatter, "Bitmap(x{scale})"),
        }
    }
}

impl GlyphFont {
    /// Loads the font at `path` at `size` pixels, falling back to the
    /// built-in font.
    pub fn load(path: Option<&Path>, size: u32) -> Self {
        let Some(path) = path else {
            log::info!("No font configured, using the built-in font");
            return Self::builtin(size);
        };

        let loaded = std::fs::read(path)
            .map_err(|e| e.to_string())
            .and_then(|bytes| FontVec::try_from_vec(bytes).map_err(|e| e.to_string()));
        match loaded {
            Ok(font) => {
                log::info!("Custom font loaded: {}", path.display());
                GlyphFont::Outline {
                    font,
                    scale: PxScale::from(size.max(1) as f32),
                }
            }
            Err(e) => {
                log::warn!("Could not load font {}: {e}", path.display());
                log::warn!("Using the built-in font");
                Self::builtin(size)
            }
        }
    }

    /// The built-in bitmap font scaled by the nearest whole factor to `size`.
    pub fn builtin(size: u32) -> Self {
        GlyphFont::Bitmap {
            scale: (size / BITMAP_GLYPH_SIZE).max(1),
        }
    }

    /// Distance from the top of a line to its baseline, in pixels.
    pub fn ascent(&self) -> u32 {
        match self {
            GlyphFont::Outline { font, scale } => font.as_scaled(*scale).ascent().ceil() as u32,
            GlyphFont::Bitmap { scale } => BITMAP_GLYPH_SIZE * scale,
        }
    }

    /// Draws `text` on one line with its top-left corner at `(x, y)`.
    /// Pixels outside the canvas are skipped.
    pub fn draw_text(&self, canvas: &mut RgbImage, x: i64, y: i64, text: &str, color: Rgb<u8>) {
        match self {
            GlyphFont::Outline { font, scale } => {
                let scaled = font.as_scaled(*scale);
                let baseline = y as f32 + scaled.ascent();
                let mut caret = x as f32;
                for ch in text.chars() {
                    let mut glyph = scaled.scaled_glyph(ch);
                    glyph.position = point(caret, baseline);
                    caret += scaled.h_advance(glyph.id);

                    let Some(outlined) = scaled.outline_glyph(glyph) else {
                        continue;
                    };
                    let bounds = outlined.px_bounds();
                    outlined.draw(|gx, gy, coverage| {
                        blend(
                            canvas,
                            bounds.min.x as i64 + gx as i64,
                            bounds.min.y as i64 + gy as i64,
                            color,
                            coverage,
                        );
                    });
                }
            }
            GlyphFont::Bitmap { scale } => {
                let advance = (BITMAP_GLYPH_SIZE * scale) as i64;
                for (index, ch) in text.chars().enumerate() {
                    draw_bitmap_glyph(canvas, x + index as i64 * advance, y, ch, *scale, color);
                }
            }
        }
    }

    /// Draws a single character with its top-left corner at `(x, y)`.
    pub fn draw_char(&self, canvas: &mut RgbImage, x: i64, y: i64, ch: char, color: Rgb<u8>) {
        let mut buffer = [0u8; 4];
        self.draw_text(canvas, x, y, ch.encode_utf8(&mut buffer), color);
    }
}

fn draw_bitmap_glyph(canvas: &mut RgbImage, x: i64, y: i64, ch: char, scale: u32, color: Rgb<u8>) {
    let rows = BASIC_FONTS
        .get(ch)
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8]);

    let scale = scale as i64;
    for (row, bits) in rows.iter().enumerate() {
        for column in 0..BITMAP_GLYPH_SIZE as i64 {
            if bits & (1 << column) == 0 {
                continue;
            }
            let left = x + column * scale;
            let top = y + row as i64 * scale;
            for dy in 0..scale {
                for dx in 0..scale {
                    blend(canvas, left + dx, top + dy, color, 1.0);
                }
            }
        }
    }
}

/// Mixes `color` into the pixel at `(x, y)` by `coverage` in `[0, 1]`.
fn blend(canvas: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }

    let coverage = coverage.clamp(0.0, 1.0);
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    for (channel, target) in pixel.0.iter_mut().zip(color.0) {
        let mixed = *channel as f32 * (1.0 - coverage) + target as f32 * coverage;
        *channel = mixed.round() as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn lit_pixels(canvas: &RgbImage) -> usize {
        canvas.pixels().filter(|pixel| pixel.0 != [0, 0, 0]).count()
    }

    #[test]
    fn missing_font_file_falls_back_to_builtin() {
        let font = GlyphFont::load(Some(Path::new("/nonexistent/font.ttf")), 24);
        assert!(matches!(font, GlyphFont::Bitmap { .. }));
        assert_eq!(font.ascent(), 24);
    }

    #[test]
    fn garbage_font_file_falls_back_to_builtin() {
        let path = std::env::temp_dir().join("camwin-not-a-font.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();
        let font = GlyphFont::load(Some(&path), 16);
        std::fs::remove_file(&path).ok();

        assert!(matches!(font, GlyphFont::Bitmap { .. }));
        assert_eq!(font.ascent(), 16);
    }

    fn fixture_font() -> &'static Path {
        Path::new(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/DejaVuSansMono.ttf"
        ))
    }

    #[test]
    fn truetype_font_is_loaded_as_outline() {
        let font = GlyphFont::load(Some(fixture_font()), 16);
        assert!(matches!(font, GlyphFont::Outline { .. }));

        let ascent = font.ascent();
        assert!((10..=16).contains(&ascent), "ascent {ascent}");
    }

    #[test]
    fn outline_glyph_is_antialiased_near_its_origin() {
        let font = GlyphFont::load(Some(fixture_font()), 16);
        let mut canvas = RgbImage::new(40, 40);
        font.draw_char(&mut canvas, 10, 10, 'A', WHITE);

        assert!(lit_pixels(&canvas) > 0);
        for (x, y, pixel) in canvas.enumerate_pixels() {
            if pixel.0 != [0, 0, 0] {
                assert!((9..30).contains(&x) && (9..28).contains(&y), "{x},{y}");
            }
        }
        // the slanted strokes of `A` leave partially covered pixels
        assert!(canvas.pixels().any(|pixel| pixel.0[0] > 0 && pixel.0[0] < 255));
    }

    #[test]
    fn outline_text_advances_to_the_right() {
        let font = GlyphFont::load(Some(fixture_font()), 16);
        let mut one = RgbImage::new(80, 30);
        let mut two = RgbImage::new(80, 30);
        font.draw_text(&mut one, 0, 0, "I", WHITE);
        font.draw_text(&mut two, 0, 0, "II", WHITE);

        let rightmost = |canvas: &RgbImage| {
            canvas
                .enumerate_pixels()
                .filter(|(_, _, pixel)| pixel.0 != [0, 0, 0])
                .map(|(x, _, _)| x)
                .max()
                .unwrap()
        };
        assert!(rightmost(&two) > rightmost(&one) + 5);
    }

    #[test]
    fn builtin_scale_never_drops_below_one() {
        assert!(matches!(GlyphFont::builtin(3), GlyphFont::Bitmap { scale: 1 }));
        assert!(matches!(GlyphFont::builtin(24), GlyphFont::Bitmap { scale: 3 }));
    }

    #[test]
    fn bitmap_glyph_stays_inside_its_cell() {
        let font = GlyphFont::builtin(16);
        let mut canvas = RgbImage::new(40, 40);
        font.draw_char(&mut canvas, 10, 10, 'A', WHITE);

        assert!(lit_pixels(&canvas) > 0);
        for (x, y, pixel) in canvas.enumerate_pixels() {
            if pixel.0 != [0, 0, 0] {
                assert!((10..26).contains(&x) && (10..26).contains(&y), "{x},{y}");
            }
        }
    }

    #[test]
    fn space_draws_nothing() {
        let font = GlyphFont::builtin(8);
        let mut canvas = RgbImage::new(16, 16);
        font.draw_char(&mut canvas, 0, 0, ' ', WHITE);
        assert_eq!(lit_pixels(&canvas), 0);
    }

    #[test]
    fn text_partly_off_canvas_is_clipped() {
        let font = GlyphFont::builtin(8);
        let mut canvas = RgbImage::new(10, 10);
        font.draw_text(&mut canvas, -4, -4, "WW", WHITE);
        font.draw_text(&mut canvas, 6, 6, "WW", WHITE);
        assert!(lit_pixels(&canvas) > 0);
    }

    #[test]
    fn partial_coverage_blends_towards_the_color() {
        let mut canvas = RgbImage::from_pixel(1, 1, Rgb([0, 0, 100]));
        blend(&mut canvas, 0, 0, Rgb([200, 0, 0]), 0.5);
        assert_eq!(canvas.get_pixel(0, 0).0, [100, 0, 50]);
    }
}
