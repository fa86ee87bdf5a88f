//! Vertical column layout of the caption history.
//!
//! Every caption occupies one column. The newest caption sits next to the
//! right edge and older ones continue to the left; the characters of a
//! caption run top to bottom. Spaces are drawn as hyphens so word
//! boundaries stay visible in a single column.

use camwin_bridge::DisplayConfig;

/// Distance between the canvas edge and the first column or row.
pub const MARGIN: u32 = 20;
/// Distance between the bottom edge and the top of the footer line.
pub const FOOTER_OFFSET: u32 = 30;

/// A single character and the top-left corner it is drawn at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphPlacement {
    pub x: u32,
    pub y: u32,
    pub ch: char,
}

/// One caption's column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub x: u32,
    pub glyphs: Vec<GlyphPlacement>,
    /// Whether characters were cut off at the bottom margin.
    pub truncated: bool,
}

impl Column {
    /// The characters that made it into the column, top to bottom.
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|glyph| glyph.ch).collect()
    }
}

/// A line of horizontal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub x: u32,
    pub y: u32,
    pub text: String,
}

/// Everything that has to be drawn onto a caption canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLayout {
    /// Columns from the newest (rightmost) to the oldest.
    pub columns: Vec<Column>,
    pub footer: TextLine,
}

impl TextLayout {
    /// All glyphs of all columns.
    pub fn glyphs(&self) -> impl Iterator<Item = &GlyphPlacement> {
        self.columns.iter().flat_map(|column| column.glyphs.iter())
    }
}

/// Column geometry derived from the canvas size and font metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    width: u32,
    height: u32,
    column_width: u32,
    char_height: u32,
    max_chars_per_column: u32,
    max_columns: u32,
}

impl ColumnLayout {
    /// Builds the layout for a canvas of the configured window size.
    pub fn new(config: &DisplayConfig) -> Self {
        Self::with_size(config, config.window_width, config.window_height)
    }

    /// Builds the layout for a `width` x `height` canvas using the font
    /// metrics and spacing of `config`.
    pub fn with_size(config: &DisplayConfig, width: u32, height: u32) -> Self {
        let column_width = config.column_width.max(1);
        let char_height = (config.font_size + config.char_spacing).max(1);

        Self {
            width,
            height,
            column_width,
            char_height,
            max_chars_per_column: height.saturating_sub(2 * MARGIN) / char_height,
            max_columns: width.saturating_sub(2 * MARGIN) / column_width,
        }
    }

    pub fn char_height(&self) -> u32 {
        self.char_height
    }

    pub fn max_chars_per_column(&self) -> u32 {
        self.max_chars_per_column
    }

    pub fn max_columns(&self) -> u32 {
        self.max_columns
    }

    /// How many captions one canvas shows at most.
    pub fn capacity(&self) -> usize {
        self.max_columns as usize
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Places `captions` (ordered oldest to newest) onto the canvas.
    ///
    /// Only the newest [`ColumnLayout::capacity`] captions are visible. A
    /// caption that does not fit the column height is cut at the bottom
    /// margin instead of continuing in another column. `total` is printed
    /// in the footer; callers pass the number of captions generated since
    /// startup, which keeps counting after the history buffer is full.
    pub fn lay_out<'a, I>(&self, captions: I, total: u64) -> TextLayout
    where
        I: IntoIterator<Item = &'a str>,
        I::IntoIter: DoubleEndedIterator,
    {
        let bottom = self.height.saturating_sub(MARGIN) as i64;
        let mut columns = Vec::new();

        for (index, caption) in captions
            .into_iter()
            .rev()
            .take(self.max_columns as usize)
            .enumerate()
        {
            let x = self.width as i64 - MARGIN as i64 - index as i64 * self.column_width as i64;
            if x < MARGIN as i64 {
                break;
            }

            let mut glyphs = Vec::new();
            let mut truncated = false;
            for (row, ch) in caption.chars().enumerate() {
                let y = MARGIN as i64 + row as i64 * self.char_height as i64;
                if y + self.char_height as i64 > bottom {
                    truncated = true;
                    break;
                }
                glyphs.push(GlyphPlacement {
                    x: x as u32,
                    y: y as u32,
                    ch: if ch == ' ' { '-' } else { ch },
                });
            }

            columns.push(Column {
                x: x as u32,
                glyphs,
                truncated,
            });
        }

        TextLayout {
            columns,
            footer: TextLine {
                x: MARGIN,
                y: self.height.saturating_sub(FOOTER_OFFSET),
                text: format!("Total Captions: {total} | Press 'q' to quit"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DisplayConfig {
        DisplayConfig {
            window_width: 2560,
            window_height: 1440,
            font_size: 24,
            column_width: 25,
            char_spacing: 2,
            ..DisplayConfig::default()
        }
    }

    #[test]
    fn metrics_for_a_2k_canvas() {
        let layout = ColumnLayout::new(&config());
        assert_eq!(layout.char_height(), 26);
        assert_eq!(layout.max_columns(), 100);
        assert_eq!(layout.max_chars_per_column(), 53);
        assert_eq!(layout.capacity(), 100);
    }

    #[test]
    fn only_the_newest_captions_that_fit_are_shown() {
        let captions: Vec<String> = (0..150).map(|n| format!("caption {n}")).collect();
        let layout = ColumnLayout::new(&config()).lay_out(captions.iter().map(String::as_str), 150);

        assert_eq!(layout.columns.len(), 100);
        assert_eq!(layout.columns[0].text(), "caption-149");
        assert_eq!(layout.columns[99].text(), "caption-50");
        assert_eq!(layout.columns[0].x, 2540);
        assert_eq!(layout.columns[99].x, 2540 - 99 * 25);
    }

    #[test]
    fn spaces_become_hyphens_and_rows_step_by_char_height() {
        let layout = ColumnLayout::new(&config()).lay_out(["a cat sitting"], 1);
        let column = &layout.columns[0];

        assert_eq!(column.text(), "a-cat-sitting");
        assert_eq!(column.glyphs.len(), 13);
        let rows: Vec<u32> = column.glyphs.iter().map(|glyph| glyph.y).collect();
        assert_eq!(&rows[..3], &[20, 46, 72]);
        assert_eq!(rows[12], 20 + 12 * 26);
        assert!(column.glyphs.iter().all(|glyph| glyph.x == 2540));
        assert!(!column.truncated);
    }

    #[test]
    fn long_captions_are_cut_at_the_bottom_margin() {
        let long = "x".repeat(80);
        let layout = ColumnLayout::new(&config()).lay_out([long.as_str(), "short"], 2);

        let cut = &layout.columns[1];
        assert_eq!(cut.glyphs.len(), 53);
        assert!(cut.truncated);
        let last = cut.glyphs.last().unwrap();
        assert!(last.y + 26 <= 1440 - 20);

        // the overflow does not spill into the neighbouring column
        assert_eq!(layout.columns[0].text(), "short");
        assert_eq!(layout.glyphs().count(), 53 + 5);
    }

    #[test]
    fn empty_history_only_has_a_footer() {
        let layout = ColumnLayout::new(&config()).lay_out(std::iter::empty(), 0);
        assert!(layout.columns.is_empty());
        assert_eq!(
            layout.footer,
            TextLine {
                x: 20,
                y: 1410,
                text: "Total Captions: 0 | Press 'q' to quit".to_string(),
            }
        );
    }

    #[test]
    fn identical_input_gives_identical_placement() {
        let layout = ColumnLayout::new(&config());
        let captions = ["a dog", "two people walking", "a red car"];
        assert_eq!(layout.lay_out(captions, 3), layout.lay_out(captions, 3));
    }

    #[test]
    fn tiny_canvas_fits_no_columns() {
        let layout = ColumnLayout::with_size(&config(), 30, 30);
        assert_eq!(layout.capacity(), 0);
        assert_eq!(layout.max_chars_per_column(), 0);
        assert!(layout.lay_out(["hidden"], 1).columns.is_empty());
        assert_eq!(layout.lay_out(["hidden"], 1).footer.y, 0);
    }

    #[test]
    fn narrow_canvas_stops_at_left_margin() {
        // (100 - 40) / 25 = 2 columns at x = 80 and x = 55
        let layout = ColumnLayout::with_size(&config(), 100, 200);
        let placed = layout.lay_out(["a", "b", "c"], 3);
        let xs: Vec<u32> = placed.columns.iter().map(|column| column.x).collect();
        assert_eq!(xs, [80, 55]);
        assert_eq!(placed.columns[1].text(), "b");
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn glyphs_stay_inside_the_margins(
                width in 0u32..600,
                height in 0u32..400,
                font_size in 1u32..30,
                char_spacing in 0u32..5,
                column_width in 1u32..40,
                captions in prop::collection::vec("[a-z ]{0,30}", 0..30),
            ) {
                let config = DisplayConfig {
                    font_size,
                    char_spacing,
                    column_width,
                    ..DisplayConfig::default()
                };
                let layout = ColumnLayout::with_size(&config, width, height);
                let placed = layout.lay_out(captions.iter().map(String::as_str), 0);

                prop_assert!(placed.columns.len() <= layout.capacity());
                for glyph in placed.glyphs() {
                    prop_assert!(glyph.x >= MARGIN);
                    prop_assert!(glyph.y >= MARGIN);
                    prop_assert!(glyph.y + layout.char_height() <= height - MARGIN);
                    prop_assert_ne!(glyph.ch, ' ');
                }
            }

            #[test]
            fn columns_show_the_newest_captions_newest_first(
                captions in prop::collection::vec("[a-z ]{0,60}", 0..120),
            ) {
                let layout = ColumnLayout::with_size(&config(), 600, 400);
                let placed = layout.lay_out(captions.iter().map(String::as_str), 0);
                let max_chars = layout.max_chars_per_column() as usize;

                let expected: Vec<String> = captions
                    .iter()
                    .rev()
                    .take(layout.capacity())
                    .map(|caption| caption.replace(' ', "-").chars().take(max_chars).collect())
                    .collect();
                let actual: Vec<String> = placed.columns.iter().map(Column::text).collect();
                prop_assert_eq!(actual, expected);
            }
        }
    }
}
