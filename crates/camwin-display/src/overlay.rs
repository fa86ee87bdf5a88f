//! Caption overlay on top of the live camera frame.

use image::{Rgb, RgbImage};
use time::{OffsetDateTime, macros::format_description};

use crate::font::GlyphFont;

/// Maximum characters per overlay line before wrapping.
pub const WRAP_WIDTH: usize = 60;
/// Baseline of the first caption line.
const CAPTION_BASELINE: i64 = 30;
/// Distance between two caption baselines.
const LINE_STEP: i64 = 25;
/// Distance between the bottom edge and the timestamp baseline.
const STAMP_OFFSET: i64 = 20;

const CAPTION_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const STAMP_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Splits `text` on whitespace into lines of at most `max_chars` characters.
/// A single word longer than `max_chars` gets a line of its own.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Local wall-clock time as `HH:MM:SS`, or UTC if the local offset is
/// unknown.
pub fn clock_stamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_default()
}

/// Copies `frame` and draws `caption` (wrapped) in the top-left corner and
/// `Live - <stamp>` along the bottom edge.
pub fn compose_camera_frame(
    frame: &RgbImage,
    caption: &str,
    stamp: &str,
    font: &GlyphFont,
) -> RgbImage {
    let mut output = frame.clone();
    let ascent = font.ascent() as i64;

    for (index, line) in wrap_text(caption, WRAP_WIDTH).iter().enumerate() {
        let baseline = CAPTION_BASELINE + index as i64 * LINE_STEP;
        font.draw_text(&mut output, 10, baseline - ascent, line, CAPTION_COLOR);
    }

    let stamp_baseline = output.height() as i64 - STAMP_OFFSET;
    font.draw_text(
        &mut output,
        10,
        stamp_baseline - ascent,
        &format!("Live - {stamp}"),
        STAMP_COLOR,
    );

    output
}
