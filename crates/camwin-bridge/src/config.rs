use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Identifier of the captioning model used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "Salesforce/blip-image-captioning-large";

/// Settings of the capture and captioning driver.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Identifier of the captioning model (a Hugging Face repository id).
    pub model: String,
    /// How often a frame is captioned, in seconds. Values below one are
    /// raised to one.
    pub interval_seconds: u64,
    /// Index of the camera to open.
    pub camera_index: u32,
    /// Whether to show the live camera window with the latest caption.
    pub show_camera: bool,
    /// Whether to show the camera window next to a caption history window.
    pub dual_screen: bool,
    /// Whether the caption history spills over into a second text window.
    pub dual_text: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            interval_seconds: 5,
            camera_index: 0,
            show_camera: false,
            dual_screen: false,
            dual_text: false,
        }
    }
}

/// Geometry and typography of the caption history window. The values are
/// read once at startup and never change while the driver runs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Width of every window in pixels.
    pub window_width: u32,
    /// Height of every window in pixels.
    pub window_height: u32,
    /// Path to a TrueType/OpenType font. A built-in bitmap font is used when
    /// it is missing or cannot be parsed.
    pub font_path: Option<PathBuf>,
    /// Glyph size in pixels.
    pub font_size: u32,
    /// Horizontal distance between two caption columns in pixels.
    pub column_width: u32,
    /// Vertical gap between two characters of one column in pixels.
    pub char_spacing: u32,
    /// How many captions the single history window keeps.
    pub max_captions: usize,
    /// Requested limit of characters per column. Columns are always cut at
    /// the bottom margin of the window; this value is currently not applied.
    pub chars_per_column: Option<u32>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            window_width: 2560,
            window_height: 1440,
            font_path: None,
            font_size: 24,
            column_width: 25,
            char_spacing: 2,
            max_captions: 200,
            chars_per_column: None,
        }
    }
}

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Camera, model and window mode selection.
    pub capture: CaptureConfig,
    /// Layout of the caption windows.
    pub display: DisplayConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("[capture]\ninterval_seconds = 3\n").unwrap();
        assert_eq!(config.capture.interval_seconds, 3);
        assert_eq!(config.capture.model, DEFAULT_MODEL);
        assert_eq!(config.display, DisplayConfig::default());
    }

    #[test]
    fn pretty_toml_reads_back_unchanged() {
        let mut config = Config::default();
        config.display.font_path = Some(PathBuf::from("/tmp/font.ttf"));
        config.capture.dual_text = true;

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
