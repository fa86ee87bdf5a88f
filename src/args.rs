use std::path::PathBuf;

use camwin_bridge::Config;
use clap::Parser;

/// Command line of the `camwin` binary. Flags override `config.toml`.
#[derive(Debug, Parser, Clone)]
#[command(about = "Caption a camera feed with an image captioning model", version)]
pub struct Args {
    /// Captioning model (Hugging Face repository id)
    #[arg(long)]
    pub model: Option<String>,

    /// Caption generation interval in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Camera index
    #[arg(long)]
    pub camera: Option<u32>,

    /// Show camera window with live preview
    #[arg(long = "show-camera")]
    pub show_camera: bool,

    /// Enable dual screen display (camera + text)
    #[arg(long = "dual-screen")]
    pub dual_screen: bool,

    /// Continue older captions in a second text window
    #[arg(long = "dual-text")]
    pub dual_text: bool,

    /// Show system status and exit
    #[arg(long)]
    pub status: bool,

    /// List available cameras and exit
    #[arg(long = "list-cameras")]
    pub list_cameras: bool,

    /// Read configuration from this file instead of the user config directory
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the effective configuration back to the config file
    #[arg(long = "save-config")]
    pub save_config: bool,

    /// Log verbosity
    #[arg(long = "log-level", default_value_t = log::LevelFilter::Info)]
    pub log_level: log::LevelFilter,
}

impl Args {
    /// Applies the flags that were given on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        let capture = &mut config.capture;
        if let Some(model) = &self.model {
            capture.model = model.clone();
        }
        if let Some(interval) = self.interval {
            capture.interval_seconds = interval;
        }
        if let Some(camera) = self.camera {
            capture.camera_index = camera;
        }
        capture.show_camera |= self.show_camera;
        capture.dual_screen |= self.dual_screen;
        capture.dual_text |= self.dual_text;
    }
}
