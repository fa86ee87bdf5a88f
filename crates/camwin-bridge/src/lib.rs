//! Types shared between the capture driver and the display.
//!
//! The driver owns the camera, the captioning model and the caption history;
//! the display turns that history into pixels. Both sides agree on the
//! configuration structs and status snapshots defined here, which keeps the
//! dependency graph flat: every other crate depends on this one and nothing
//! else in the workspace.

pub mod config;
pub mod status;

pub use config::{CaptureConfig, Config, DisplayConfig};
pub use status::{CameraInfo, ModelInfo, StatusReport};
