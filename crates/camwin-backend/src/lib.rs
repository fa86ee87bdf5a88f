//! Capture driver entry point and public API surface.
//!
//! This crate owns the driver lifecycle: it loads configuration, builds the
//! camera, captioning model and windows, and runs the capture/caption loop
//! until the user quits, the process is interrupted or the camera fails.

mod app;
pub mod config;
pub mod runtime;
pub mod state;

pub use crate::app::{EngineError, run, status};
pub use crate::runtime::{CaptureLoop, LoopSettings};
pub use crate::state::{CaptionHistory, DisplayMode, LoopState, StopReason};
