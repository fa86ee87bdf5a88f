//! Engine setup: builds the camera, model and windows from configuration
//! and hands them to the capture loop.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use camwin_bridge::{CameraInfo, Config, ModelInfo, StatusReport};
use camwin_camera::{CameraError, FrameSource};
use camwin_captions::{CaptionError, Captioner};
use camwin_display::DisplayError;

use crate::{
    runtime::{CaptureLoop, LoopSettings},
    state::{DisplayMode, StopReason},
};

/// Errors that prevent the engine from starting.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The captioning model could not be loaded.
    #[error("failed to load captioning model: {0}")]
    Model(#[from] CaptionError),
    /// The camera could not be opened.
    #[error("failed to initialize camera: {0}")]
    Camera(#[from] CameraError),
    /// The display windows could not be opened.
    #[error("failed to open display: {0}")]
    Display(#[from] DisplayError),
    /// The Ctrl+C handler could not be installed.
    #[error("failed to install interrupt handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

/// Describes the configured engine without opening the camera or loading
/// the model.
pub fn status(config: &Config) -> StatusReport {
    report(config, camwin_captions::describe_model(&config.capture.model), None)
}

fn report(config: &Config, model: ModelInfo, camera: Option<CameraInfo>) -> StatusReport {
    StatusReport {
        model,
        camera,
        camera_index: config.capture.camera_index,
        show_camera: config.capture.show_camera,
        dual_screen: config.capture.dual_screen,
        dual_text: config.capture.dual_text,
        interval_seconds: config.capture.interval_seconds,
    }
}

/// Loads the model, opens the camera and windows, then runs the capture
/// loop on the calling thread until it stops.
pub fn run(config: &Config) -> Result<StopReason, EngineError> {
    let capture = &config.capture;
    log::info!("Using model: {}", capture.model);
    let captioner = camwin_captions::load_captioner(&capture.model)?;
    let source = camwin_camera::open_camera(capture.camera_index)?;
    let startup = report(config, captioner.info(), Some(source.describe()));
    for line in startup.to_string().lines() {
        log::info!("{line}");
    }

    let mode = DisplayMode::from_config(capture);
    let (width, height) = match mode {
        DisplayMode::Preview => (camwin_camera::REQUESTED_WIDTH, camwin_camera::REQUESTED_HEIGHT),
        _ => (config.display.window_width, config.display.window_height),
    };
    let sink = camwin_display::open_sink(mode.surfaces(), width, height)?;

    let interrupt = Arc::new(AtomicBool::new(false));
    let handler_flag = interrupt.clone();
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst))?;

    match mode {
        DisplayMode::Headless => {}
        DisplayMode::Preview => log::info!("Camera window will be displayed (press 'q' to quit)"),
        DisplayMode::DualScreen | DisplayMode::DualText => {
            log::info!("Dual screen display enabled ({} windows)", mode.surfaces().len());
            log::info!("Press 'q' in any window to quit");
        }
    }
    log::info!("Press Ctrl+C to stop");

    let settings = LoopSettings {
        mode,
        interval: Duration::from_secs(capture.interval_seconds),
        display: config.display.clone(),
    };
    let mut driver = CaptureLoop::new(source, captioner, sink, settings, interrupt);
    Ok(driver.run())
}
