//! The capture/caption driver.
//!
//! A single thread pulls a frame per iteration, shows it, and every
//! `interval` hands one frame to the captioner. Captioning blocks the loop
//! for the whole inference, so the effective caption cadence is the larger
//! of the interval and the inference time.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use camwin_bridge::DisplayConfig;
use camwin_camera::FrameSource;
use camwin_captions::{Caption, Captioner};
use camwin_display::{CaptionRenderer, RenderSink, Surface, overlay};
use image::RgbImage;

use crate::state::{CaptionHistory, DisplayMode, LoopState, StopReason};

/// Pause between two iterations so an idle loop does not spin a core.
pub const FRAME_PAUSE: Duration = Duration::from_millis(30);

/// Immutable settings of a [`CaptureLoop`].
#[derive(Debug, Clone)]
pub struct LoopSettings {
    pub mode: DisplayMode,
    /// Time between two captions. Raised to one second if shorter.
    pub interval: Duration,
    pub display: DisplayConfig,
}

/// Drives frame capture, captioning and display until stopped.
///
/// The loop owns its collaborators. Whatever ends it (a quit request, an
/// interrupt or a failed frame read), the camera is released and the
/// windows are closed exactly once, either by [`CaptureLoop::run`] or when
/// the loop is dropped.
pub struct CaptureLoop<S: FrameSource, C: Captioner, R: RenderSink> {
    source: S,
    captioner: C,
    sink: R,
    renderer: CaptionRenderer,
    history: CaptionHistory,
    mode: DisplayMode,
    interval: Duration,
    interrupt: Arc<AtomicBool>,
    state: LoopState,
    last_caption_at: Option<Instant>,
    last_caption: String,
    cleaned_up: bool,
}

impl<S: FrameSource, C: Captioner, R: RenderSink> CaptureLoop<S, C, R> {
    /// Builds an idle loop. Setting `interrupt` to `true` from any thread
    /// stops the loop at the start of its next iteration.
    pub fn new(
        source: S,
        captioner: C,
        sink: R,
        settings: LoopSettings,
        interrupt: Arc<AtomicBool>,
    ) -> Self {
        let renderer = CaptionRenderer::new(&settings.display);
        let history = CaptionHistory::for_mode(
            settings.mode,
            settings.display.max_captions,
            renderer.layout().capacity(),
        );

        Self {
            source,
            captioner,
            sink,
            renderer,
            history,
            mode: settings.mode,
            interval: settings.interval.max(Duration::from_secs(1)),
            interrupt,
            state: LoopState::Idle,
            last_caption_at: None,
            last_caption: String::new(),
            cleaned_up: false,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn history(&self) -> &CaptionHistory {
        &self.history
    }

    /// Text of the most recent caption, empty before the first one.
    pub fn last_caption(&self) -> &str {
        &self.last_caption
    }

    /// Moves an idle loop to `Running` and draws the empty caption windows.
    pub fn start(&mut self) {
        if self.state != LoopState::Idle {
            return;
        }
        self.state = LoopState::Running;
        log::info!(
            "Starting caption generation every {} seconds...",
            self.interval.as_secs()
        );
        self.render_history();
    }

    /// Runs one iteration at time `now` and returns the resulting state.
    /// Does nothing unless the loop is running.
    pub fn tick(&mut self, now: Instant) -> LoopState {
        if self.state != LoopState::Running {
            return self.state;
        }

        if self.interrupt.load(Ordering::SeqCst) {
            return self.stop(StopReason::Interrupted);
        }

        let image = match self.source.read_frame().and_then(|frame| frame.into_rgb()) {
            Ok(image) => image,
            Err(e) => {
                log::error!("Failed to grab frame: {e}");
                return self.stop(StopReason::FrameReadFailure);
            }
        };

        self.show_camera(&image);
        if self.sink.poll_quit() {
            return self.stop(StopReason::QuitRequested);
        }

        let due = self
            .last_caption_at
            .is_none_or(|at| now.saturating_duration_since(at) >= self.interval);
        if due {
            self.caption_frame(&image);
            self.last_caption_at = Some(now);
        }

        self.state
    }

    /// Starts the loop, iterates until it stops and cleans up. Returns why
    /// the loop stopped.
    pub fn run(&mut self) -> StopReason {
        self.start();
        let reason = loop {
            match self.tick(Instant::now()) {
                LoopState::Stopped(reason) => break reason,
                _ => thread::sleep(FRAME_PAUSE),
            }
        };
        self.shutdown();
        reason
    }

    /// Releases the camera and closes every window. Only the first call
    /// has an effect.
    pub fn shutdown(&mut self) {
        if self.cleaned_up {
            return;
        }
        self.cleaned_up = true;
        if self.state == LoopState::Running || self.state == LoopState::Idle {
            self.state = LoopState::Stopped(StopReason::QuitRequested);
        }
        self.source.release();
        self.sink.close();
    }

    fn stop(&mut self, reason: StopReason) -> LoopState {
        log::info!("Capture loop stopped: {reason}");
        self.state = LoopState::Stopped(reason);
        self.state
    }

    fn caption_frame(&mut self, image: &RgbImage) {
        let stamp = overlay::clock_stamp();
        log::info!("[{stamp}] Processing frame...");
        let text = self.captioner.caption(image);
        log::info!("[{stamp}] {text}");

        self.last_caption = text.clone();
        self.history.push(Caption::new(text));
        self.render_history();
        self.show_camera(image);
    }

    fn show_camera(&mut self, image: &RgbImage) {
        if !self.mode.shows_camera() {
            return;
        }
        let canvas = self.renderer.render_camera(image, &self.last_caption);
        self.present(Surface::Camera, &canvas);
    }

    fn render_history(&mut self) {
        let surfaces = self.mode.surfaces();
        let total = self.history.total_added();

        if surfaces.contains(&Surface::Text) {
            let canvas = self
                .renderer
                .render_history(self.history.primary().texts(), total);
            self.present(Surface::Text, &canvas);
        }

        if surfaces.contains(&Surface::OverflowText) {
            if let Some(overflow) = self.history.overflow() {
                let canvas = self.renderer.render_history(overflow.texts(), total);
                self.present(Surface::OverflowText, &canvas);
            }
        }
    }

    fn present(&mut self, surface: Surface, canvas: &RgbImage) {
        if let Err(e) = self.sink.show(surface, canvas) {
            log::warn!("Failed to show {surface:?}: {e}");
        }
    }
}

impl<S: FrameSource, C: Captioner, R: RenderSink> Drop for CaptureLoop<S, C, R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
