use std::num::NonZeroUsize;

use camwin_bridge::CaptureConfig;
use camwin_captions::{Caption, CaptionBuffer, DualCaptionBuffer};
use camwin_display::Surface;

/// Why the capture loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The user pressed `q` or closed a window.
    QuitRequested,
    /// The process received an interrupt (Ctrl+C).
    Interrupted,
    /// The camera did not deliver a usable frame.
    FrameReadFailure,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(match self {
            StopReason::QuitRequested => "quit requested via display window",
            StopReason::Interrupted => "stopped by user",
            StopReason::FrameReadFailure => "frame read failure",
        })
    }
}

/// Lifecycle of the capture loop. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped(StopReason),
}

/// Which windows the loop drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// No windows; captions only reach the log.
    Headless,
    /// A single camera window with the caption overlay.
    Preview,
    /// Camera window plus one caption history window.
    DualScreen,
    /// Camera window plus two caption history windows, the second one
    /// receiving captions that overflow the first.
    DualText,
}

impl DisplayMode {
    /// Picks the richest mode enabled in `config`.
    pub fn from_config(config: &CaptureConfig) -> Self {
        if config.dual_text {
            DisplayMode::DualText
        } else if config.dual_screen {
            DisplayMode::DualScreen
        } else if config.show_camera {
            DisplayMode::Preview
        } else {
            DisplayMode::Headless
        }
    }

    /// Surfaces to open, left to right.
    pub fn surfaces(&self) -> &'static [Surface] {
        match self {
            DisplayMode::Headless => &[],
            DisplayMode::Preview => &[Surface::Camera],
            DisplayMode::DualScreen => &[Surface::Camera, Surface::Text],
            DisplayMode::DualText => &[Surface::Camera, Surface::Text, Surface::OverflowText],
        }
    }

    pub fn shows_camera(&self) -> bool {
        self.surfaces().contains(&Surface::Camera)
    }
}

/// Caption history behind the text windows.
#[derive(Debug)]
pub enum CaptionHistory {
    Single(CaptionBuffer),
    Dual(DualCaptionBuffer),
}

impl CaptionHistory {
    /// History for `mode`. `max_captions` bounds the single history window,
    /// `window_capacity` (captions fitting one window) bounds each half of
    /// the dual history. Zero capacities are raised to one.
    pub fn for_mode(mode: DisplayMode, max_captions: usize, window_capacity: usize) -> Self {
        match mode {
            DisplayMode::DualText => {
                CaptionHistory::Dual(DualCaptionBuffer::new(at_least_one(window_capacity)))
            }
            _ => CaptionHistory::Single(CaptionBuffer::new(at_least_one(max_captions))),
        }
    }

    pub fn push(&mut self, caption: Caption) {
        let dropped = match self {
            CaptionHistory::Single(buffer) => buffer.push(caption),
            CaptionHistory::Dual(buffer) => buffer.push(caption),
        };
        if let Some(dropped) = dropped {
            log::debug!("Dropped caption from history: {dropped}");
        }
    }

    /// Number of captions ever added.
    pub fn total_added(&self) -> u64 {
        match self {
            CaptionHistory::Single(buffer) => buffer.total_added(),
            CaptionHistory::Dual(buffer) => buffer.total_added(),
        }
    }

    /// The buffer shown in the main caption window.
    pub fn primary(&self) -> &CaptionBuffer {
        match self {
            CaptionHistory::Single(buffer) => buffer,
            CaptionHistory::Dual(buffer) => buffer.primary(),
        }
    }

    /// The buffer shown in the overflow window, if there is one.
    pub fn overflow(&self) -> Option<&CaptionBuffer> {
        match self {
            CaptionHistory::Single(_) => None,
            CaptionHistory::Dual(buffer) => Some(buffer.secondary()),
        }
    }
}

fn at_least_one(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity).unwrap_or_else(|| {
        log::warn!("Caption capacity of 0 is not usable, keeping one caption instead");
        NonZeroUsize::MIN
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn richest_enabled_mode_wins() {
        let mut config = CaptureConfig::default();
        assert_eq!(DisplayMode::from_config(&config), DisplayMode::Headless);
        config.show_camera = true;
        assert_eq!(DisplayMode::from_config(&config), DisplayMode::Preview);
        config.dual_screen = true;
        assert_eq!(DisplayMode::from_config(&config), DisplayMode::DualScreen);
        config.dual_text = true;
        assert_eq!(DisplayMode::from_config(&config), DisplayMode::DualText);
    }

    #[test]
    fn only_headless_mode_hides_the_camera() {
        assert!(!DisplayMode::Headless.shows_camera());
        assert!(DisplayMode::Preview.shows_camera());
        assert_eq!(DisplayMode::DualText.surfaces().len(), 3);
    }

    #[test]
    fn single_history_uses_max_captions() {
        let history = CaptionHistory::for_mode(DisplayMode::DualScreen, 200, 100);
        assert_eq!(history.primary().capacity().get(), 200);
        assert!(history.overflow().is_none());
    }

    #[test]
    fn dual_history_uses_window_capacity() {
        let mut history = CaptionHistory::for_mode(DisplayMode::DualText, 200, 2);
        for text in ["A", "B", "C"] {
            history.push(Caption::new(text));
        }

        let primary: Vec<&str> = history.primary().texts().collect();
        let overflow: Vec<&str> = history.overflow().unwrap().texts().collect();
        assert_eq!(primary, ["B", "C"]);
        assert_eq!(overflow, ["A"]);
        assert_eq!(history.total_added(), 3);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut history = CaptionHistory::for_mode(DisplayMode::Headless, 0, 0);
        history.push(Caption::new("A"));
        history.push(Caption::new("B"));
        assert_eq!(history.primary().texts().collect::<Vec<_>>(), ["B"]);
    }

    #[test]
    fn stop_reasons_read_like_log_lines() {
        assert_eq!(StopReason::FrameReadFailure.to_string(), "frame read failure");
    }
}
