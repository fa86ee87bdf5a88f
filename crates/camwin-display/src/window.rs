use std::collections::HashSet;

use image::RgbImage;
use minifb::{Key, ScaleMode, Window, WindowOptions};

use crate::{
    DisplayError,
    canvas::to_packed_rgb,
    sink::{RenderSink, Surface},
};

/// Horizontal gap between two windows placed side by side.
const WINDOW_GAP: isize = 50;
/// Top-left corner of the first window.
const WINDOW_ORIGIN: isize = 100;

/// Native windows, one per surface, drawn with `minifb`.
pub struct WindowSink {
    windows: Vec<(Surface, Window)>,
    /// Surfaces that received a canvas since the last `poll_quit`.
    updated: HashSet<Surface>,
}

impl WindowSink {
    /// Opens one `width` x `height` window for each of `surfaces`, left to
    /// right in the given order.
    pub fn open(surfaces: &[Surface], width: u32, height: u32) -> Result<Self, DisplayError> {
        let mut windows = Vec::with_capacity(surfaces.len());
        for (index, surface) in surfaces.iter().enumerate() {
            let mut window = Window::new(
                surface.title(),
                width as usize,
                height as usize,
                WindowOptions {
                    resize: true,
                    scale_mode: ScaleMode::AspectRatioStretch,
                    ..WindowOptions::default()
                },
            )
            .map_err(|e| DisplayError::Window(e.to_string()))?;

            let x = WINDOW_ORIGIN + index as isize * (width as isize + WINDOW_GAP);
            window.set_position(x, WINDOW_ORIGIN);
            log::info!("Opened window {:?} at x={x}", surface.title());
            windows.push((*surface, window));
        }

        Ok(Self {
            windows,
            updated: HashSet::new(),
        })
    }
}

impl RenderSink for WindowSink {
    fn show(&mut self, surface: Surface, canvas: &RgbImage) -> Result<(), DisplayError> {
        let (_, window) = self
            .windows
            .iter_mut()
            .find(|(candidate, _)| *candidate == surface)
            .ok_or(DisplayError::UnknownSurface(surface))?;

        let buffer = to_packed_rgb(canvas);
        window
            .update_with_buffer(&buffer, canvas.width() as usize, canvas.height() as usize)
            .map_err(|e| DisplayError::Window(e.to_string()))?;
        self.updated.insert(surface);
        Ok(())
    }

    fn poll_quit(&mut self) -> bool {
        let mut quit = false;
        for (surface, window) in &mut self.windows {
            // windows that were not redrawn still need their events pumped
            if !self.updated.contains(surface) {
                window.update();
            }
            quit |= !window.is_open() || window.is_key_down(Key::Q);
        }
        self.updated.clear();
        quit
    }

    fn close(&mut self) {
        if !self.windows.is_empty() {
            self.windows.clear();
            log::info!("Display windows closed");
        }
    }
}
