/// Description of the captioning model as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    /// Model identifier, e.g. a Hugging Face repository id.
    pub model_name: String,
    /// Device the model runs on.
    pub device: String,
    /// Whether the weights are loaded and ready for inference.
    pub loaded: bool,
}

/// Description of an opened (or not yet opened) camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraInfo {
    /// Index the camera was requested with.
    pub camera_index: u32,
    /// Human-readable name of the device, if known.
    pub name: Option<String>,
    /// Delivered frame width in pixels.
    pub width: u32,
    /// Delivered frame height in pixels.
    pub height: u32,
    /// Delivered frames per second.
    pub fps: u32,
}

/// Snapshot of the whole engine for `--status`.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub model: ModelInfo,
    /// `None` while the camera has not been opened.
    pub camera: Option<CameraInfo>,
    pub camera_index: u32,
    pub show_camera: bool,
    pub dual_screen: bool,
    pub dual_text: bool,
    pub interval_seconds: u64,
}

impl std::fmt::Display for StatusReport {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(formatter, "Model: {}", self.model.model_name)?;
        writeln!(formatter, "Device: {}", self.model.device)?;
        writeln!(formatter, "Model Loaded: {}", self.model.loaded)?;
        match &self.camera {
            Some(camera) => writeln!(
                formatter,
                "Camera Index: {} ({}x{} @ {} fps)",
                camera.camera_index, camera.width, camera.height, camera.fps
            )?,
            None => writeln!(formatter, "Camera Index: {}", self.camera_index)?,
        }
        writeln!(formatter, "Show Camera: {}", self.show_camera)?;
        writeln!(formatter, "Dual Screen: {}", self.dual_screen)?;
        writeln!(formatter, "Dual Text Window: {}", self.dual_text)?;
        write!(formatter, "Interval: {} seconds", self.interval_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_settings_line_by_line() {
        let report = StatusReport {
            model: ModelInfo {
                model_name: "blip".into(),
                device: "cpu".into(),
                loaded: false,
            },
            camera: None,
            camera_index: 2,
            show_camera: true,
            dual_screen: false,
            dual_text: false,
            interval_seconds: 5,
        };

        let text = report.to_string();
        assert!(text.contains("Model: blip"));
        assert!(text.contains("Camera Index: 2\n"));
        assert!(text.ends_with("Interval: 5 seconds"));
    }
}
