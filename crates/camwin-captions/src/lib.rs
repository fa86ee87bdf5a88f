//! Caption history and the image captioning boundary.
//!
//! This crate provides the capacity-bounded caption buffers that feed the
//! caption windows and the trait through which the capture loop asks a model
//! to describe a frame. A BLIP implementation backed by `candle` is available
//! behind the `blip` feature.

#![forbid(unsafe_code)]

pub mod buffer;
pub mod model;

#[cfg(feature = "blip")]
pub mod blip;

use camwin_bridge::ModelInfo;
use image::RgbImage;

pub use buffer::{Caption, CaptionBuffer, DualCaptionBuffer};
pub use model::BlipVariant;

/// Prefix of the text returned in place of a caption when inference fails.
pub const CAPTION_ERROR_PREFIX: &str = "Error generating caption";

/// Errors that can occur while loading a captioning model or running it.
#[derive(Debug, thiserror::Error)]
pub enum CaptionError {
    /// The model weights, configuration or tokenizer could not be loaded.
    #[error("failed to load model {model}: {reason}")]
    Load { model: String, reason: String },
    /// The model id names no checkpoint the engine can build.
    #[error("unsupported model {model} (supported: {supported})")]
    UnknownModel { model: String, supported: String },
    /// Inference was attempted before the model was loaded.
    #[error("model not loaded")]
    NotLoaded,
    /// Preprocessing, the forward pass or decoding failed.
    #[error("{0}")]
    Inference(String),
    /// The binary was built without any captioning backend.
    #[error("captioning support is not compiled in (enable the `blip` feature)")]
    Unsupported,
}

/// An image-to-text model.
///
/// Captioning is synchronous and may take a long time; the capture loop
/// blocks for the whole duration of [`Captioner::caption`].
pub trait Captioner {
    /// Describes `image` with a single line of text.
    fn try_caption(&mut self, image: &RgbImage) -> Result<String, CaptionError>;

    /// Describes the model for status reports.
    fn info(&self) -> ModelInfo;

    /// Describes `image`, turning any failure into a readable error text so
    /// the caller can display it like a regular caption.
    fn caption(&mut self, image: &RgbImage) -> String {
        match self.try_caption(image) {
            Ok(text) => text,
            Err(CaptionError::NotLoaded) => "Error: Model not loaded".to_string(),
            Err(e) => {
                log::error!("Caption generation failed: {e}");
                format!("{CAPTION_ERROR_PREFIX}: {e}")
            }
        }
    }
}

impl<T: Captioner + ?Sized> Captioner for Box<T> {
    fn try_caption(&mut self, image: &RgbImage) -> Result<String, CaptionError> {
        (**self).try_caption(image)
    }

    fn info(&self) -> ModelInfo {
        (**self).info()
    }
}

/// Loads the model named `model` with the compiled-in backend. Unknown
/// model ids are rejected before anything is downloaded.
pub fn load_captioner(model: &str) -> Result<Box<dyn Captioner>, CaptionError> {
    let variant = BlipVariant::from_model_id(model)?;
    #[cfg(feature = "blip")]
    {
        Ok(Box::new(blip::BlipCaptioner::load(variant)?))
    }
    #[cfg(not(feature = "blip"))]
    {
        log::error!(
            "Cannot load {}: no captioning backend is compiled in",
            variant.model_id()
        );
        Err(CaptionError::Unsupported)
    }
}

/// Describes `model` without loading it, for status reports.
pub fn describe_model(model: &str) -> ModelInfo {
    ModelInfo {
        model_name: model.to_string(),
        device: "cpu".to_string(),
        loaded: false,
    }
}
