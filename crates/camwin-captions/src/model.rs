use crate::CaptionError;

/// Vision transformer dimensions that differ between BLIP checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisionSize {
    pub hidden_size: usize,
    pub intermediate_size: usize,
    pub num_hidden_layers: usize,
    pub num_attention_heads: usize,
}

/// The BLIP captioning checkpoints the engine knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlipVariant {
    Base,
    Large,
}

impl BlipVariant {
    pub const ALL: [BlipVariant; 2] = [BlipVariant::Base, BlipVariant::Large];

    /// Resolves a Hugging Face repository id.
    pub fn from_model_id(model: &str) -> Result<Self, CaptionError> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.model_id() == model)
            .ok_or_else(|| CaptionError::UnknownModel {
                model: model.to_string(),
                supported: Self::ALL.map(Self::model_id).join(", "),
            })
    }

    pub fn model_id(self) -> &'static str {
        match self {
            BlipVariant::Base => "Salesforce/blip-image-captioning-base",
            BlipVariant::Large => "Salesforce/blip-image-captioning-large",
        }
    }

    /// Repository revision holding `model.safetensors`. The large
    /// checkpoint only publishes it on a pull request branch.
    pub fn revision(self) -> &'static str {
        match self {
            BlipVariant::Base => "main",
            BlipVariant::Large => "refs/pr/18",
        }
    }

    pub fn vision(self) -> VisionSize {
        match self {
            BlipVariant::Base => VisionSize {
                hidden_size: 768,
                intermediate_size: 3072,
                num_hidden_layers: 12,
                num_attention_heads: 12,
            },
            BlipVariant::Large => VisionSize {
                hidden_size: 1024,
                intermediate_size: 4096,
                num_hidden_layers: 24,
                num_attention_heads: 16,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_checkpoints_resolve_to_their_own_weights() {
        let base = BlipVariant::from_model_id("Salesforce/blip-image-captioning-base").unwrap();
        assert_eq!(base, BlipVariant::Base);
        assert_eq!(base.revision(), "main");
        assert_eq!(base.vision().hidden_size, 768);
        assert_eq!(base.vision().num_hidden_layers, 12);

        let large = BlipVariant::from_model_id(camwin_bridge::config::DEFAULT_MODEL).unwrap();
        assert_eq!(large, BlipVariant::Large);
        assert_eq!(large.revision(), "refs/pr/18");
        assert_eq!(large.vision().hidden_size, 1024);
        assert_eq!(large.vision().num_attention_heads, 16);
    }

    #[test]
    fn unknown_model_lists_the_supported_ids() {
        let error = BlipVariant::from_model_id("Salesforce/blip2-opt-2.7b").unwrap_err();
        let text = error.to_string();
        assert!(text.contains("Salesforce/blip2-opt-2.7b"));
        assert!(text.contains("Salesforce/blip-image-captioning-base"));
        assert!(text.contains("Salesforce/blip-image-captioning-large"));
    }
}
