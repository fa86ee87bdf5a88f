use std::time::Instant;

use candle_core::{DType, Device, Module, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::{generation::LogitsProcessor, models::blip};
use camwin_bridge::ModelInfo;
use image::{DynamicImage, RgbImage, imageops::FilterType};
use tokenizers::Tokenizer;

use crate::{BlipVariant, CaptionError, Captioner};

/// Side length of the square image the vision encoder expects.
const IMAGE_SIZE: u32 = 384;
/// Token the text decoder starts every caption with (`[DEC]`).
const BOS_TOKEN_ID: u32 = 30522;
/// Token that ends a caption (`[SEP]`).
const SEP_TOKEN_ID: u32 = 102;
/// Upper bound on generated tokens, matching a 50 token `max_length`.
const MAX_NEW_TOKENS: usize = 50;

const IMAGE_MEAN: [f32; 3] = [0.481_454_66, 0.457_827_5, 0.408_210_73];
const IMAGE_STD: [f32; 3] = [0.268_629_54, 0.261_302_6, 0.275_777_1];

/// BLIP image captioning model running on the CPU.
pub struct BlipCaptioner {
    model_name: String,
    model: blip::BlipForConditionalGeneration,
    tokenizer: Tokenizer,
    device: Device,
}

impl BlipCaptioner {
    /// Downloads (or reuses the cached copy of) the checkpoint of `variant`
    /// from the Hugging Face hub and loads its weights and tokenizer.
    pub fn load(variant: BlipVariant) -> Result<Self, CaptionError> {
        let model_name = variant.model_id();
        let load_error = |reason: String| CaptionError::Load {
            model: model_name.to_string(),
            reason,
        };

        log::info!("Loading {model_name}...");
        let device = Device::Cpu;
        log::info!("Using device: cpu");

        let api = hf_hub::api::sync::Api::new().map_err(|e| load_error(e.to_string()))?;
        let repo = api.repo(hf_hub::Repo::with_revision(
            model_name.to_string(),
            hf_hub::RepoType::Model,
            variant.revision().to_string(),
        ));
        let weights = repo
            .get("model.safetensors")
            .map_err(|e| load_error(e.to_string()))?;
        let tokenizer_path = api
            .model(model_name.to_string())
            .get("tokenizer.json")
            .map_err(|e| load_error(e.to_string()))?;

        let tokenizer =
            Tokenizer::from_file(tokenizer_path).map_err(|e| load_error(e.to_string()))?;

        let config = model_config(variant);
        let bytes = std::fs::read(&weights).map_err(|e| load_error(e.to_string()))?;
        let vb = VarBuilder::from_buffered_safetensors(bytes, DType::F32, &device)
            .map_err(|e| load_error(e.to_string()))?;
        let model = blip::BlipForConditionalGeneration::new(&config, vb)
            .map_err(|e| load_error(e.to_string()))?;

        log::info!("Model loaded successfully");
        Ok(Self {
            model_name: model_name.to_string(),
            model,
            tokenizer,
            device,
        })
    }

    /// Resizes, normalizes and lays out `image` as a `(3, 384, 384)` tensor.
    fn image_to_tensor(&self, image: &RgbImage) -> candle_core::Result<Tensor> {
        let resized = DynamicImage::ImageRgb8(image.clone())
            .resize_to_fill(IMAGE_SIZE, IMAGE_SIZE, FilterType::Triangle)
            .to_rgb8();
        let side = IMAGE_SIZE as usize;
        let data = Tensor::from_vec(resized.into_raw(), (side, side, 3), &self.device)?
            .permute((2, 0, 1))?;

        let mean = Tensor::new(&IMAGE_MEAN, &self.device)?.reshape((3, 1, 1))?;
        let std = Tensor::new(&IMAGE_STD, &self.device)?.reshape((3, 1, 1))?;
        (data.to_dtype(DType::F32)? / 255.)?
            .broadcast_sub(&mean)?
            .broadcast_div(&std)
    }

    /// Runs greedy decoding over the image embeddings and returns token ids
    /// without the leading `[DEC]` token.
    fn generate(&mut self, image: &RgbImage) -> candle_core::Result<Vec<u32>> {
        let pixels = self.image_to_tensor(image)?.unsqueeze(0)?;
        let image_embeds = self.model.vision_model().forward(&pixels)?;

        // no temperature means argmax sampling
        let mut logits_processor = LogitsProcessor::new(0, None, None);
        let mut token_ids = vec![BOS_TOKEN_ID];
        for index in 0..MAX_NEW_TOKENS {
            let context_size = if index > 0 { 1 } else { token_ids.len() };
            let start = token_ids.len().saturating_sub(context_size);
            let input_ids = Tensor::new(&token_ids[start..], &self.device)?.unsqueeze(0)?;

            let logits = self
                .model
                .text_decoder()
                .forward(&input_ids, &image_embeds)?
                .squeeze(0)?;
            let logits = logits.get(logits.dim(0)? - 1)?;
            let token = logits_processor.sample(&logits)?;
            if token == SEP_TOKEN_ID {
                break;
            }
            token_ids.push(token);
        }
        self.model.reset_kv_cache();

        Ok(token_ids.split_off(1))
    }
}

/// Architecture of `variant`. The base checkpoint shares the text decoder
/// of the large one and only has a smaller vision encoder.
fn model_config(variant: BlipVariant) -> blip::Config {
    let mut config = blip::Config::image_captioning_large();
    let vision = variant.vision();
    config.vision_config.hidden_size = vision.hidden_size;
    config.vision_config.intermediate_size = vision.intermediate_size;
    config.vision_config.num_hidden_layers = vision.num_hidden_layers;
    config.vision_config.num_attention_heads = vision.num_attention_heads;
    config.text_config.encoder_hidden_size = vision.hidden_size;
    config
}

impl Captioner for BlipCaptioner {
    fn try_caption(&mut self, image: &RgbImage) -> Result<String, CaptionError> {
        let start = Instant::now();
        let token_ids = match self.generate(image) {
            Ok(ids) => ids,
            Err(e) => {
                self.model.reset_kv_cache();
                return Err(CaptionError::Inference(e.to_string()));
            }
        };

        let text = self
            .tokenizer
            .decode(&token_ids, true)
            .map_err(|e| CaptionError::Inference(e.to_string()))?;

        log::info!("Captioning took {}ms.", start.elapsed().as_millis());
        Ok(text.trim().to_string())
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            model_name: self.model_name.clone(),
            device: "cpu".to_string(),
            loaded: true,
        }
    }
}
