use crate::{
    error::Result,
    inference::{ImageGenerator, Translator},
    logger,
    models::{GeneratedImage, Prompt, TranslatedPrompt},
};
use std::sync::Arc;
use uuid::Uuid;

/// A finished run: what the user typed, what was sent, what came back.
#[derive(Debug, Clone)]
pub struct Generation {
    pub request_id: Uuid,
    pub prompt: Prompt,
    pub translated: TranslatedPrompt,
    pub image: GeneratedImage,
}

/// Translate, generate, decode. Stops at the first failing stage.
///
/// Holds the stages behind `Arc` so one instance serves every request.
#[derive(Clone)]
pub struct Pipeline {
    translator: Arc<dyn Translator>,
    generator: Arc<dyn ImageGenerator>,
}

impl Pipeline {
    pub fn new(translator: Arc<dyn Translator>, generator: Arc<dyn ImageGenerator>) -> Self {
        Self {
            translator,
            generator,
        }
    }

    pub async fn generate_image(&self, prompt: impl Into<Prompt>) -> Result<Generation> {
        let prompt = prompt.into();
        let request_id = Uuid::new_v4();
        let rid = request_id.to_string();
        let _timer = logger::timer("generation").with_request_id(rid.as_str());

        log::info!(request_id = rid.as_str(); "New prompt: '{}'", prompt.as_str());

        let translated = self.translator.translate(&prompt).await.map_err(|e| {
            log::warn!(request_id = rid.as_str(); "Stopping after translation: {}", e);
            e
        })?;

        let bytes = self.generator.generate(&translated).await.map_err(|e| {
            log::warn!(request_id = rid.as_str(); "Stopping after image request: {}", e);
            e
        })?;

        let image = GeneratedImage::decode(&bytes).map_err(|e| {
            log::error!(request_id = rid.as_str(); "{}", e);
            e
        })?;

        log::info!(
            request_id = rid.as_str();
            "Got {:?} image {}x{}",
            image.format(),
            image.width(),
            image.height()
        );

        Ok(Generation {
            request_id,
            prompt,
            translated,
            image,
        })
    }
}
