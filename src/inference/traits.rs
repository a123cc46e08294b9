use crate::{
    error::Result,
    models::{Prompt, TranslatedPrompt},
};
use async_trait::async_trait;

/// Chinese to English translation model.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Returns the model's top candidate for `prompt`.
    async fn translate(&self, prompt: &Prompt) -> Result<TranslatedPrompt>;
}

/// Hosted text-to-image model. Returns the encoded image exactly as received.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &TranslatedPrompt) -> Result<Vec<u8>>;
}
