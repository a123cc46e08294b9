use crate::{
    error::{FluxError, Result},
    inference::{endpoint::HostedEndpoint, traits::ImageGenerator},
    models::TranslatedPrompt,
};
use async_trait::async_trait;

/// Text-to-image generation through a hosted FLUX model.
#[derive(Clone)]
pub struct ImageClient {
    endpoint: HostedEndpoint,
}

impl ImageClient {
    pub fn new(endpoint: HostedEndpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl ImageGenerator for ImageClient {
    async fn generate(&self, prompt: &TranslatedPrompt) -> Result<Vec<u8>> {
        log::info!("Generating image via {}", self.endpoint.url());

        let response = self.endpoint.post_inputs(prompt.as_str()).await?;
        let bytes = response.bytes().await.map_err(|e| {
            log::error!("Reading image body failed: {}", e);
            FluxError::RequestError(e.to_string())
        })?;

        if bytes.is_empty() {
            log::error!("Image endpoint returned an empty body");
            return Err(FluxError::ResponseError("empty image body".into()));
        }

        log::debug!("Received {} image bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}
