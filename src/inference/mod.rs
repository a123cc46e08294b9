pub mod endpoint;
pub mod image_client;
pub mod local_translator;
#[cfg(test)]
pub(crate) mod stub;
pub mod traits;
pub mod translation_client;

use crate::{
    config::{AppConfig, TranslationBackend},
    error::Result,
    pipeline::Pipeline,
};
use std::sync::Arc;

pub use endpoint::HostedEndpoint;
pub use image_client::ImageClient;
pub use local_translator::{LocalTranslator, TranslationModel};
pub use traits::{ImageGenerator, Translator};
pub use translation_client::TranslationClient;

/// The translator and the image model, built once at startup.
///
/// Clones are cheap and share the model thread and the HTTP connection pool.
#[derive(Clone)]
pub struct FluxClient {
    translator: Arc<dyn Translator>,
    image_client: ImageClient,
}

impl FluxClient {
    /// Builds both stages. With the local backend this loads the translation
    /// model, which can take a while on first run.
    pub fn new(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::new();

        let translator: Arc<dyn Translator> = match config.translation_backend {
            TranslationBackend::Local => Arc::new(load_local_translator()?),
            TranslationBackend::Hosted => {
                let endpoint = match config.translation_token() {
                    Some(token) => HostedEndpoint::new(
                        http.clone(),
                        config.translation_api_url.clone(),
                        token,
                    ),
                    None => HostedEndpoint::without_token(
                        http.clone(),
                        config.translation_api_url.clone(),
                    ),
                };
                Arc::new(TranslationClient::new(endpoint))
            }
        };

        Self::with_translator(config, translator)
    }

    /// Uses `translator` instead of the configured backend.
    pub fn with_translator(config: &AppConfig, translator: Arc<dyn Translator>) -> Result<Self> {
        config.validate()?;
        let image_client = ImageClient::new(HostedEndpoint::new(
            reqwest::Client::new(),
            config.flux_api_url.clone(),
            config.token()?,
        ));
        Ok(Self {
            translator,
            image_client,
        })
    }

    pub fn into_pipeline(self) -> Pipeline {
        Pipeline::new(self.translator, Arc::new(self.image_client))
    }
}

#[cfg(feature = "local-model")]
fn load_local_translator() -> Result<LocalTranslator> {
    log::info!("🔄 Loading translation model (opus-mt-zh-en)...");
    LocalTranslator::spawn(local_translator::marian::MarianZhEn::load)
}

#[cfg(not(feature = "local-model"))]
fn load_local_translator() -> Result<LocalTranslator> {
    Err(crate::error::FluxError::ConfigError(format!(
        "built without the `local-model` feature; set {}=hosted",
        crate::config::TRANSLATION_BACKEND_VAR
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::stub::StubEndpoint;
    use crate::models::generated::sample_png;
    use crate::error::FluxError;

    #[test]
    fn test_rejects_config_without_token() {
        let err = FluxClient::new(&AppConfig::new()).err().unwrap();
        assert!(err.is_config());
    }

    #[actix_web::test]
    async fn test_hosted_chain_end_to_end() {
        let translation = StubEndpoint::start(
            200,
            "application/json",
            br#"[{"translation_text":"a cat"}]"#.to_vec(),
        );
        let flux = StubEndpoint::start(200, "image/png", sample_png(5, 4));
        let config = AppConfig::new()
            .with_flux_api_url(flux.url.clone())
            .with_hosted_translation(translation.url.clone())
            .with_auth_token("hf_test");

        let pipeline = FluxClient::new(&config).unwrap().into_pipeline();
        let generation = pipeline.generate_image("一只猫").await.unwrap();
        assert_eq!(generation.translated.as_str(), "a cat");
        assert_eq!((generation.image.width(), generation.image.height()), (5, 4));

        let sent = flux.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, serde_json::json!({ "inputs": "a cat" }));
        assert_eq!(sent[0].authorization.as_deref(), Some("Bearer hf_test"));

        // a non-Hugging Face translation host never sees the image token
        let translated = translation.requests();
        assert_eq!(translated[0].body, serde_json::json!({ "inputs": "一只猫" }));
        assert_eq!(translated[0].authorization, None);

        let err = pipeline.generate_image("").await.unwrap_err();
        assert!(matches!(err, FluxError::EmptyPrompt));
        assert_eq!(translation.requests().len(), 1);
        assert_eq!(flux.requests().len(), 1);
    }

    #[actix_web::test]
    async fn test_local_translator_feeds_image_client() {
        struct Fixed;
        impl TranslationModel for Fixed {
            fn translate(&self, _text: &str) -> std::result::Result<Vec<String>, String> {
                Ok(vec!["two dogs".to_string()])
            }
        }

        let flux = StubEndpoint::start(200, "image/png", sample_png(2, 2));
        let config = AppConfig::new()
            .with_flux_api_url(flux.url.clone())
            .with_auth_token("hf_test");
        let translator = LocalTranslator::spawn(|| Ok(Fixed)).unwrap();

        let pipeline = FluxClient::with_translator(&config, Arc::new(translator))
            .unwrap()
            .into_pipeline();
        pipeline.generate_image("两只狗").await.unwrap();

        assert_eq!(
            flux.requests()[0].body,
            serde_json::json!({ "inputs": "two dogs" })
        );
    }

    #[cfg(not(feature = "local-model"))]
    #[test]
    fn test_local_backend_needs_the_feature() {
        let config = AppConfig::new().with_auth_token("hf_test");
        let err = FluxClient::new(&config).err().unwrap();
        assert!(err.is_config());
    }
}
