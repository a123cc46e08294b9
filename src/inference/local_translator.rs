//! In-process Chinese to English translation.
//!
//! The model lives on one dedicated thread for the whole process and is fed
//! through a channel; request handlers only ever await the answer.

use crate::{
    error::{FluxError, Result},
    inference::{translation_client::top_candidate, traits::Translator},
    models::{Prompt, TranslatedPrompt},
};
use async_trait::async_trait;
use std::sync::mpsc as std_mpsc;
use tokio::sync::{mpsc, oneshot};

/// Queue depth between the web handlers and the model thread.
const QUEUE_DEPTH: usize = 16;

/// A translation model that runs synchronously on the calling thread.
pub trait TranslationModel {
    /// Candidates for `text`, best first.
    fn translate(&self, text: &str) -> std::result::Result<Vec<String>, String>;
}

struct Job {
    text: String,
    response_tx: oneshot::Sender<std::result::Result<Vec<String>, String>>,
}

/// Handle to the model thread. Clones share the same model.
#[derive(Clone)]
pub struct LocalTranslator {
    jobs: mpsc::Sender<Job>,
}

impl LocalTranslator {
    /// Starts the model thread and waits until `load` has finished there.
    ///
    /// A model that fails to load is a startup error.
    pub fn spawn<M, F>(load: F) -> Result<Self>
    where
        M: TranslationModel + 'static,
        F: FnOnce() -> std::result::Result<M, String> + Send + 'static,
    {
        let (jobs_tx, mut jobs_rx) = mpsc::channel::<Job>(QUEUE_DEPTH);
        let (ready_tx, ready_rx) = std_mpsc::channel::<std::result::Result<(), String>>();

        std::thread::Builder::new()
            .name("translation-model".to_string())
            .spawn(move || {
                let model = match load() {
                    Ok(model) => {
                        let _ = ready_tx.send(Ok(()));
                        model
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                while let Some(job) = jobs_rx.blocking_recv() {
                    let _ = job.response_tx.send(model.translate(&job.text));
                }
                log::debug!("Translation model thread stopped");
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                log::info!("✅ Translation model loaded");
                Ok(Self { jobs: jobs_tx })
            }
            Ok(Err(e)) => Err(FluxError::ConfigError(format!(
                "translation model failed to load: {}",
                e
            ))),
            Err(_) => Err(FluxError::ConfigError(
                "translation model thread died while loading".into(),
            )),
        }
    }
}

#[async_trait]
impl Translator for LocalTranslator {
    async fn translate(&self, prompt: &Prompt) -> Result<TranslatedPrompt> {
        if prompt.is_blank() {
            log::warn!("Refusing to translate an empty prompt");
            return Err(FluxError::EmptyPrompt);
        }

        let (response_tx, response_rx) = oneshot::channel();
        self.jobs
            .send(Job {
                text: prompt.as_str().to_string(),
                response_tx,
            })
            .await
            .map_err(|_| {
                log::error!("Translation model thread is gone");
                FluxError::TranslationError("translation model is not running".into())
            })?;

        let candidates = response_rx
            .await
            .map_err(|_| {
                log::error!("Translation model dropped the request");
                FluxError::TranslationError("translation model stopped mid-request".into())
            })?
            .map_err(|e| {
                log::error!("Translation model failed: {}", e);
                FluxError::TranslationError(e)
            })?;

        let translated = top_candidate(candidates)?;
        log::info!("Translated '{}' -> '{}'", prompt.as_str(), translated.as_str());
        Ok(translated)
    }
}

/// Helsinki-NLP `opus-mt-zh-en` through rust-bert's Marian pipeline.
#[cfg(feature = "local-model")]
pub mod marian {
    use super::TranslationModel;
    use rust_bert::pipelines::common::ModelType;
    use rust_bert::pipelines::translation::{
        Language, TranslationModel as RustBertTranslation, TranslationModelBuilder,
    };

    pub struct MarianZhEn {
        model: RustBertTranslation,
    }

    impl MarianZhEn {
        /// Downloads the weights on first use, then loads them from the cache.
        pub fn load() -> Result<Self, String> {
            let model = TranslationModelBuilder::new()
                .with_model_type(ModelType::Marian)
                .with_source_languages(vec![Language::ChineseMandarin])
                .with_target_languages(vec![Language::English])
                .create_model()
                .map_err(|e| e.to_string())?;
            Ok(Self { model })
        }
    }

    impl TranslationModel for MarianZhEn {
        fn translate(&self, text: &str) -> Result<Vec<String>, String> {
            self.model
                .translate(&[text], Language::ChineseMandarin, Language::English)
                .map_err(|e| e.to_string())
        }
    }
}
