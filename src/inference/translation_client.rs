use crate::{
    error::{FluxError, Result},
    inference::{endpoint::HostedEndpoint, traits::Translator},
    models::{Prompt, TranslatedPrompt, TranslationCandidate},
};
use async_trait::async_trait;

/// Chinese to English translation through a hosted `opus-mt-zh-en` model.
#[derive(Clone)]
pub struct TranslationClient {
    endpoint: HostedEndpoint,
}

impl TranslationClient {
    pub fn new(endpoint: HostedEndpoint) -> Self {
        Self { endpoint }
    }

    /// Failures are logged where they occur: transport and status errors in
    /// the endpoint, body problems here.
    async fn request(&self, prompt: &Prompt) -> Result<TranslatedPrompt> {
        let response = self.endpoint.post_inputs(prompt.as_str()).await?;
        let candidates: Vec<TranslationCandidate> = response
            .json()
            .await
            .map_err(|e| {
                log::error!("Unexpected translation body: {}", e);
                FluxError::ResponseError(format!("unexpected translation body: {}", e))
            })?;

        top_candidate(candidates.into_iter().map(|c| c.translation_text))
    }
}

/// First candidate of a model answer, trimmed. Missing or blank is a failure.
pub(crate) fn top_candidate<I>(candidates: I) -> Result<TranslatedPrompt>
where
    I: IntoIterator<Item = String>,
{
    let top = candidates.into_iter().next().ok_or_else(|| {
        log::error!("Translation model returned no candidates");
        FluxError::TranslationError("model returned no candidates".into())
    })?;

    TranslatedPrompt::new(&top).ok_or_else(|| {
        log::error!("Translation model returned an empty translation");
        FluxError::TranslationError("model returned an empty translation".into())
    })
}

#[async_trait]
impl Translator for TranslationClient {
    async fn translate(&self, prompt: &Prompt) -> Result<TranslatedPrompt> {
        if prompt.is_blank() {
            log::warn!("Refusing to translate an empty prompt");
            return Err(FluxError::EmptyPrompt);
        }

        log::debug!("Translating prompt via {}", self.endpoint.url());
        let translated = self.request(prompt).await?;
        log::info!("Translated '{}' -> '{}'", prompt.as_str(), translated.as_str());
        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::stub::{unreachable_url, StubEndpoint};

    fn client_for(url: &str) -> TranslationClient {
        TranslationClient::new(HostedEndpoint::new(reqwest::Client::new(), url, "hf_test"))
    }

    #[actix_web::test]
    async fn test_token_is_optional() {
        let stub = StubEndpoint::start(
            200,
            "application/json",
            br#"[{"translation_text":"a cat"}]"#.to_vec(),
        );
        let client = TranslationClient::new(HostedEndpoint::without_token(
            reqwest::Client::new(),
            stub.url.clone(),
        ));

        client.translate(&Prompt::from("一只猫")).await.unwrap();
        assert_eq!(stub.requests()[0].authorization, None);
    }

    #[actix_web::test]
    async fn test_returns_top_candidate() {
        let stub = StubEndpoint::start(
            200,
            "application/json",
            br#"[{"translation_text":" a cat "},{"translation_text":"one cat"}]"#.to_vec(),
        );

        let translated = client_for(&stub.url)
            .translate(&Prompt::from("一只猫"))
            .await
            .unwrap();
        assert_eq!(translated.as_str(), "a cat");

        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].authorization.as_deref(), Some("Bearer hf_test"));
        assert_eq!(requests[0].body, serde_json::json!({ "inputs": "一只猫" }));
    }

    #[actix_web::test]
    async fn test_empty_prompt_is_rejected_before_the_model() {
        let stub = StubEndpoint::start(200, "application/json", b"[]".to_vec());

        let err = client_for(&stub.url)
            .translate(&Prompt::from("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, FluxError::EmptyPrompt));
        assert!(stub.requests().is_empty());
    }

    #[actix_web::test]
    async fn test_empty_translation_is_failure() {
        let stub = StubEndpoint::start(
            200,
            "application/json",
            br#"[{"translation_text":"   "}]"#.to_vec(),
        );
        let err = client_for(&stub.url)
            .translate(&Prompt::from("。"))
            .await
            .unwrap_err();
        assert!(matches!(err, FluxError::TranslationError(_)));
    }

    #[actix_web::test]
    async fn test_no_candidates_is_failure() {
        let stub = StubEndpoint::start(200, "application/json", b"[]".to_vec());
        let err = client_for(&stub.url)
            .translate(&Prompt::from("一只猫"))
            .await
            .unwrap_err();
        assert!(matches!(err, FluxError::TranslationError(_)));
    }

    #[actix_web::test]
    async fn test_model_error_status_is_failure() {
        let stub = StubEndpoint::start(
            503,
            "application/json",
            br#"{"error":"Model Helsinki-NLP/opus-mt-zh-en is currently loading"}"#.to_vec(),
        );
        let err = client_for(&stub.url)
            .translate(&Prompt::from("一只猫"))
            .await
            .unwrap_err();
        assert!(matches!(err, FluxError::ResponseError(_)));
        assert!(err.to_string().contains("503"));
    }

    #[actix_web::test]
    async fn test_malformed_body_is_failure() {
        let stub = StubEndpoint::start(200, "text/plain", b"not json".to_vec());
        let err = client_for(&stub.url)
            .translate(&Prompt::from("一只猫"))
            .await
            .unwrap_err();
        assert!(matches!(err, FluxError::ResponseError(_)));
    }

    #[actix_web::test]
    async fn test_transport_failure() {
        let err = client_for(&unreachable_url())
            .translate(&Prompt::from("一只猫"))
            .await
            .unwrap_err();
        assert!(matches!(err, FluxError::RequestError(_)));
    }
}
