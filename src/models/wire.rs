use serde::{Deserialize, Serialize};

/// JSON body accepted by the hosted inference endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRequest {
    pub inputs: String,
}

impl InferenceRequest {
    pub fn new(inputs: impl Into<String>) -> Self {
        Self {
            inputs: inputs.into(),
        }
    }
}

/// One element of the translation endpoint's response array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationCandidate {
    pub translation_text: String,
}

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

/// Body of `POST /generate` (the HTML form).
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub kind: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inference_request_shape() {
        let body = serde_json::to_value(InferenceRequest::new("a cat")).unwrap();
        assert_eq!(body, serde_json::json!({ "inputs": "a cat" }));
    }

    #[test]
    fn test_translation_candidates_parse() {
        let raw = r#"[{"translation_text":"a cat"},{"translation_text":"one cat"}]"#;
        let candidates: Vec<TranslationCandidate> = serde_json::from_str(raw).unwrap();
        assert_eq!(candidates[0].translation_text, "a cat");
    }
}
