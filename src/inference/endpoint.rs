use crate::{
    error::{FluxError, Result},
    models::InferenceRequest,
};
use reqwest::{header, Client, Response};

/// Longest slice of an error body copied into logs and error messages.
const ERROR_EXCERPT_LEN: usize = 200;

/// A hosted model reachable with `POST {"inputs": ...}`, optionally behind a
/// bearer token.
#[derive(Clone)]
pub struct HostedEndpoint {
    client: Client,
    url: String,
    token: Option<String>,
}

impl HostedEndpoint {
    pub fn new(client: Client, url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            token: Some(token.into()),
        }
    }

    pub fn without_token(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            token: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends one request. Transport failures become `RequestError`, non-2xx
    /// statuses become `ResponseError`; both are logged here.
    pub async fn post_inputs(&self, inputs: &str) -> Result<Response> {
        let mut request = self.client.post(&self.url);
        if let Some(token) = &self.token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let response = request
            .json(&InferenceRequest::new(inputs))
            .send()
            .await
            .map_err(|e| {
                log::error!("Request to {} failed: {}", self.url, e);
                FluxError::RequestError(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let excerpt = excerpt(&body);
        log::error!("{} answered {}: {}", self.url, status, excerpt);
        Err(FluxError::ResponseError(format!("HTTP {}: {}", status, excerpt)))
    }
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(ERROR_EXCERPT_LEN) {
        Some((cut, _)) => format!("{}…", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_is_bounded_on_char_boundaries() {
        assert_eq!(excerpt("  short  "), "short");
        let long = "错".repeat(ERROR_EXCERPT_LEN + 10);
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), ERROR_EXCERPT_LEN + 1);
        assert!(cut.ends_with('…'));
    }
}
