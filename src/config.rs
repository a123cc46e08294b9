use crate::error::{FluxError, Result};
use std::env;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_FLUX_API_URL: &str =
    "https://api-inference.huggingface.co/models/black-forest-labs/FLUX.1-dev";
pub const DEFAULT_TRANSLATION_API_URL: &str =
    "https://api-inference.huggingface.co/models/Helsinki-NLP/opus-mt-zh-en";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7860;

pub const FLUX_API_URL_VAR: &str = "FLUX_API_URL";
pub const AUTH_TOKEN_VAR: &str = "HUGGINGFACE_AUTH_TOKEN";
pub const TRANSLATION_API_URL_VAR: &str = "TRANSLATION_API_URL";
pub const TRANSLATION_BACKEND_VAR: &str = "TRANSLATION_BACKEND";
pub const TRANSLATION_AUTH_TOKEN_VAR: &str = "TRANSLATION_AUTH_TOKEN";
pub const HOST_VAR: &str = "HOST";
pub const PORT_VAR: &str = "PORT";

/// Hugging Face's inference API; the only host that receives the main token
/// for translation without an explicit `TRANSLATION_AUTH_TOKEN`.
const HF_INFERENCE_PREFIX: &str = "https://api-inference.huggingface.co/";

/// Where Chinese prompts get translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationBackend {
    /// Marian `opus-mt-zh-en` loaded into this process.
    Local,
    /// The same model behind an inference endpoint (`TRANSLATION_API_URL`).
    Hosted,
}

impl FromStr for TranslationBackend {
    type Err = FluxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(TranslationBackend::Local),
            "hosted" => Ok(TranslationBackend::Hosted),
            other => Err(FluxError::ConfigError(format!(
                "{} must be 'local' or 'hosted', got '{}'",
                TRANSLATION_BACKEND_VAR, other
            ))),
        }
    }
}

/// Runtime settings for the generator.
///
/// Built from the environment with [`AppConfig::from_env`], or assembled by
/// hand with the `with_*` builders. Call [`AppConfig::validate`] before use;
/// `from_env` already does.
#[derive(Clone)]
pub struct AppConfig {
    pub flux_api_url: String,
    pub translation_backend: TranslationBackend,
    pub translation_api_url: String,
    pub translation_auth_token: Option<String>,
    pub auth_token: Option<String>,
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            flux_api_url: DEFAULT_FLUX_API_URL.to_string(),
            translation_backend: TranslationBackend::Local,
            translation_api_url: DEFAULT_TRANSLATION_API_URL.to_string(),
            translation_auth_token: None,
            auth_token: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

// The token must never reach the logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("flux_api_url", &self.flux_api_url)
            .field("translation_backend", &self.translation_backend)
            .field("translation_api_url", &self.translation_api_url)
            .field(
                "translation_auth_token",
                &self.translation_auth_token.as_ref().map(|_| "<redacted>"),
            )
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads every setting through `lookup` and validates the result.
    ///
    /// An unset `FLUX_API_URL` falls back to the public FLUX.1-dev endpoint,
    /// but one that is set to an empty string is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flux_api_url =
            lookup(FLUX_API_URL_VAR).unwrap_or_else(|| DEFAULT_FLUX_API_URL.to_string());
        let translation_api_url = lookup(TRANSLATION_API_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TRANSLATION_API_URL.to_string());
        let translation_backend = match lookup(TRANSLATION_BACKEND_VAR) {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => TranslationBackend::Local,
        };
        let translation_auth_token = lookup(TRANSLATION_AUTH_TOKEN_VAR)
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());
        let auth_token = lookup(AUTH_TOKEN_VAR);
        let host = lookup(HOST_VAR)
            .filter(|host| !host.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_VAR) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                FluxError::ConfigError(format!("{} must be a port number, got '{}'", PORT_VAR, raw))
            })?,
            None => DEFAULT_PORT,
        };

        let config = AppConfig {
            flux_api_url: flux_api_url.trim().to_string(),
            translation_backend,
            translation_api_url: translation_api_url.trim().to_string(),
            translation_auth_token,
            auth_token: auth_token.map(|token| token.trim().to_string()),
            host,
            port,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_flux_api_url(mut self, url: impl Into<String>) -> Self {
        self.flux_api_url = url.into();
        self
    }

    /// Switches translation to an inference endpoint instead of the local model.
    pub fn with_hosted_translation(mut self, url: impl Into<String>) -> Self {
        self.translation_backend = TranslationBackend::Hosted;
        self.translation_api_url = url.into();
        self
    }

    pub fn with_local_translation(mut self) -> Self {
        self.translation_backend = TranslationBackend::Local;
        self
    }

    pub fn with_translation_auth_token(mut self, token: impl Into<String>) -> Self {
        self.translation_auth_token = Some(token.into());
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_bind_address(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.flux_api_url.trim().is_empty() {
            return Err(FluxError::ConfigError(format!("{} is empty", FLUX_API_URL_VAR)));
        }
        if self.translation_backend == TranslationBackend::Hosted
            && self.translation_api_url.trim().is_empty()
        {
            return Err(FluxError::ConfigError(format!(
                "{} is empty",
                TRANSLATION_API_URL_VAR
            )));
        }
        match self.auth_token.as_deref() {
            Some(token) if !token.trim().is_empty() => Ok(()),
            _ => Err(FluxError::ConfigError(format!(
                "{} must be set",
                AUTH_TOKEN_VAR
            ))),
        }
    }

    /// The validated token. Only fails on a config that skipped `validate`.
    pub fn token(&self) -> Result<&str> {
        self.auth_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| FluxError::ConfigError(format!("{} must be set", AUTH_TOKEN_VAR)))
    }

    /// Bearer token for the hosted translation endpoint, if any.
    ///
    /// The image token is reused only for Hugging Face's own inference API,
    /// so a custom `TRANSLATION_API_URL` never receives it.
    pub fn translation_token(&self) -> Option<&str> {
        match self.translation_auth_token.as_deref() {
            Some(token) => Some(token),
            None if self.translation_api_url.starts_with(HF_INFERENCE_PREFIX) => {
                self.auth_token.as_deref().filter(|token| !token.trim().is_empty())
            }
            None => None,
        }
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
