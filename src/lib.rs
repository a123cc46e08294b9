pub mod config;
pub mod error;
pub mod inference;
pub mod logger;
pub mod models;
pub mod pipeline;
pub mod server;

pub use config::AppConfig;
pub use error::{ErrorKind, FluxError, Result};
pub use inference::{FluxClient, ImageClient, ImageGenerator, TranslationClient, Translator};
pub use models::{GeneratedImage, Prompt, TranslatedPrompt};
pub use pipeline::{Generation, Pipeline};
