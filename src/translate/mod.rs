//! Article translation backends.
//!
//! The pipeline translates titles and bodies through the [`Translator`]
//! trait. Three implementations are provided:
//!
//! - [`OllamaTranslator`]: local LLM through the Ollama chat API
//! - [`LibreTranslateTranslator`]: self-hosted LibreTranslate instance
//! - [`DeepLTranslator`]: DeepL REST API (free or pro endpoint)
//!
//! [`create_translator`] selects the backend named by the configuration.

mod deepl;
mod libre;
mod ollama;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use deepl::DeepLTranslator;
pub use libre::LibreTranslateTranslator;
pub use ollama::OllamaTranslator;

use async_trait::async_trait;

use crate::Result;
use crate::config::{TranslatorConfig, TranslatorProvider};

/// Interface for translation services
///
/// Implementations hold their own HTTP client; the pipeline owns one
/// instance and calls it sequentially, so no internal locking is needed.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate article body text
    ///
    /// # Errors
    ///
    /// Returns an error when the backend is unreachable, rejects the
    /// request, or produces an empty translation.
    async fn translate(&self, text: &str) -> Result<String>;

    /// Translate an article title
    ///
    /// Backends with prompt support may use a dedicated title prompt;
    /// the rest treat this the same as [`Translator::translate`].
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Translator::translate`].
    async fn translate_title(&self, title: &str) -> Result<String>;

    /// Human-readable backend name for logging
    fn name(&self) -> &str;

    /// Verify the backend is reachable and accepts the configured credentials
    ///
    /// # Errors
    ///
    /// Returns an error when the service cannot be reached or rejects
    /// the configured credentials.
    async fn check_connection(&self) -> Result<()>;
}

/// Create the translator selected by the configuration
///
/// # Errors
///
/// Returns an error when the backend's HTTP client cannot be created.
pub fn create_translator(config: &TranslatorConfig) -> Result<Box<dyn Translator>> {
    let translator: Box<dyn Translator> = match config.provider {
        TranslatorProvider::Ollama => Box::new(OllamaTranslator::new(config)?),
        TranslatorProvider::LibreTranslate => Box::new(LibreTranslateTranslator::new(config)?),
        TranslatorProvider::DeepL => Box::new(DeepLTranslator::new(config)?),
    };
    Ok(translator)
}
