//! Translation through the DeepL REST API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::Translator;
use crate::Result;
use crate::config::TranslatorConfig;
use crate::error::{Error, TranslateError};
use crate::utils::truncate_response_body;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Free-tier keys only work against the free host and vice versa
const FREE_HOST: &str = "https://api-free.deepl.com";
const PRO_HOST: &str = "https://api.deepl.com";

const PROVIDER: &str = "deepl";

#[derive(Serialize)]
struct TranslateRequest<'a> {
    text: [&'a str; 1],
    target_lang: &'a str,
    source_lang: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
struct Translation {
    text: String,
}

/// Translator backed by the DeepL API
///
/// The API key comes from the configuration or the `DEEPL_API_KEY`
/// environment variable; without one every call fails. The free flag picks
/// between the free and pro API hosts.
pub struct DeepLTranslator {
    api_key: Option<String>,
    host: String,
    source_lang: String,
    target_lang: String,
    client: reqwest::Client,
}

impl DeepLTranslator {
    /// Create a DeepL translator from the translator configuration
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: &TranslatorConfig) -> Result<Self> {
        let api_key = config
            .deepl
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var("DEEPL_API_KEY").ok().filter(|key| !key.is_empty()));

        let host = if config.deepl.free { FREE_HOST } else { PRO_HOST };

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            host: host.to_string(),
            source_lang: config.source_lang.to_uppercase(),
            target_lang: config.target_lang.to_uppercase(),
            client,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_host(mut self, host: &str) -> Self {
        self.host = host.trim_end_matches('/').to_string();
        self
    }

    #[cfg(test)]
    pub(crate) fn without_key(mut self) -> Self {
        self.api_key = None;
        self
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            TranslateError::Unavailable {
                provider: PROVIDER.to_string(),
                reason: "API key not configured (set DEEPL_API_KEY or deepl.api_key)".to_string(),
            }
            .into()
        })
    }

    async fn request(&self, text: &str) -> Result<String> {
        let api_key = self.api_key()?;

        let request = TranslateRequest {
            text: [text],
            target_lang: &self.target_lang,
            source_lang: &self.source_lang,
        };

        let response = self
            .client
            .post(format!("{}/v2/translate", self.host))
            .header("Authorization", format!("DeepL-Auth-Key {}", api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| TranslateError::Unavailable {
                provider: PROVIDER.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                403 => TranslateError::InvalidApiKey {
                    provider: PROVIDER.to_string(),
                },
                456 => TranslateError::QuotaExceeded {
                    provider: PROVIDER.to_string(),
                },
                code => TranslateError::Backend {
                    provider: PROVIDER.to_string(),
                    reason: format!("status {}: {}", code, truncate_response_body(&body)),
                },
            }
            .into());
        }

        let result: TranslateResponse =
            response
                .json()
                .await
                .map_err(|e| TranslateError::Backend {
                    provider: PROVIDER.to_string(),
                    reason: format!("failed to decode response: {}", e),
                })?;

        let translated = result
            .translations
            .first()
            .map(|t| t.text.trim().to_string())
            .unwrap_or_default();
        if translated.is_empty() {
            return Err(TranslateError::EmptyResult {
                provider: PROVIDER.to_string(),
            }
            .into());
        }

        Ok(translated)
    }
}

#[async_trait]
impl Translator for DeepLTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        self.request(text).await
    }

    async fn translate_title(&self, title: &str) -> Result<String> {
        self.request(title).await
    }

    fn name(&self) -> &str {
        "DeepL"
    }

    async fn check_connection(&self) -> Result<()> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .get(format!("{}/v2/usage", self.host))
            .header("Authorization", format!("DeepL-Auth-Key {}", api_key))
            .send()
            .await
            .map_err(|e| TranslateError::Unavailable {
                provider: PROVIDER.to_string(),
                reason: format!("cannot connect to DeepL: {}", e),
            })?;

        if !response.status().is_success() {
            return Err(TranslateError::Unavailable {
                provider: PROVIDER.to_string(),
                reason: format!("status {}", response.status().as_u16()),
            }
            .into());
        }

        Ok(())
    }
}
