//! Translation through a self-hosted LibreTranslate instance.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::Translator;
use crate::Result;
use crate::config::TranslatorConfig;
use crate::error::{Error, TranslateError};
use crate::utils::truncate_response_body;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(2 * 60);

const PROVIDER: &str = "libretranslate";

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// Translator backed by a LibreTranslate server
///
/// Titles and bodies go through the same `/translate` endpoint; the
/// service has no notion of prompts.
pub struct LibreTranslateTranslator {
    host: String,
    api_key: Option<String>,
    source_lang: String,
    target_lang: String,
    client: reqwest::Client,
}

impl LibreTranslateTranslator {
    /// Create a LibreTranslate translator from the translator configuration
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: &TranslatorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            host: config.libretranslate.host.trim_end_matches('/').to_string(),
            api_key: config.libretranslate.api_key.clone(),
            source_lang: config.source_lang.clone(),
            target_lang: config.target_lang.clone(),
            client,
        })
    }

    async fn request(&self, text: &str) -> Result<String> {
        let request = TranslateRequest {
            q: text,
            source: &self.source_lang,
            target: &self.target_lang,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/translate", self.host))
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
            return Err(TranslateError::Backend {
                provider: PROVIDER.to_string(),
                reason: format!(
                    "status {}: {}",
                    status.as_u16(),
                    truncate_response_body(&body)
                ),
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

        let translated = result.translated_text.trim().to_string();
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
impl Translator for LibreTranslateTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        self.request(text).await
    }

    async fn translate_title(&self, title: &str) -> Result<String> {
        self.request(title).await
    }

    fn name(&self) -> &str {
        "LibreTranslate"
    }

    async fn check_connection(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/languages", self.host))
            .send()
            .await
            .map_err(|e| TranslateError::Unavailable {
                provider: PROVIDER.to_string(),
                reason: format!("cannot connect to {}: {}", self.host, e),
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
