//! Translation through a local Ollama chat model.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::Translator;
use crate::Result;
use crate::config::TranslatorConfig;
use crate::error::{Error, TranslateError};
use crate::utils::truncate_response_body;

/// Local models on CPU can take minutes for a long article
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30 * 60);

const PROVIDER: &str = "ollama";

fn default_prompt(source_lang: &str, target_lang: &str) -> String {
    format!(
        "You are a professional news translator. Translate the following text \
         from {source_lang} to {target_lang}. Preserve paragraph breaks. \
         Output only the translation, with no commentary."
    )
}

fn default_title_prompt(source_lang: &str, target_lang: &str) -> String {
    format!(
        "Translate the following news headline from {source_lang} to \
         {target_lang}. Keep it concise. Output only the translated headline."
    )
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f64,
    top_p: f64,
    num_ctx: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Translator backed by a local Ollama instance
///
/// Uses the `/api/chat` endpoint with the translation instructions as the
/// system message and the text to translate as the user message. Prompts can
/// be overridden per deployment; a configured body prompt also applies to
/// titles unless a separate title prompt is set.
pub struct OllamaTranslator {
    host: String,
    model: String,
    prompt: String,
    title_prompt: String,
    temperature: f64,
    top_p: f64,
    num_ctx: u32,
    display_name: String,
    client: reqwest::Client,
}

impl OllamaTranslator {
    /// Create an Ollama translator from the translator configuration
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: &TranslatorConfig) -> Result<Self> {
        let ollama = &config.ollama;

        let prompt = ollama
            .prompt
            .clone()
            .unwrap_or_else(|| default_prompt(&config.source_lang, &config.target_lang));
        let title_prompt = ollama
            .title_prompt
            .clone()
            .or_else(|| ollama.prompt.clone())
            .unwrap_or_else(|| default_title_prompt(&config.source_lang, &config.target_lang));

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            host: ollama.host.trim_end_matches('/').to_string(),
            model: ollama.model.clone(),
            prompt,
            title_prompt,
            temperature: ollama.temperature,
            top_p: ollama.top_p,
            num_ctx: ollama.num_ctx,
            display_name: format!("Ollama ({})", ollama.model),
            client,
        })
    }

    /// Send one chat completion with the given system prompt
    async fn chat(&self, system_prompt: &str, user_content: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_content,
                },
            ],
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
                top_p: self.top_p,
                num_ctx: self.num_ctx,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.host))
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

        let result: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| TranslateError::Backend {
                    provider: PROVIDER.to_string(),
                    reason: format!("failed to decode response: {}", e),
                })?;

        let translated = result.message.content.trim().to_string();
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
impl Translator for OllamaTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        self.chat(&self.prompt, text).await
    }

    async fn translate_title(&self, title: &str) -> Result<String> {
        self.chat(&self.title_prompt, title).await
    }

    fn name(&self) -> &str {
        &self.display_name
    }

    async fn check_connection(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.host))
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
