//! Configuration types for newsflow

use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use utoipa::ToSchema;

/// One feed source: a named site with one or more feed URLs
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SourceConfig {
    /// Source name, recorded on every article ingested from it (e.g., "rideapart")
    pub name: String,

    /// Feed URLs polled for this source
    #[serde(default)]
    pub feeds: Vec<String>,

    /// Whether this source participates in ingestion passes (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Translation backend selection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TranslatorProvider {
    /// Local LLM via the Ollama chat API
    #[default]
    Ollama,
    /// Self-hosted LibreTranslate instance
    LibreTranslate,
    /// DeepL API (free or pro tier)
    DeepL,
}

impl TranslatorProvider {
    /// Stable lowercase name used in logs and error payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslatorProvider::Ollama => "ollama",
            TranslatorProvider::LibreTranslate => "libretranslate",
            TranslatorProvider::DeepL => "deepl",
        }
    }
}

impl std::fmt::Display for TranslatorProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ollama backend settings
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct OllamaConfig {
    /// Model name (default: "gemma2:9b")
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Ollama host URL (default: "http://localhost:11434")
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Override for the body-translation system prompt (None = built-in prompt)
    #[serde(default)]
    pub prompt: Option<String>,

    /// Override for the title-translation system prompt (None = built-in prompt)
    #[serde(default)]
    pub title_prompt: Option<String>,

    /// Sampling temperature (default: 0.15, low for faithful translation)
    #[serde(default = "default_ollama_temperature")]
    pub temperature: f64,

    /// Nucleus sampling cutoff (default: 0.9)
    #[serde(default = "default_ollama_top_p")]
    pub top_p: f64,

    /// Context window size in tokens (default: 8192)
    #[serde(default = "default_ollama_num_ctx")]
    pub num_ctx: u32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            model: default_ollama_model(),
            host: default_ollama_host(),
            prompt: None,
            title_prompt: None,
            temperature: default_ollama_temperature(),
            top_p: default_ollama_top_p(),
            num_ctx: default_ollama_num_ctx(),
        }
    }
}

/// LibreTranslate backend settings
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LibreTranslateConfig {
    /// LibreTranslate host URL (default: "http://localhost:5000")
    #[serde(default = "default_libretranslate_host")]
    pub host: String,

    /// API key, sent with every request when set (public instances require one)
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for LibreTranslateConfig {
    fn default() -> Self {
        Self {
            host: default_libretranslate_host(),
            api_key: None,
        }
    }
}

/// DeepL backend settings
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DeepLConfig {
    /// API key; falls back to the DEEPL_API_KEY environment variable when None
    #[serde(default)]
    pub api_key: Option<String>,

    /// Whether the key is a free-tier key, which targets api-free.deepl.com (default: true)
    #[serde(default = "default_true")]
    pub free: bool,
}

impl Default for DeepLConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            free: true,
        }
    }
}

/// Translation configuration: backend choice plus per-backend settings
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TranslatorConfig {
    /// Which backend to use (default: ollama)
    #[serde(default)]
    pub provider: TranslatorProvider,

    /// Ollama settings (used when provider = "ollama")
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// LibreTranslate settings (used when provider = "libretranslate")
    #[serde(default)]
    pub libretranslate: LibreTranslateConfig,

    /// DeepL settings (used when provider = "deepl")
    #[serde(default)]
    pub deepl: DeepLConfig,

    /// Source language code (default: "en")
    #[serde(default = "default_source_lang")]
    pub source_lang: String,

    /// Target language code (default: "ru")
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            provider: TranslatorProvider::default(),
            ollama: OllamaConfig::default(),
            libretranslate: LibreTranslateConfig::default(),
            deepl: DeepLConfig::default(),
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
        }
    }
}

/// Destination site configuration (working copy layout and git targets)
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SiteConfig {
    /// Local working copy of the site repository (default: "./blog")
    #[serde(default = "default_site_repo_path")]
    pub repo_path: PathBuf,

    /// Content directory inside the repository (default: "content")
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Commit local working-copy writes automatically (default: true)
    #[serde(default = "default_true")]
    pub auto_commit: bool,

    /// Git remote name for push/pull in the local strategy (default: "origin")
    #[serde(default = "default_git_remote")]
    pub git_remote: String,

    /// Branch to publish to (default: "main")
    #[serde(default = "default_git_branch")]
    pub git_branch: String,

    /// Repository for the remote API strategy; accepts "owner/repo",
    /// "https://github.com/owner/repo(.git)", or "git@github.com:owner/repo(.git)"
    #[serde(default)]
    pub github_repo: Option<String>,

    /// Token for the remote API strategy; falls back to the GITHUB_TOKEN
    /// environment variable, and when neither is set publishing uses the
    /// local working-copy strategy
    #[serde(default)]
    pub github_token: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            repo_path: default_site_repo_path(),
            content_dir: default_content_dir(),
            auto_commit: true,
            git_remote: default_git_remote(),
            git_branch: default_git_branch(),
            github_repo: None,
            github_token: None,
        }
    }
}

/// Pass sizing and pacing
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PipelineConfig {
    /// Interval between scheduled full cycles, in seconds (default: 6 hours)
    #[serde(default = "default_run_interval", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub run_interval: Duration,

    /// Maximum articles translated per pass (default: 10)
    #[serde(default = "default_translate_batch")]
    pub translate_batch: usize,

    /// Maximum articles published per pass (default: 100)
    #[serde(default = "default_publish_batch")]
    pub publish_batch: usize,

    /// Pacing delay between successive page fetches, in seconds (default: 1)
    #[serde(default = "default_item_delay", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub item_delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            run_interval: default_run_interval(),
            translate_batch: default_translate_batch(),
            publish_batch: default_publish_batch(),
            item_delay: default_item_delay(),
        }
    }
}

/// Persistence configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PersistenceConfig {
    /// SQLite database file path (default: "./newsflow.db")
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:8080)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            swagger_ui: true,
        }
    }
}

/// Main configuration for the pipeline
///
/// Sub-configs:
/// - [`sources`](SourceConfig) — feed sources to ingest from
/// - [`translator`](TranslatorConfig) — backend choice and settings
/// - [`site`](SiteConfig) — destination repository and layout
/// - [`pipeline`](PipelineConfig) — batch sizes, pacing, schedule interval
/// - [`persistence`](PersistenceConfig) — database location
/// - [`api`](ApiConfig) — REST server settings
///
/// Every field has a default, so `Config::default()` yields a working
/// local-mode setup (Ollama translator, local working-copy publishing).
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Feed sources (default: empty; configure at least one to ingest)
    #[serde(default)]
    pub sources: Vec<SourceConfig>,

    /// Translation backend settings
    #[serde(default)]
    pub translator: TranslatorConfig,

    /// Destination site settings
    #[serde(default)]
    pub site: SiteConfig,

    /// Pass sizing and pacing
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Persistence settings
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// REST API settings
    #[serde(default)]
    pub api: ApiConfig,
}

// Convenience accessors so call sites don't reach through sub-configs
impl Config {
    /// SQLite database file path
    pub fn database_path(&self) -> &PathBuf {
        &self.persistence.database_path
    }

    /// REST API bind address
    pub fn bind_address(&self) -> SocketAddr {
        self.api.bind_address
    }

    /// Sources that participate in ingestion passes
    pub fn enabled_sources(&self) -> impl Iterator<Item = &SourceConfig> {
        self.sources.iter().filter(|s| s.enabled)
    }

    /// Effective GitHub token: explicit config value, else the GITHUB_TOKEN
    /// environment variable, else None (local publishing mode)
    pub fn github_token(&self) -> Option<String> {
        self.site
            .github_token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()))
    }
}

fn default_true() -> bool {
    true
}

fn default_ollama_model() -> String {
    "gemma2:9b".to_string()
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_temperature() -> f64 {
    0.15
}

fn default_ollama_top_p() -> f64 {
    0.9
}

fn default_ollama_num_ctx() -> u32 {
    8192
}

fn default_libretranslate_host() -> String {
    "http://localhost:5000".to_string()
}

fn default_source_lang() -> String {
    "en".to_string()
}

fn default_target_lang() -> String {
    "ru".to_string()
}

fn default_site_repo_path() -> PathBuf {
    PathBuf::from("./blog")
}

fn default_content_dir() -> String {
    "content".to_string()
}

fn default_git_remote() -> String {
    "origin".to_string()
}

fn default_git_branch() -> String {
    "main".to_string()
}

fn default_run_interval() -> Duration {
    Duration::from_secs(6 * 60 * 60)
}

fn default_translate_batch() -> usize {
    10
}

fn default_publish_batch() -> usize {
    100
}

fn default_item_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./newsflow.db")
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

// Duration serialization helper (seconds as integer)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
