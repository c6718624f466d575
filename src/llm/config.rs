//! LLM client configuration.

use serde::{Deserialize, Serialize};

use super::prompts::{DEFAULT_ANALYSIS_PROMPT, DEFAULT_DESCRIPTION_PROMPT};

/// Configuration for LLM client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Whether LLM analysis is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// OpenAI-compatible API base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API key (falls back to OPENAI_API_KEY / LLM_API_KEY)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum tokens in response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature for generation (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Language the marketing copy is written in
    #[serde(default = "default_copy_language")]
    pub copy_language: String,
    /// Custom system prompt for structured extraction (uses {language})
    #[serde(default)]
    pub analysis_prompt: Option<String>,
    /// Custom prompt for product text generation (uses {language} and {product})
    #[serde(default)]
    pub description_prompt: Option<String>,
    /// Maximum characters of extracted text to send to the LLM
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
}

fn default_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-2024-08-06".to_string()
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_temperature() -> f32 {
    0.3
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_copy_language() -> String {
    "Swedish".to_string()
}

fn default_max_content_chars() -> usize {
    12000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            copy_language: default_copy_language(),
            analysis_prompt: None,
            description_prompt: None,
            max_content_chars: default_max_content_chars(),
        }
    }
}

impl LlmConfig {
    /// Check if the config equals the default (for skip_serializing_if).
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `LLM_ENABLED`: "true" or "false"
    /// - `LLM_ENDPOINT`: API base URL
    /// - `LLM_API_KEY`, then `OPENAI_API_KEY`: API key (only if none configured)
    /// - `LLM_MODEL`: Model name
    /// - `LLM_MAX_TOKENS`: Maximum tokens in response
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("LLM_ENABLED") {
            self.enabled = val.eq_ignore_ascii_case("true") || val == "1";
        }
        if let Ok(val) = std::env::var("LLM_ENDPOINT") {
            self.endpoint = val;
        }
        if self.api_key.is_none() {
            self.api_key = std::env::var("LLM_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .ok()
                .filter(|key| !key.trim().is_empty());
        }
        if let Ok(val) = std::env::var("LLM_MODEL") {
            self.model = val;
        }
        if let Some(tokens) = std::env::var("LLM_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.max_tokens = tokens;
        }
        self
    }

    /// Get the extraction system prompt, using custom or default.
    pub fn get_analysis_prompt(&self) -> String {
        self.analysis_prompt
            .as_deref()
            .unwrap_or(DEFAULT_ANALYSIS_PROMPT)
            .replace("{language}", &self.copy_language)
    }

    /// Get the description prompt template, using custom or default.
    pub fn get_description_prompt(&self) -> &str {
        self.description_prompt
            .as_deref()
            .unwrap_or(DEFAULT_DESCRIPTION_PROMPT)
    }
}
