//! Blocking client for OpenAI-compatible chat completion APIs.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::config::LlmConfig;
use super::parse::{parse_analysis, split_product_texts};
use crate::models::{ProductAnalysis, ProductRecord, ProductTexts};
use crate::utils::truncate_chars;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No API key configured (set OPENAI_API_KEY or llm.api_key)")]
    MissingApiKey,

    #[error("LLM is disabled")]
    Disabled,
}

/// Turns extracted document text into structured product data.
pub trait Analyzer {
    fn analyze(&self, text: &str) -> Result<ProductAnalysis, LlmError>;
}

/// Chat completion request.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completion response.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// LLM client for product analysis and copywriting.
pub struct LlmClient {
    config: LlmConfig,
    api_key: String,
    client: Client,
}

impl LlmClient {
    /// Create a client, failing early when disabled or without a key.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        if !config.enabled {
            return Err(LlmError::Disabled);
        }
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    /// Get the config.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Extract product data and marketing copy from search results.
    pub fn analyze_text(&self, text: &str) -> Result<ProductAnalysis, LlmError> {
        let truncated = truncate_chars(text, self.config.max_content_chars);
        if truncated.len() < text.len() {
            debug!(
                "Analysis input truncated to {} chars",
                self.config.max_content_chars
            );
        }

        let system = self.config.get_analysis_prompt();
        let content = self.chat(Some(&system), truncated)?;
        let analysis = parse_analysis(&content);
        if analysis.is_empty() {
            return Err(LlmError::Parse(
                "No recognized fields in analysis response".to_string(),
            ));
        }

        info!(
            "Analysis complete: {} ({} bullet points)",
            analysis.product_name,
            analysis.bullet_points.len()
        );
        Ok(analysis)
    }

    /// Write headline, short text, long text and bullets for a stored product.
    pub fn generate_product_texts(&self, record: &ProductRecord) -> Result<ProductTexts, LlmError> {
        let prompt = self
            .config
            .get_description_prompt()
            .replace("{language}", &self.config.copy_language)
            .replace("{product}", &record.facts_text());

        debug!("Generating product texts for: {}", record.search_term);
        let content = self.chat(None, &prompt)?;
        let texts = split_product_texts(&content);
        if texts.headline.is_empty() {
            return Err(LlmError::Parse("Empty product text response".to_string()));
        }
        Ok(texts)
    }

    /// Send one chat exchange and return the assistant's reply.
    fn chat(&self, system: Option<&str>, user: &str) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: user,
        });

        let request = ChatRequest {
            model: &self.config.model,
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let url = format!(
            "{}/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        );
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
        }

        let chat_resp: ChatResponse = resp.json().map_err(|e| LlmError::Parse(e.to_string()))?;
        extract_content(chat_resp)
    }
}

impl Analyzer for LlmClient {
    fn analyze(&self, text: &str) -> Result<ProductAnalysis, LlmError> {
        self.analyze_text(text)
    }
}

fn extract_content(resp: ChatResponse) -> Result<String, LlmError> {
    if let Some(error) = resp.error {
        return Err(LlmError::Api(error.message));
    }
    resp.choices
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| LlmError::Parse("No content in response".to_string()))
}
