use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use spelling_core::model::{Grade, Word};
use tracing::debug;

use crate::ai::prompt::{SYSTEM_PROMPT, parse_word_list, word_list_prompt};
use crate::error::GenerationError;
use crate::word_supplier::WordGenerator;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";
const API_VERSION: &str = "2023-06-01";

#[derive(Clone, Debug)]
pub struct WordGeneratorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl WordGeneratorConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            max_tokens: 1024,
            temperature: 0.7,
            timeout: Duration::from_secs(30),
        }
    }

    /// Read `SPELLING_AI_API_KEY`, `SPELLING_AI_BASE_URL`, and `SPELLING_AI_MODEL`.
    ///
    /// Returns `None` when no API key is set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("SPELLING_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let mut config = Self::new(api_key.trim());
        if let Ok(base_url) = env::var("SPELLING_AI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model) = env::var("SPELLING_AI_MODEL") {
            config.model = model;
        }
        Some(config)
    }
}

/// Word generator backed by the Anthropic messages API.
#[derive(Clone)]
pub struct AnthropicWordGenerator {
    client: Client,
    config: Option<WordGeneratorConfig>,
}

impl AnthropicWordGenerator {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(WordGeneratorConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<WordGeneratorConfig>) -> Self {
        let timeout = config
            .as_ref()
            .map_or(Duration::from_secs(30), |config| config.timeout);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, config }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl WordGenerator for AnthropicWordGenerator {
    async fn generate(
        &self,
        grade: Grade,
        count: usize,
        description: &str,
    ) -> Result<Vec<Word>, GenerationError> {
        let config = self.config.as_ref().ok_or(GenerationError::Disabled)?;

        let url = format!("{}/messages", config.base_url.trim_end_matches('/'));
        let payload = MessagesRequest {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            system: SYSTEM_PROMPT,
            messages: vec![Message {
                role: "user",
                content: word_list_prompt(grade, count, description),
            }],
        };

        let response = self
            .client
            .post(url)
            .header("x-api-key", &config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::HttpStatus(response.status()));
        }

        let body: MessagesResponse = response.json().await?;
        let text = body
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        let words = parse_word_list(&text, grade)?;
        debug!(%grade, requested = count, received = words.len(), "generated words");
        Ok(words)
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    system: &'static str,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_generator_reports_disabled() {
        let generator = AnthropicWordGenerator::new(None);
        assert!(!generator.enabled());
        let grade = Grade::new(1).unwrap();
        let err = generator
            .generate(grade, grade.min_word_count(), grade.description())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Disabled));
    }

    #[test]
    fn config_defaults() {
        let config = WordGeneratorConfig::new("key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn response_body_decodes_text_blocks() {
        let body = r#"{"content":[{"type":"text","text":"[]"}],"role":"assistant"}"#;
        let parsed: MessagesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.content[0].kind, "text");
        assert_eq!(parsed.content[0].text.as_deref(), Some("[]"));
    }
}
