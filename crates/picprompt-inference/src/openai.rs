//! OpenAI completions backend for prompt generation.

use std::time::Duration;

use async_trait::async_trait;
use picprompt_core::{defaults, Error, GenerationParams, LabelSet, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Backend for generating creative prompt text from detected labels.
#[async_trait]
pub trait PromptGenerator: Send + Sync {
    /// Generate text for one image's label set with the user's parameters.
    ///
    /// An empty label set is valid input, not an error. Returns the first
    /// completion choice's text verbatim, no trimming or post-processing.
    async fn generate(&self, labels: &LabelSet, params: &GenerationParams) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// Configuration for the OpenAI completions backend.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Completion model identifier.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: defaults::DEFAULT_OPENAI_URL.to_string(),
            api_key: api_key.into(),
            model: defaults::DEFAULT_GEN_MODEL.to_string(),
            timeout_seconds: defaults::DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create from environment variables.
    ///
    /// `OPENAI_API_KEY` is required and read exactly once here, at
    /// startup; there is no ambient global for it.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(defaults::ENV_OPENAI_API_KEY)
            .map_err(|_| Error::Config(format!("{} is not set", defaults::ENV_OPENAI_API_KEY)))?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var(defaults::ENV_OPENAI_BASE_URL) {
            config.base_url = base_url;
        }
        if let Ok(model) = std::env::var(defaults::ENV_OPENAI_GEN_MODEL) {
            config.model = model;
        }
        if let Some(timeout) = std::env::var(defaults::ENV_TIMEOUT_SECS)
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout_seconds = timeout;
        }
        Ok(config)
    }
}

/// OpenAI completions prompt generator.
pub struct OpenAiGenerator {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiGenerator {
    /// Create a new generator with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Generation(format!("failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "openai",
            model = %config.model,
            base_url = %config.base_url,
            "initialized completion backend"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(OpenAiConfig::from_env()?)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Build an authenticated POST request against the API.
    fn build_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        self.client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
    }
}

/// Concatenate the user's template, a separator, and the textual
/// rendering of the labels into the single prompt string sent upstream.
fn build_prompt(labels: &LabelSet, params: &GenerationParams) -> String {
    format!("{} \n {}", params.prompt_template(), labels)
}

#[derive(Serialize)]
struct CompletionRequest {
    model: String,
    prompt: String,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

#[derive(Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiError,
}

#[derive(Deserialize)]
struct OpenAiError {
    message: String,
}

#[async_trait]
impl PromptGenerator for OpenAiGenerator {
    async fn generate(&self, labels: &LabelSet, params: &GenerationParams) -> Result<String> {
        let prompt = build_prompt(labels, params);

        debug!(
            subsystem = "inference",
            component = "openai",
            op = "generate",
            model = %self.config.model,
            label_count = labels.len(),
            prompt_len = prompt.len(),
        );

        let request = CompletionRequest {
            model: self.config.model.clone(),
            prompt,
            temperature: params.temperature(),
            max_tokens: defaults::MAX_COMPLETION_TOKENS,
            top_p: params.top_p(),
            frequency_penalty: params.frequency_penalty(),
            presence_penalty: params.presence_penalty(),
        };

        let response = self
            .build_request("/completions")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Generation(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<OpenAiErrorResponse>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(Error::Generation(format!(
                "OpenAI returned {}: {}",
                status, message
            )));
        }

        let result: CompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Generation(format!("failed to parse response: {}", e)))?;

        // First choice's text, verbatim.
        let text = result
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| Error::Generation("no completion choices returned".to_string()))?;

        debug!(
            subsystem = "inference",
            component = "openai",
            op = "generate",
            response_len = text.len(),
        );

        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new_uses_defaults() {
        let config = OpenAiConfig::new("test-key");
        assert_eq!(config.base_url, defaults::DEFAULT_OPENAI_URL);
        assert_eq!(config.model, defaults::DEFAULT_GEN_MODEL);
        assert_eq!(config.timeout_seconds, defaults::DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.api_key, "test-key");
    }

    #[test]
    fn test_generator_creation() {
        let generator = OpenAiGenerator::new(OpenAiConfig::new("test-key")).unwrap();
        assert_eq!(generator.model_name(), defaults::DEFAULT_GEN_MODEL);
        assert_eq!(generator.config().api_key, "test-key");
    }

    #[test]
    fn test_build_prompt_joins_template_and_labels() {
        let labels = LabelSet::from_detected(vec!["Cat".to_string(), "Animal".to_string()]);
        let params = GenerationParams::new(0.7, 1.0, 0.0, 0.0, "Write prompts").unwrap();

        let prompt = build_prompt(&labels, &params);
        assert_eq!(prompt, "Write prompts \n [\"Cat\", \"Animal\"]");
    }

    #[test]
    fn test_build_prompt_with_empty_labels() {
        let labels = LabelSet::default();
        let params = GenerationParams::new(0.7, 1.0, 0.0, 0.0, "Write prompts").unwrap();

        let prompt = build_prompt(&labels, &params);
        assert_eq!(prompt, "Write prompts \n []");
    }

    #[test]
    fn test_completion_request_serialization() {
        let request = CompletionRequest {
            model: "test-model".to_string(),
            prompt: "a prompt".to_string(),
            temperature: 0.7,
            max_tokens: defaults::MAX_COMPLETION_TOKENS,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "test-model");
        assert_eq!(json["prompt"], "a prompt");
        assert_eq!(json["max_tokens"], 256);
        assert_eq!(json["top_p"], 1.0);
    }

    #[test]
    fn test_completion_response_deserialization() {
        let json = r#"{"choices": [{"text": "\n\nAn elegant cat"}, {"text": "second"}]}"#;
        let response: CompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices.len(), 2);
        assert_eq!(response.choices[0].text, "\n\nAn elegant cat");
    }

    #[test]
    fn test_error_response_deserialization() {
        let json = r#"{"error": {"message": "Rate limit reached", "type": "requests", "code": null}}"#;
        let response: OpenAiErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.error.message, "Rate limit reached");
    }
}
