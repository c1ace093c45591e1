use crate::config::ProviderConfig;
use crate::traits::*;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const LM_STUDIO_URL: &str = "http://localhost:1234/v1";
const LM_STUDIO_MODEL: &str = "lmstudio-community/Meta-Llama-3.1-8B-Instruct-GGUF";
const GITHUB_MODELS_URL: &str = "https://models.inference.ai.azure.com";
const GITHUB_MODELS_MODEL: &str = "gpt-4o";

/// Chat-completions client for LM Studio and GitHub Models.
pub struct OpenAICompatibleProvider {
    client: Client,
    name: String,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    probe_models: bool,
}

impl OpenAICompatibleProvider {
    pub fn new(
        name: &str,
        base_url: String,
        api_key: Option<String>,
        model: String,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            name: name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            temperature: 0.7,
            max_tokens: 2000,
            probe_models: false,
        })
    }

    /// Local LM Studio server. Slow local models get a 60 second budget.
    pub fn lm_studio(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let mut provider = Self::new(
            "LM Studio",
            config
                .base_url
                .clone()
                .unwrap_or_else(|| LM_STUDIO_URL.to_string()),
            config.api_key.clone(),
            config
                .model
                .clone()
                .unwrap_or_else(|| LM_STUDIO_MODEL.to_string()),
            Duration::from_secs(60),
        )?;
        provider.temperature = config.temperature;
        provider.max_tokens = config.max_tokens;
        provider.probe_models = true;
        Ok(provider)
    }

    pub fn github_models(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let mut provider = Self::new(
            "GitHub Models",
            config
                .base_url
                .clone()
                .unwrap_or_else(|| GITHUB_MODELS_URL.to_string()),
            config.api_key.clone(),
            config
                .model
                .clone()
                .unwrap_or_else(|| GITHUB_MODELS_MODEL.to_string()),
            Duration::from_secs(60),
        )?;
        provider.temperature = config.temperature;
        provider.max_tokens = config.max_tokens;
        Ok(provider)
    }

    pub fn request_body(&self, messages: &[ChatMessage]) -> Value {
        json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": false,
        })
    }

    pub fn parse_reply(&self, body: &Value) -> Result<String, ProviderError> {
        let choice = body["choices"]
            .get(0)
            .ok_or_else(|| ProviderError::Parse("No choices in response".to_string()))?;
        non_empty(choice["message"]["content"].as_str(), &self.name)
    }
}

#[async_trait]
impl ChatProvider for OpenAICompatibleProvider {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!("Sending {} messages to {}", messages.len(), self.name);

        let mut request = self.client.post(&url).json(&self.request_body(messages));
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = check_status(request.send().await?, &self.name).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        self.parse_reply(&body)
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if !self.probe_models {
            return Ok(());
        }

        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(3))
            .send()
            .await?;
        check_status(response, &self.name).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
