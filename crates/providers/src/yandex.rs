use crate::config::ProviderConfig;
use crate::traits::*;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const YANDEX_URL: &str = "https://llm.api.cloud.yandex.net/foundationModels/v1";
const YANDEX_MODEL: &str = "yandexgpt-lite";

pub struct YandexGptProvider {
    client: Client,
    base_url: String,
    api_key: String,
    catalog_id: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl YandexGptProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        config.validate()?;
        let (Some(api_key), Some(catalog_id)) = (config.api_key.clone(), config.catalog_id.clone())
        else {
            return Err(ProviderError::Config(
                "YandexGPT requires an API key and a catalog id".to_string(),
            ));
        };
        let client = Client::builder().timeout(Duration::from_secs(25)).build()?;

        Ok(Self {
            client,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| YANDEX_URL.to_string()),
            api_key,
            catalog_id,
            model: config
                .model
                .clone()
                .unwrap_or_else(|| YANDEX_MODEL.to_string()),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn model_uri(&self) -> String {
        format!("gpt://{}/{}/latest", self.catalog_id, self.model)
    }

    pub fn request_body(&self, messages: &[ChatMessage]) -> Value {
        let messages: Vec<Value> = messages
            .iter()
            .map(|m| json!({ "role": m.role, "text": m.content }))
            .collect();

        json!({
            "modelUri": self.model_uri(),
            "completionOptions": {
                "temperature": self.temperature,
                "maxTokens": self.max_tokens,
            },
            "messages": messages,
        })
    }

    pub fn parse_reply(body: &Value) -> Result<String, ProviderError> {
        non_empty(
            body["result"]["alternatives"][0]["message"]["text"].as_str(),
            "YandexGPT",
        )
    }
}

#[async_trait]
impl ChatProvider for YandexGptProvider {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let url = format!("{}/completion", self.base_url.trim_end_matches('/'));
        tracing::debug!("Sending {} messages to YandexGPT", messages.len());

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Api-Key {}", self.api_key))
            .header("x-folder-id", &self.catalog_id)
            .json(&self.request_body(messages))
            .send()
            .await?;
        let response = check_status(response, "YandexGPT").await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Self::parse_reply(&body)
    }

    fn name(&self) -> &str {
        "YandexGPT"
    }
}
