use crate::config::ProviderConfig;
use crate::traits::*;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_MODEL: &str = "gemini-2.0-flash-exp";

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ProviderError::Config("Gemini requires an API key".to_string()))?;
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| GEMINI_URL.to_string()),
            api_key,
            model: config
                .model
                .clone()
                .unwrap_or_else(|| GEMINI_MODEL.to_string()),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// `generateContent` payload. The last system message becomes the
    /// system instruction; assistant turns use Gemini's `model` role.
    pub fn request_body(&self, messages: &[ChatMessage]) -> Value {
        let mut system_instruction = None;
        let mut contents = Vec::new();

        for message in messages {
            match message.role {
                Role::System => system_instruction = Some(message.content.as_str()),
                Role::User | Role::Assistant => {
                    let role = if message.role == Role::User { "user" } else { "model" };
                    contents.push(json!({
                        "role": role,
                        "parts": [{ "text": message.content }],
                    }));
                }
            }
        }

        let mut body = json!({
            "contents": contents,
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": self.max_tokens,
                "topP": 0.95,
                "topK": 40,
            }
        });

        if let Some(instruction) = system_instruction {
            body["systemInstruction"] = json!({ "parts": [{ "text": instruction }] });
        }

        body
    }

    pub fn parse_reply(body: &Value) -> Result<String, ProviderError> {
        non_empty(
            body["candidates"][0]["content"]["parts"][0]["text"].as_str(),
            "Gemini",
        )
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            urlencoding::encode(&self.api_key)
        );
        tracing::debug!("Sending {} messages to Gemini ({})", messages.len(), self.model);

        let response = self
            .client
            .post(&url)
            .json(&self.request_body(messages))
            .send()
            .await?;
        let response = check_status(response, "Gemini").await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Self::parse_reply(&body)
    }

    fn name(&self) -> &str {
        "Google Gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;

    fn provider() -> GeminiProvider {
        GeminiProvider::new(&ProviderConfig {
            provider: ProviderKind::Gemini,
            api_key: Some("test-key".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_roles_mapped() {
        let body = provider().request_body(&[
            ChatMessage::system("be brief"),
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
        ]);

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2000);
    }

    #[test]
    fn test_no_system_instruction_when_absent() {
        let body = provider().request_body(&[ChatMessage::user("hi")]);
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_parse_reply() {
        let body = json!({"candidates": [{"content": {"parts": [{"text": " ok "}]}}]});
        assert_eq!(GeminiProvider::parse_reply(&body).unwrap(), "ok");
        assert!(GeminiProvider::parse_reply(&json!({"candidates": []})).is_err());
    }
}
