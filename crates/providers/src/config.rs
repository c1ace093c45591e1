use crate::gemini::GeminiProvider;
use crate::openai_compatible::OpenAICompatibleProvider;
use crate::traits::{ChatProvider, ProviderError};
use crate::yandex::YandexGptProvider;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProviderKind {
    #[serde(rename = "lmstudio")]
    LmStudio,
    #[serde(rename = "github")]
    GithubModels,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "yandexgpt")]
    YandexGpt,
    /// No LLM: the agent plans with keyword rules only.
    #[serde(rename = "none")]
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: ProviderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Yandex Cloud folder id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<String>,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::LmStudio,
            api_key: None,
            base_url: None,
            model: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            catalog_id: None,
        }
    }
}

impl ProviderConfig {
    fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        match self.provider {
            ProviderKind::Gemini | ProviderKind::GithubModels if self.api_key().is_none() => {
                Err(ProviderError::Config(format!(
                    "{:?} requires an API key",
                    self.provider
                )))
            }
            ProviderKind::YandexGpt => {
                let has_catalog = self
                    .catalog_id
                    .as_deref()
                    .is_some_and(|c| !c.trim().is_empty());
                if self.api_key().is_none() || !has_catalog {
                    return Err(ProviderError::Config(
                        "YandexGPT requires an API key and a catalog id".to_string(),
                    ));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Build the configured provider, `None` when the LLM is disabled.
pub fn build_provider(
    config: &ProviderConfig,
) -> Result<Option<Arc<dyn ChatProvider>>, ProviderError> {
    config.validate()?;

    let provider: Arc<dyn ChatProvider> = match config.provider {
        ProviderKind::Disabled => return Ok(None),
        ProviderKind::LmStudio => Arc::new(OpenAICompatibleProvider::lm_studio(config)?),
        ProviderKind::GithubModels => Arc::new(OpenAICompatibleProvider::github_models(config)?),
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(config)?),
        ProviderKind::YandexGpt => Arc::new(YandexGptProvider::new(config)?),
    };

    tracing::info!("LLM provider: {}", provider.name());
    Ok(Some(provider))
}
