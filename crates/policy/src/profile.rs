use crate::danger::DecisionPolicy;
use crate::personality::PersonalityTraits;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid profile: {0}")]
    Invalid(String),
}

/// Personality plus decision thresholds, stored as YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: String,
    #[serde(default)]
    pub traits: PersonalityTraits,
    #[serde(default)]
    pub policy: DecisionPolicy,
}

impl AgentProfile {
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, PolicyError> {
        let content = tokio::fs::read_to_string(&path).await?;
        let mut profile: AgentProfile = serde_yaml::from_str(&content)?;
        profile.validate()?;
        profile.traits = profile.traits.normalized();
        tracing::info!("Loaded agent profile: {}", profile.id);
        Ok(profile)
    }

    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PolicyError> {
        let content = serde_yaml::to_string(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    fn validate(&self) -> Result<(), PolicyError> {
        if self.id.trim().is_empty() {
            return Err(PolicyError::Invalid("profile id cannot be empty".to_string()));
        }
        let thresholds = [
            self.policy.danger_cautiousness,
            self.policy.min_confidence,
            self.policy.stop_on_error_cautiousness,
            self.policy.verbose_reasoning,
            self.policy.proactive_hint,
        ];
        if thresholds.iter().any(|t| !(0.0..=1.0).contains(t)) {
            return Err(PolicyError::Invalid(
                "policy thresholds must be within 0..1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AgentProfile {
    fn default() -> Self {
        Self {
            id: "lucy".to_string(),
            traits: PersonalityTraits::default(),
            policy: DecisionPolicy::default(),
        }
    }
}
