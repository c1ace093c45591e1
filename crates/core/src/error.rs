use lucy_providers::ProviderError;
use thiserror::Error;

/// Why an LLM plan could not be used.
#[derive(Debug, Error)]
pub enum PlanParseError {
    #[error("Invalid plan JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Plan confidence {0} is outside 0..1")]
    ConfidenceOutOfRange(f32),
    #[error("Invalid step {index}: {source}")]
    InvalidStep {
        index: usize,
        #[source]
        source: lucy_tools::ActionError,
    },
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("LLM is not configured")]
    ProviderUnavailable,
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("Plan parse error: {0}")]
    PlanParse(#[from] PlanParseError),
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
