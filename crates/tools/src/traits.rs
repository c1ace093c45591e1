use crate::action::Action;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Backend error: {0}")]
    Backend(#[from] crate::backend::BackendError),
    #[error("Provider error: {0}")]
    Provider(#[from] lucy_providers::ProviderError),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(error.into()),
        }
    }
}

impl From<Result<String, ToolError>> for ToolResult {
    fn from(result: Result<String, ToolError>) -> Self {
        match result {
            Ok(output) => ToolResult::success(output),
            Err(e) => ToolResult::failure(e.to_string()),
        }
    }
}

/// A named operation the agent can plan with.
///
/// `execute` never fails past its own boundary: errors come back as a
/// `ToolResult` with `success == false`.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn schema(&self) -> serde_json::Value;

    async fn execute(&self, action: &Action) -> ToolResult;
}

pub(crate) fn mismatch(tool: &str, action: &Action) -> ToolError {
    ToolError::Validation(format!("{} cannot run action {}", tool, action.name()))
}
