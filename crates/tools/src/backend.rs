use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    Failed(String),
    #[error("Unsupported command: {0}")]
    Unsupported(String),
    #[error("Command timed out: {0}")]
    Timeout(String),
}

/// Invoke-by-name RPC surface of the native backend. Every OS side effect
/// the agent can cause goes through here.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn invoke(&self, command: &str, params: Value) -> Result<Value, BackendError>;
}

/// Render a backend reply as user-facing text.
pub fn render_output(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
