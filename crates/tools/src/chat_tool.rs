use crate::action::Action;
use crate::traits::{mismatch, Tool, ToolError, ToolResult};
use async_trait::async_trait;
use lucy_providers::{ChatMessage, ChatProvider};
use serde_json::json;
use std::sync::Arc;

pub const LLM_UNAVAILABLE: &str = "LLM is not available for chat";

/// Free-form reply from the configured LLM.
pub struct ChatTool {
    provider: Option<Arc<dyn ChatProvider>>,
}

impl ChatTool {
    pub fn new(provider: Option<Arc<dyn ChatProvider>>) -> Self {
        Self { provider }
    }

    async fn run(&self, action: &Action) -> Result<String, ToolError> {
        let Action::Chat { message } = action else {
            return Err(mismatch(self.name(), action));
        };
        let Some(provider) = &self.provider else {
            return Ok(LLM_UNAVAILABLE.to_string());
        };

        Ok(provider.chat(&[ChatMessage::user(message.as_str())]).await?)
    }
}

#[async_trait]
impl Tool for ChatTool {
    fn name(&self) -> &str {
        "chat"
    }

    fn description(&self) -> &str {
        "Reply to the user in natural language"
    }

    fn schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "message": { "type": "string", "description": "Message to answer" }
            },
            "required": ["message"]
        })
    }

    async fn execute(&self, action: &Action) -> ToolResult {
        self.run(action).await.into()
    }
}
