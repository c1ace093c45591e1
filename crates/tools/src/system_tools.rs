use crate::action::Action;
use crate::backend::{render_output, Backend};
use crate::traits::{mismatch, Tool, ToolError, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub struct SystemInfoTool {
    backend: Arc<dyn Backend>,
}

impl SystemInfoTool {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for SystemInfoTool {
    fn name(&self) -> &str {
        "get_system_info"
    }

    fn description(&self) -> &str {
        "Get information about the operating system and hardware"
    }

    fn schema(&self) -> serde_json::Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, action: &Action) -> ToolResult {
        if !matches!(action, Action::GetSystemInfo) {
            return ToolResult::failure(mismatch(self.name(), action).to_string());
        }
        match self.backend.invoke("get_system_info", json!({})).await {
            Ok(info) => ToolResult::success(render_output(&info)),
            Err(e) => ToolResult::failure(e.to_string()),
        }
    }
}

pub struct SearchWebTool {
    backend: Arc<dyn Backend>,
}

impl SearchWebTool {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    async fn run(&self, action: &Action) -> Result<String, ToolError> {
        let Action::SearchWeb { query } = action else {
            return Err(mismatch(self.name(), action));
        };
        if query.trim().is_empty() {
            return Err(ToolError::Validation("Missing 'query' field".to_string()));
        }

        let results = self
            .backend
            .invoke("search_web", json!({ "query": query }))
            .await?;
        Ok(render_output(&results))
    }
}

#[async_trait]
impl Tool for SearchWebTool {
    fn name(&self) -> &str {
        "search_web"
    }

    fn description(&self) -> &str {
        "Search the web through DuckDuckGo"
    }

    fn schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Search query" }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, action: &Action) -> ToolResult {
        self.run(action).await.into()
    }
}
