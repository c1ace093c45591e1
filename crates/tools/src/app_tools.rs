use crate::action::Action;
use crate::backend::Backend;
use crate::traits::{mismatch, Tool, ToolError, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub struct OpenApplicationTool {
    backend: Arc<dyn Backend>,
}

impl OpenApplicationTool {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    async fn run(&self, action: &Action) -> Result<String, ToolError> {
        let Action::OpenApplication { app_name } = action else {
            return Err(mismatch(self.name(), action));
        };
        if app_name.trim().is_empty() {
            return Err(ToolError::Validation("Missing 'appName' field".to_string()));
        }

        self.backend
            .invoke("open_application", json!({ "appName": app_name }))
            .await?;
        Ok(format!("Application {} opened", app_name))
    }
}

#[async_trait]
impl Tool for OpenApplicationTool {
    fn name(&self) -> &str {
        "open_application"
    }

    fn description(&self) -> &str {
        "Open an application (use the full path from the installed list)"
    }

    fn schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "appName": { "type": "string", "description": "Application name or path" }
            },
            "required": ["appName"]
        })
    }

    async fn execute(&self, action: &Action) -> ToolResult {
        self.run(action).await.into()
    }
}
