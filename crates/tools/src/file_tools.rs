use crate::action::Action;
use crate::backend::{render_output, Backend};
use crate::traits::{mismatch, Tool, ToolError, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub struct CreateFileTool {
    backend: Arc<dyn Backend>,
}

impl CreateFileTool {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    async fn run(&self, action: &Action) -> Result<String, ToolError> {
        let Action::CreateFile { path, content } = action else {
            return Err(mismatch(self.name(), action));
        };
        if path.trim().is_empty() {
            return Err(ToolError::Validation("Missing 'path' field".to_string()));
        }

        self.backend
            .invoke("create_file", json!({ "path": path, "content": content }))
            .await?;
        Ok(format!("File created: {}", path))
    }
}

#[async_trait]
impl Tool for CreateFileTool {
    fn name(&self) -> &str {
        "create_file"
    }

    fn description(&self) -> &str {
        "Create a file with the given content"
    }

    fn schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "path": { "type": "string", "description": "File path" },
                "content": { "type": "string", "description": "Content to write" }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, action: &Action) -> ToolResult {
        self.run(action).await.into()
    }
}

pub struct ReadFileTool {
    backend: Arc<dyn Backend>,
}

impl ReadFileTool {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    async fn run(&self, action: &Action) -> Result<String, ToolError> {
        let Action::ReadFile { path } = action else {
            return Err(mismatch(self.name(), action));
        };

        let content = self
            .backend
            .invoke("read_file", json!({ "path": path }))
            .await?;
        Ok(format!("Contents: {}", render_output(&content)))
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read a file and return its contents"
    }

    fn schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "path": { "type": "string", "description": "File path" }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, action: &Action) -> ToolResult {
        self.run(action).await.into()
    }
}
