use crate::action::Action;
use crate::backend::{render_output, Backend};
use crate::traits::{mismatch, Tool, ToolError, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub struct ExecuteCommandTool {
    backend: Arc<dyn Backend>,
}

impl ExecuteCommandTool {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    async fn run(&self, action: &Action) -> Result<String, ToolError> {
        let Action::ExecuteCommand { command, args } = action else {
            return Err(mismatch(self.name(), action));
        };
        if command.trim().is_empty() {
            return Err(ToolError::Validation("Missing 'command' field".to_string()));
        }

        tracing::info!("Executing command: {} {:?}", command, args);
        let output = self
            .backend
            .invoke(
                "execute_shell_command",
                json!({ "command": command, "args": args }),
            )
            .await?;
        Ok(render_output(&output))
    }
}

#[async_trait]
impl Tool for ExecuteCommandTool {
    fn name(&self) -> &str {
        "execute_command"
    }

    fn description(&self) -> &str {
        "Run a shell command (cmd, powershell)"
    }

    fn schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "command": { "type": "string", "description": "Command to run" },
                "args": { "type": "array", "items": { "type": "string" } }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, action: &Action) -> ToolResult {
        self.run(action).await.into()
    }
}

pub struct ProcessListTool {
    backend: Arc<dyn Backend>,
}

impl ProcessListTool {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for ProcessListTool {
    fn name(&self) -> &str {
        "get_processes"
    }

    fn description(&self) -> &str {
        "List running processes"
    }

    fn schema(&self) -> serde_json::Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, action: &Action) -> ToolResult {
        if !matches!(action, Action::GetProcesses) {
            return ToolResult::failure(mismatch(self.name(), action).to_string());
        }
        match self.backend.invoke("get_process_list", json!({})).await {
            Ok(output) => ToolResult::success(render_output(&output)),
            Err(e) => ToolResult::failure(e.to_string()),
        }
    }
}
