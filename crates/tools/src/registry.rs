use crate::action::Action;
use crate::app_tools::OpenApplicationTool;
use crate::backend::Backend;
use crate::chat_tool::ChatTool;
use crate::file_tools::{CreateFileTool, ReadFileTool};
use crate::process_tools::{ExecuteCommandTool, ProcessListTool};
use crate::system_tools::{SearchWebTool, SystemInfoTool};
use crate::traits::{Tool, ToolResult};
use lucy_providers::ChatProvider;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Action name to tool mapping. Ordered so prompts built from it are stable.
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Registry with every built-in action wired to `backend`.
    pub fn with_default_tools(
        backend: Arc<dyn Backend>,
        provider: Option<Arc<dyn ChatProvider>>,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(OpenApplicationTool::new(backend.clone())));
        registry.register(Arc::new(CreateFileTool::new(backend.clone())));
        registry.register(Arc::new(ReadFileTool::new(backend.clone())));
        registry.register(Arc::new(ExecuteCommandTool::new(backend.clone())));
        registry.register(Arc::new(ProcessListTool::new(backend.clone())));
        registry.register(Arc::new(SystemInfoTool::new(backend.clone())));
        registry.register(Arc::new(SearchWebTool::new(backend)));
        registry.register(Arc::new(ChatTool::new(provider)));
        registry
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn list(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// One `- name: description` line per tool, for LLM prompts.
    pub fn describe(&self) -> String {
        self.tools
            .values()
            .map(|tool| format!("- {}: {}", tool.name(), tool.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn schemas(&self) -> Vec<serde_json::Value> {
        self.tools
            .values()
            .map(|tool| {
                serde_json::json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "parameters": tool.schema()
                })
            })
            .collect()
    }

    /// Dispatch by action name. Names with no tool fail with "Unknown action".
    pub async fn execute(&self, action: &Action) -> ToolResult {
        match self.tools.get(action.name()) {
            Some(tool) => tool.execute(action).await,
            None => ToolResult::failure(format!("Unknown action: {}", action.name())),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
