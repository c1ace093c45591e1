pub mod action;
pub mod app_tools;
pub mod backend;
pub mod chat_tool;
pub mod file_tools;
pub mod inventory;
pub mod process_tools;
pub mod registry;
pub mod system_tools;
pub mod traits;

pub use action::{Action, ActionError, ACTION_NAMES};
pub use backend::{Backend, BackendError};
pub use inventory::{AppInventory, InstalledApp, APP_MATCH_THRESHOLD};
pub use registry::ToolRegistry;
pub use traits::{Tool, ToolError, ToolResult};
