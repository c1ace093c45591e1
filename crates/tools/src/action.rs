//! Typed plan actions.
//!
//! On the wire an action is `{"action": "<name>", "params": {...}}` with
//! camelCase parameter keys. Known names must carry well-formed params;
//! unknown names are kept as [`Action::Unknown`] so that execution can
//! report them.

use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

pub const ACTION_NAMES: &[&str] = &[
    "open_application",
    "create_file",
    "read_file",
    "execute_command",
    "get_processes",
    "get_system_info",
    "chat",
    "search_web",
];

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Invalid params for {action}: {source}")]
    InvalidParams {
        action: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    OpenApplication { app_name: String },
    CreateFile { path: String, content: String },
    ReadFile { path: String },
    ExecuteCommand { command: String, args: Vec<String> },
    GetProcesses,
    GetSystemInfo,
    Chat { message: String },
    SearchWeb { query: String },
    Unknown { name: String, params: Value },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenApplicationParams {
    app_name: String,
}

#[derive(Deserialize)]
struct CreateFileParams {
    path: String,
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct PathParams {
    path: String,
}

#[derive(Deserialize)]
struct ExecuteCommandParams {
    command: String,
    #[serde(default)]
    args: Vec<String>,
}

#[derive(Deserialize)]
struct ChatParams {
    message: String,
}

#[derive(Deserialize)]
struct SearchParams {
    query: String,
}

fn parse<T: for<'de> Deserialize<'de>>(action: &str, params: Value) -> Result<T, ActionError> {
    // Parameterless actions are often sent with `null` params.
    let params = if params.is_null() { json!({}) } else { params };
    serde_json::from_value(params).map_err(|source| ActionError::InvalidParams {
        action: action.to_string(),
        source,
    })
}

impl Action {
    pub fn from_wire(name: &str, params: Value) -> Result<Self, ActionError> {
        let action = match name {
            "open_application" => {
                let p: OpenApplicationParams = parse(name, params)?;
                Action::OpenApplication { app_name: p.app_name }
            }
            "create_file" => {
                let p: CreateFileParams = parse(name, params)?;
                Action::CreateFile {
                    path: p.path,
                    content: p.content,
                }
            }
            "read_file" => {
                let p: PathParams = parse(name, params)?;
                Action::ReadFile { path: p.path }
            }
            "execute_command" => {
                let p: ExecuteCommandParams = parse(name, params)?;
                Action::ExecuteCommand {
                    command: p.command,
                    args: p.args,
                }
            }
            "get_processes" => Action::GetProcesses,
            "get_system_info" => Action::GetSystemInfo,
            "chat" => {
                let p: ChatParams = parse(name, params)?;
                Action::Chat { message: p.message }
            }
            "search_web" => {
                let p: SearchParams = parse(name, params)?;
                Action::SearchWeb { query: p.query }
            }
            other => Action::Unknown {
                name: other.to_string(),
                params,
            },
        };
        Ok(action)
    }

    pub fn name(&self) -> &str {
        match self {
            Action::OpenApplication { .. } => "open_application",
            Action::CreateFile { .. } => "create_file",
            Action::ReadFile { .. } => "read_file",
            Action::ExecuteCommand { .. } => "execute_command",
            Action::GetProcesses => "get_processes",
            Action::GetSystemInfo => "get_system_info",
            Action::Chat { .. } => "chat",
            Action::SearchWeb { .. } => "search_web",
            Action::Unknown { name, .. } => name.as_str(),
        }
    }

    pub fn params(&self) -> Value {
        match self {
            Action::OpenApplication { app_name } => json!({ "appName": app_name }),
            Action::CreateFile { path, content } => json!({ "path": path, "content": content }),
            Action::ReadFile { path } => json!({ "path": path }),
            Action::ExecuteCommand { command, args } => {
                json!({ "command": command, "args": args })
            }
            Action::GetProcesses | Action::GetSystemInfo => json!({}),
            Action::Chat { message } => json!({ "message": message }),
            Action::SearchWeb { query } => json!({ "query": query }),
            Action::Unknown { params, .. } => params.clone(),
        }
    }

    pub fn to_wire(&self) -> Value {
        json!({ "action": self.name(), "params": self.params() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_action_parsed() {
        let action = Action::from_wire(
            "create_file",
            json!({"path": "hello.txt", "content": "привет"}),
        )
        .unwrap();
        assert_eq!(
            action,
            Action::CreateFile {
                path: "hello.txt".to_string(),
                content: "привет".to_string()
            }
        );
    }

    #[test]
    fn test_camel_case_app_name() {
        let action = Action::from_wire("open_application", json!({"appName": "Spotify"})).unwrap();
        assert_eq!(action.params(), json!({"appName": "Spotify"}));
    }

    #[test]
    fn test_defaults_applied() {
        let action = Action::from_wire("execute_command", json!({"command": "dir"})).unwrap();
        assert_eq!(
            action,
            Action::ExecuteCommand {
                command: "dir".to_string(),
                args: vec![]
            }
        );
        assert_eq!(
            Action::from_wire("get_processes", Value::Null).unwrap(),
            Action::GetProcesses
        );
    }

    #[test]
    fn test_missing_field_rejected() {
        let result = Action::from_wire("read_file", json!({"file": "x"}));
        assert!(matches!(result, Err(ActionError::InvalidParams { .. })));
    }

    #[test]
    fn test_unknown_action_preserved() {
        let action = Action::from_wire("media_control", json!({"action": "play"})).unwrap();
        assert_eq!(action.name(), "media_control");
        assert_eq!(action.to_wire()["params"]["action"], "play");
    }

    #[test]
    fn test_every_known_name_roundtrips() {
        for name in ACTION_NAMES {
            let params = match *name {
                "open_application" => json!({"appName": "x"}),
                "create_file" | "read_file" => json!({"path": "x"}),
                "execute_command" => json!({"command": "x"}),
                "chat" => json!({"message": "x"}),
                "search_web" => json!({"query": "x"}),
                _ => json!({}),
            };
            let action = Action::from_wire(name, params).unwrap();
            assert_eq!(action.name(), *name);
            assert!(!matches!(action, Action::Unknown { .. }));
        }
    }
}
