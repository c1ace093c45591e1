use crate::apps;
use crate::command_executor::{CommandExecutor, ExecutorError};
use crate::environment::{process_list, process_report, SystemSnapshot};
use crate::web_search::WebSearch;
use async_trait::async_trait;
use lucy_tools::{Backend, BackendError};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

const PROCESS_LIMIT: usize = 50;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenParams {
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
struct ShellParams {
    command: String,
    #[serde(default)]
    args: Vec<String>,
}

#[derive(Deserialize)]
struct SearchParams {
    query: String,
}

impl From<ExecutorError> for BackendError {
    fn from(e: ExecutorError) -> Self {
        match e {
            ExecutorError::Timeout(after) => BackendError::Timeout(format!("after {:?}", after)),
            other => BackendError::Failed(other.to_string()),
        }
    }
}

fn params<T: for<'de> Deserialize<'de>>(command: &str, params: Value) -> Result<T, BackendError> {
    serde_json::from_value(params)
        .map_err(|e| BackendError::Failed(format!("Invalid params for {}: {}", command, e)))
}

fn failed(e: impl std::fmt::Display) -> BackendError {
    BackendError::Failed(e.to_string())
}

/// The backend RPC surface implemented against the host OS.
pub struct LocalBackend {
    commands: CommandExecutor,
    search: WebSearch,
    app_dirs: Vec<PathBuf>,
}

impl LocalBackend {
    pub fn new() -> Result<Self, BackendError> {
        Ok(Self {
            commands: CommandExecutor::default(),
            search: WebSearch::new().map_err(failed)?,
            app_dirs: apps::default_app_dirs(),
        })
    }

    pub fn with_app_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.app_dirs = dirs;
        self
    }

    pub fn with_command_executor(mut self, commands: CommandExecutor) -> Self {
        self.commands = commands;
        self
    }

    async fn open_application(&self, app_name: &str) -> Result<String, BackendError> {
        tracing::info!("Opening application: {}", app_name);
        if Path::new(app_name).exists() {
            open::that_detached(app_name).map_err(failed)?;
            return Ok(format!("Application {} opened", app_name));
        }

        // Launcher commands from .desktop entries carry their own arguments.
        let mut parts = app_name.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| BackendError::Failed("Empty application name".to_string()))?;
        tokio::process::Command::new(program)
            .args(parts)
            .spawn()
            .map_err(|e| failed(format!("Failed to open {}: {}", app_name, e)))?;
        Ok(format!("Application {} opened", app_name))
    }

    async fn create_file(&self, path: &str, content: &str) -> Result<String, BackendError> {
        let path = Path::new(path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(failed)?;
        }
        tokio::fs::write(path, content).await.map_err(failed)?;
        Ok(format!("File created: {}", path.display()))
    }

    async fn installed_apps(&self) -> Result<Value, BackendError> {
        let dirs = self.app_dirs.clone();
        let found = tokio::task::spawn_blocking(move || apps::scan(&dirs))
            .await
            .map_err(failed)?;
        tracing::debug!("Found {} installed applications", found.len());
        serde_json::to_value(found).map_err(failed)
    }
}

#[async_trait]
impl Backend for LocalBackend {
    async fn invoke(&self, command: &str, raw: Value) -> Result<Value, BackendError> {
        match command {
            "open_application" => {
                let p: OpenParams = params(command, raw)?;
                Ok(json!(self.open_application(&p.app_name).await?))
            }
            "create_file" => {
                let p: CreateFileParams = params(command, raw)?;
                Ok(json!(self.create_file(&p.path, &p.content).await?))
            }
            "read_file" => {
                let p: PathParams = params(command, raw)?;
                let content = tokio::fs::read_to_string(&p.path).await.map_err(failed)?;
                Ok(json!(content))
            }
            "execute_shell_command" => {
                let p: ShellParams = params(command, raw)?;
                Ok(json!(self.commands.execute(&p.command, &p.args).await?))
            }
            "get_process_list" => {
                let processes = tokio::task::spawn_blocking(|| process_list(PROCESS_LIMIT))
                    .await
                    .map_err(failed)?;
                Ok(json!(process_report(&processes)))
            }
            "get_system_info" => {
                let snapshot = tokio::task::spawn_blocking(SystemSnapshot::capture)
                    .await
                    .map_err(failed)?;
                Ok(json!(snapshot.to_report()))
            }
            "get_installed_apps" => self.installed_apps().await,
            "search_web" => {
                let p: SearchParams = params(command, raw)?;
                Ok(json!(self.search.search(&p.query).await.map_err(failed)?))
            }
            other => Err(BackendError::Unsupported(other.to_string())),
        }
    }
}
