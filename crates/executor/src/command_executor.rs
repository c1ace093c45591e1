use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Empty command")]
    EmptyCommand,
    #[error("Failed to start command: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// Runs a command line through the platform shell: PowerShell on Windows,
/// `sh -c` elsewhere.
pub struct CommandExecutor {
    timeout: Duration,
}

impl CommandExecutor {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn command_line(command: &str, args: &[String]) -> String {
        if args.is_empty() {
            command.trim().to_string()
        } else {
            format!("{} {}", command.trim(), args.join(" "))
        }
    }

    fn shell(line: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("powershell");
            cmd.args(["-NoProfile", "-Command", line]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", line]);
            cmd
        }
    }

    pub async fn execute(&self, command: &str, args: &[String]) -> Result<String, ExecutorError> {
        let line = Self::command_line(command, args);
        if line.is_empty() {
            return Err(ExecutorError::EmptyCommand);
        }

        tracing::info!("Executing command: {}", line);

        let mut cmd = Self::shell(&line);
        cmd.kill_on_drop(true);
        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| ExecutorError::Timeout(self.timeout))??;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("exit status {}", output.status)
            } else {
                stderr
            };
            Err(ExecutorError::ExecutionFailed(message))
        }
    }
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEOUT)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo() {
        let executor = CommandExecutor::default();
        let output = executor.execute("echo", &["hello".to_string()]).await.unwrap();
        assert_eq!(output.trim(), "hello");
    }

    #[tokio::test]
    async fn test_failing_command_reports_stderr() {
        let executor = CommandExecutor::default();
        let result = executor.execute("ls /definitely/not/here", &[]).await;
        assert!(matches!(result, Err(ExecutorError::ExecutionFailed(_))));
    }

    #[tokio::test]
    async fn test_empty_command() {
        let executor = CommandExecutor::default();
        let result = executor.execute("   ", &[]).await;
        assert!(matches!(result, Err(ExecutorError::EmptyCommand)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let executor = CommandExecutor::new(Duration::from_millis(100));
        let result = executor.execute("sleep 5", &[]).await;
        assert!(matches!(result, Err(ExecutorError::Timeout(_))));
    }

    #[test]
    fn test_command_line_joins_args() {
        let line = CommandExecutor::command_line("shutdown", &["/s".into(), "/t".into(), "30".into()]);
        assert_eq!(line, "shutdown /s /t 30");
    }
}
