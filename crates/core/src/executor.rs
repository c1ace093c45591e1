use crate::plan::ActionPlan;
use lucy_memory::{LearningLog, LearningResult, ThoughtKind, ThoughtLog};
use lucy_tools::{Action, ToolRegistry, ToolResult};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionReport {
    /// Successful outputs and "Step N failed: ..." lines, in step order.
    pub results: Vec<String>,
    pub succeeded: usize,
    pub failed: usize,
    pub stopped_early: bool,
}

impl ExecutionReport {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.results.join("\n"))
    }
}

/// Dispatch `action`, turning an expired `timeout` into an ordinary failure.
pub(crate) async fn execute_with_timeout(
    registry: &ToolRegistry,
    action: &Action,
    timeout: Duration,
) -> ToolResult {
    match tokio::time::timeout(timeout, registry.execute(action)).await {
        Ok(result) => result,
        Err(_) => ToolResult::failure(format!("Timed out after {}s", timeout.as_secs())),
    }
}

/// Runs plan steps one at a time against the tool registry.
pub struct PlanExecutor {
    registry: Arc<ToolRegistry>,
    step_timeout: Duration,
}

impl PlanExecutor {
    pub fn new(registry: Arc<ToolRegistry>, step_timeout: Duration) -> Self {
        Self {
            registry,
            step_timeout,
        }
    }

    /// Every step leaves a learning behind. With `stop_on_error` the first
    /// failure ends the run and later steps are never attempted.
    pub async fn execute(
        &self,
        plan: &ActionPlan,
        stop_on_error: bool,
        learnings: &mut LearningLog,
        thoughts: &mut ThoughtLog,
    ) -> ExecutionReport {
        thoughts.add(ThoughtKind::Execution, "Starting plan execution...", 0.9);

        let mut report = ExecutionReport::default();
        let total = plan.steps.len();

        for (index, step) in plan.steps.iter().enumerate() {
            let number = index + 1;
            let action_name = step.action.name();
            thoughts.add(
                ThoughtKind::Execution,
                format!("Step {}/{}: {}", number, total, action_name),
                0.85,
            );
            debug!("Executing step {}/{}: {:?}", number, total, step.action);

            let result = execute_with_timeout(&self.registry, &step.action, self.step_timeout).await;

            if result.success {
                thoughts.add(
                    ThoughtKind::Execution,
                    format!("Step {} done: {}", number, result.output),
                    0.9,
                );
                learnings
                    .record(action_name, LearningResult::Success, &result.output)
                    .await;
                report.results.push(result.output);
                report.succeeded += 1;
                continue;
            }

            let error = result.error.unwrap_or_else(|| "unknown error".to_string());
            let message = format!("Step {} failed: {}", number, error);
            warn!("{}", message);
            thoughts.add(ThoughtKind::Execution, message.clone(), 0.3);
            learnings
                .record(action_name, LearningResult::Failure, &error)
                .await;
            report.results.push(message);
            report.failed += 1;

            if stop_on_error {
                thoughts.add(
                    ThoughtKind::Decision,
                    "Stopping execution because of the error",
                    0.8,
                );
                report.stopped_early = number < total;
                break;
            }
        }

        report
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::plan::PlanStep;
    use async_trait::async_trait;
    use lucy_memory::InMemoryStore;
    use lucy_tools::{Action, Backend, BackendError};
    use serde_json::{json, Value};
    use tokio::sync::Mutex;

    /// Fails `read_file`, hangs on `get_processes`, succeeds otherwise.
    #[derive(Default)]
    struct ScriptedBackend {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Backend for ScriptedBackend {
        async fn invoke(&self, command: &str, _params: Value) -> Result<Value, BackendError> {
            self.calls.lock().await.push(command.to_string());
            match command {
                "read_file" => Err(BackendError::Failed("file not found".to_string())),
                "get_process_list" => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(json!("never"))
                }
                _ => Ok(json!("ok")),
            }
        }
    }

    fn setup() -> (Arc<ScriptedBackend>, PlanExecutor, LearningLog, ThoughtLog) {
        let backend = Arc::new(ScriptedBackend::default());
        let registry = Arc::new(ToolRegistry::with_default_tools(backend.clone(), None));
        let executor = PlanExecutor::new(registry, Duration::from_secs(5));
        let learnings = LearningLog::new(Arc::new(InMemoryStore::new()));
        (backend, executor, learnings, ThoughtLog::new())
    }

    fn failing_then_ok() -> ActionPlan {
        ActionPlan::new("two steps", 0.9)
            .with_step(PlanStep::new(
                Action::ReadFile {
                    path: "missing.txt".to_string(),
                },
                "read",
                "contents",
            ))
            .with_step(PlanStep::new(
                Action::CreateFile {
                    path: "out.txt".to_string(),
                    content: String::new(),
                },
                "write",
                "file",
            ))
    }

    #[tokio::test]
    async fn test_stop_on_error() {
        let (backend, executor, mut learnings, mut thoughts) = setup();
        let report = executor
            .execute(&failing_then_ok(), true, &mut learnings, &mut thoughts)
            .await;

        assert_eq!(report.failed, 1);
        assert_eq!(report.succeeded, 0);
        assert!(report.stopped_early);
        assert_eq!(report.to_string(), "Step 1 failed: Backend error: file not found");
        assert_eq!(*backend.calls.lock().await, vec!["read_file".to_string()]);
        assert_eq!(learnings.len(), 1);
        assert!(learnings.latest_for("read_file").unwrap().is_failure());
    }

    #[tokio::test]
    async fn test_continue_after_error() {
        let (backend, executor, mut learnings, mut thoughts) = setup();
        let report = executor
            .execute(&failing_then_ok(), false, &mut learnings, &mut thoughts)
            .await;

        assert_eq!(report.failed, 1);
        assert_eq!(report.succeeded, 1);
        assert!(!report.stopped_early);
        assert_eq!(
            report.to_string(),
            "Step 1 failed: Backend error: file not found\nFile created: out.txt"
        );
        assert_eq!(backend.calls.lock().await.len(), 2);
        assert_eq!(learnings.stats().total, 2);
    }

    #[tokio::test]
    async fn test_unknown_action_fails_step() {
        let (backend, executor, mut learnings, mut thoughts) = setup();
        let plan = ActionPlan::new("x", 0.9).with_step(PlanStep::new(
            Action::Unknown {
                name: "media_control".to_string(),
                params: json!({"action": "play"}),
            },
            "play",
            "music",
        ));

        let report = executor.execute(&plan, true, &mut learnings, &mut thoughts).await;

        assert_eq!(report.to_string(), "Step 1 failed: Unknown action: media_control");
        assert!(backend.calls.lock().await.is_empty());
        assert!(learnings.latest_for("media_control").unwrap().is_failure());
    }

    #[tokio::test(start_paused = true)]
    async fn test_step_timeout_is_failure() {
        let (_backend, executor, mut learnings, mut thoughts) = setup();
        let plan = ActionPlan::new("x", 0.9).with_step(PlanStep::new(
            Action::GetProcesses,
            "list",
            "processes",
        ));

        let report = executor.execute(&plan, true, &mut learnings, &mut thoughts).await;

        assert_eq!(report.failed, 1);
        assert_eq!(report.to_string(), "Step 1 failed: Timed out after 5s");
    }

    #[tokio::test]
    async fn test_re_execution_records_again() {
        let (_backend, executor, mut learnings, mut thoughts) = setup();
        let plan = ActionPlan::new("x", 0.9).with_step(PlanStep::new(
            Action::GetSystemInfo,
            "info",
            "details",
        ));

        executor.execute(&plan, true, &mut learnings, &mut thoughts).await;
        executor.execute(&plan, true, &mut learnings, &mut thoughts).await;

        assert_eq!(learnings.stats().successes, 2);
    }
}
