//! Plan construction.
//!
//! Basic plans come from fixed per-intent templates. Smart plans ask the
//! LLM for a JSON plan; the caller falls back to a basic plan whenever
//! that fails.

use crate::error::AgentError;
use crate::intent::Intent;
use crate::plan::{parse_plan, ActionPlan, PlanStep};
use lucy_providers::{ChatMessage, ChatProvider};
use lucy_tools::{Action, InstalledApp, ToolRegistry};
use regex::Regex;

pub const BASIC_CONFIDENCE: f32 = 0.7;
pub const BASIC_REASONING: &str = "basic keyword plan";

const PLANNER_SYSTEM_PROMPT: &str =
    "You are the planning system of an AI agent. Reply with JSON only.";

const PLAN_EXAMPLE: &str = r#"{
  "reasoning": "The user wants to open the application first and then read a file.",
  "confidence": 0.95,
  "steps": [
    {
      "action": "open_application",
      "params": {"appName": "Spotify"},
      "reason": "Open Spotify",
      "expectedOutcome": "Spotify starts"
    },
    {
      "action": "read_file",
      "params": {"path": "notes.txt"},
      "reason": "Read the notes",
      "expectedOutcome": "File contents are shown"
    }
  ]
}"#;

pub struct Planner {
    app_name: Regex,
    file_path: Regex,
    file_content: Regex,
    command: Regex,
    search_query: Regex,
}

impl Planner {
    pub fn new() -> Result<Self, AgentError> {
        Ok(Self {
            app_name: Regex::new(r"(?i)\b(?:открой|запусти|open|launch)\s+(.+)$")?,
            file_path: Regex::new(
                r"(?i)\b(?:создай|создать|напиши|create|write)\s+(?:файл|file)\s+(.+?)(?:\s+(?:с|with)\s|$)",
            )?,
            file_content: Regex::new(
                r"(?i)^\s*(?:с|with)\s+(?:(?:текстом|содержимым|text|content)\s+)?(.+)$",
            )?,
            command: Regex::new(r"(?i)\b(?:выполни|execute|run)\s+(.+)$")?,
            search_query: Regex::new(r"(?i)\b(?:найди|ищи|find|search)\s+(?:for\s+)?(.+)$")?,
        })
    }

    /// Application name the user asked for: the text after the open verb,
    /// or the whole utterance.
    pub fn app_query(&self, utterance: &str) -> String {
        capture(&self.app_name, utterance).unwrap_or_else(|| utterance.trim().to_string())
    }

    /// Template plan for `intent`. `app` is the inventory match for
    /// open requests. Failed extraction leaves the plan empty.
    pub fn basic_plan(&self, utterance: &str, intent: Intent, app: Option<&InstalledApp>) -> ActionPlan {
        let plan = ActionPlan::new(BASIC_REASONING, BASIC_CONFIDENCE);
        let lower = utterance.to_lowercase();

        match intent {
            Intent::OpenApplication => match app {
                Some(app) => plan.with_step(PlanStep::new(
                    Action::OpenApplication {
                        app_name: app.path.clone(),
                    },
                    format!("The user wants to open {}", app.name),
                    format!("{} starts", app.name),
                )),
                None => plan.with_step(app_not_found(&self.app_query(utterance))),
            },
            Intent::CreateFile => match self.create_file_action(utterance) {
                Some(action) => plan.with_step(PlanStep::new(
                    action,
                    "Create the requested file",
                    "The file is created",
                )),
                None => plan,
            },
            Intent::GetInformation => {
                if lower.contains("процесс") || lower.contains("process") {
                    plan.with_step(PlanStep::new(
                        Action::GetProcesses,
                        "List running processes",
                        "A list of running processes",
                    ))
                } else if lower.contains("систем") || lower.contains("system") {
                    plan.with_step(PlanStep::new(
                        Action::GetSystemInfo,
                        "Collect system information",
                        "System details",
                    ))
                } else {
                    plan
                }
            }
            Intent::ExecuteCommand => match self.command_action(utterance, &lower) {
                Some(action) => plan.with_step(PlanStep::new(
                    action,
                    "Run the requested command",
                    "The command completes",
                )),
                None => plan,
            },
            Intent::Search => match capture(&self.search_query, utterance) {
                Some(query) => plan.with_step(PlanStep::new(
                    Action::SearchWeb { query },
                    "Search the web",
                    "Top search results",
                )),
                None => plan,
            },
            Intent::Help | Intent::GeneralTask => plan.with_step(PlanStep::new(
                Action::Chat {
                    message: utterance.to_string(),
                },
                "General request, a conversation is needed",
                "An answer to the question",
            )),
        }
    }

    fn create_file_action(&self, utterance: &str) -> Option<Action> {
        let caps = self.file_path.captures(utterance)?;
        let path = caps.get(1)?;
        let content = capture(&self.file_content, &utterance[path.end()..]).unwrap_or_default();
        Some(Action::CreateFile {
            path: path.as_str().trim().to_string(),
            content,
        })
    }

    fn command_action(&self, utterance: &str, lower: &str) -> Option<Action> {
        let command = if let Some(command) = capture(&self.command, utterance) {
            command
        } else if lower.contains("выключи") || lower.contains("shutdown") || lower.contains("shut down") {
            "shutdown /s /t 30".to_string()
        } else if lower.contains("перезагрузи") || lower.contains("restart") || lower.contains("reboot") {
            "shutdown /r /t 30".to_string()
        } else {
            return None;
        };
        Some(Action::ExecuteCommand {
            command,
            args: Vec::new(),
        })
    }

    /// Ask the LLM for a plan. Provider and parse failures are returned so
    /// the caller can fall back.
    pub async fn smart_plan(
        &self,
        provider: &dyn ChatProvider,
        registry: &ToolRegistry,
        utterance: &str,
    ) -> Result<ActionPlan, AgentError> {
        let messages = [
            ChatMessage::system(PLANNER_SYSTEM_PROMPT),
            ChatMessage::user(plan_prompt(registry, utterance)),
        ];
        let reply = provider.chat(&messages).await?;
        tracing::debug!("LLM plan reply: {}", reply);
        Ok(parse_plan(&reply)?)
    }
}

/// Chat step telling the user that `query` matched no installed application.
pub fn app_not_found(query: &str) -> PlanStep {
    PlanStep::new(
        Action::Chat {
            message: format!(
                "I could not find the application \"{}\". Please try again.",
                query
            ),
        },
        "Application not found",
        "Tell the user about the failure",
    )
}

pub fn plan_prompt(registry: &ToolRegistry, utterance: &str) -> String {
    let actions: Vec<String> = registry
        .schemas()
        .iter()
        .map(|schema| schema.to_string())
        .collect();
    format!(
        "Break the user's request into a sequence of concrete actions. Reply in JSON only.\n\n\
         Request:\n\"{}\"\n\n\
         If the request contains several commands (for example \"open X and do Y\"), create one step per command.\n\n\
         Example plan for \"Open Spotify and read notes.txt\":\n{}\n\n\
         Available actions (name, description and JSON schema of params):\n{}\n\n\
         Build the JSON plan for the current request.",
        utterance,
        PLAN_EXAMPLE,
        actions.join("\n")
    )
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn planner() -> Planner {
        Planner::new().unwrap()
    }

    #[test]
    fn test_create_file_with_content() {
        let plan = planner().basic_plan(
            "создай файл hello.txt с текстом привет",
            Intent::CreateFile,
            None,
        );
        assert_eq!(plan.confidence, BASIC_CONFIDENCE);
        assert_eq!(
            plan.steps[0].action,
            Action::CreateFile {
                path: "hello.txt".to_string(),
                content: "привет".to_string()
            }
        );
    }

    #[test]
    fn test_create_file_english_keeps_case() {
        let plan = planner().basic_plan(
            "Create file Notes/Todo.md with content Buy milk",
            Intent::CreateFile,
            None,
        );
        assert_eq!(
            plan.steps[0].action,
            Action::CreateFile {
                path: "Notes/Todo.md".to_string(),
                content: "Buy milk".to_string()
            }
        );
    }

    #[test]
    fn test_create_file_without_content() {
        let plan = planner().basic_plan("создай файл empty.txt", Intent::CreateFile, None);
        assert_eq!(
            plan.steps[0].action,
            Action::CreateFile {
                path: "empty.txt".to_string(),
                content: String::new()
            }
        );
    }

    #[test]
    fn test_failed_extraction_is_empty() {
        let plan = planner().basic_plan("напиши стихотворение", Intent::CreateFile, None);
        assert!(plan.is_empty());
        let plan = planner().basic_plan("покажи погоду", Intent::GetInformation, None);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_information_templates() {
        let p = planner();
        let plan = p.basic_plan("покажи процессы", Intent::GetInformation, None);
        assert_eq!(plan.steps[0].action, Action::GetProcesses);
        let plan = p.basic_plan("show system info", Intent::GetInformation, None);
        assert_eq!(plan.steps[0].action, Action::GetSystemInfo);
    }

    #[test]
    fn test_power_phrases() {
        let p = planner();
        let plan = p.basic_plan("выключи компьютер", Intent::ExecuteCommand, None);
        assert_eq!(
            plan.steps[0].action,
            Action::ExecuteCommand {
                command: "shutdown /s /t 30".to_string(),
                args: vec![]
            }
        );
        let plan = p.basic_plan("перезагрузи систему", Intent::ExecuteCommand, None);
        assert_eq!(
            plan.steps[0].action,
            Action::ExecuteCommand {
                command: "shutdown /r /t 30".to_string(),
                args: vec![]
            }
        );
    }

    #[test]
    fn test_explicit_command() {
        let plan = planner().basic_plan("выполни ipconfig /all", Intent::ExecuteCommand, None);
        assert_eq!(
            plan.steps[0].action,
            Action::ExecuteCommand {
                command: "ipconfig /all".to_string(),
                args: vec![]
            }
        );
    }

    #[test]
    fn test_search_query() {
        let plan = planner().basic_plan("search for tokio tutorials", Intent::Search, None);
        assert_eq!(
            plan.steps[0].action,
            Action::SearchWeb {
                query: "tokio tutorials".to_string()
            }
        );
    }

    #[test]
    fn test_open_found_app_uses_path() {
        let app = InstalledApp {
            name: "Adobe Photoshop".to_string(),
            path: "C:\\Apps\\Photoshop.exe".to_string(),
        };
        let plan = planner().basic_plan("открой фотошоп", Intent::OpenApplication, Some(&app));
        assert_eq!(
            plan.steps[0].action,
            Action::OpenApplication {
                app_name: "C:\\Apps\\Photoshop.exe".to_string()
            }
        );
    }

    #[test]
    fn test_open_missing_app_chats() {
        let plan = planner().basic_plan("открой блендер", Intent::OpenApplication, None);
        assert_eq!(plan.steps.len(), 1);
        match &plan.steps[0].action {
            Action::Chat { message } => assert!(message.contains("блендер")),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_general_task_chats() {
        let plan = planner().basic_plan("расскажи анекдот", Intent::GeneralTask, None);
        assert_eq!(
            plan.steps[0].action,
            Action::Chat {
                message: "расскажи анекдот".to_string()
            }
        );
    }

    #[test]
    fn test_app_query() {
        let p = planner();
        assert_eq!(p.app_query("Открой Google Chrome"), "Google Chrome");
        assert_eq!(p.app_query("spotify"), "spotify");
    }
}
