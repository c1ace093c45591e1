//! Multi-turn tool loop driven by the LLM.
//!
//! The model answers in a small text protocol:
//!
//! ```text
//! TOOL: <name>
//! PARAMS: <JSON object>
//! REASON: <why>
//! ```
//!
//! or `DONE: <final answer>`. Every tool result is fed back as the next
//! user turn. The iteration cap is the only way the loop ends without an
//! answer.

use crate::error::AgentError;
use crate::executor::execute_with_timeout;
use lucy_memory::{LearningLog, LearningResult, ThoughtKind, ThoughtLog};
use lucy_providers::{ChatMessage, ChatProvider};
use lucy_tools::{Action, ToolRegistry};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_MAX_ITERATIONS: usize = 5;

const NUDGE: &str = "Use tools or answer DONE:";

#[derive(Debug, Clone, PartialEq)]
pub enum AgentReply {
    Done(String),
    ToolCall {
        tool: String,
        params: Option<Value>,
        reason: Option<String>,
    },
    Other,
}

/// Classify one model turn. `DONE:` wins over `TOOL:` when both appear.
pub fn parse_reply(reply: &str) -> AgentReply {
    if let Some(pos) = reply.find("DONE:") {
        let answer = reply[pos + "DONE:".len()..].trim();
        if !answer.is_empty() {
            return AgentReply::Done(answer.to_string());
        }
    }

    let Some(tool) = field(reply, "TOOL:").and_then(|rest| {
        let name: String = rest
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        (!name.is_empty()).then_some(name)
    }) else {
        return AgentReply::Other;
    };

    let params = field(reply, "PARAMS:").and_then(first_json_object);
    let reason = field(reply, "REASON:")
        .and_then(|rest| rest.lines().next())
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty());

    AgentReply::ToolCall {
        tool,
        params,
        reason,
    }
}

// Text following a case-insensitive `label`, leading whitespace trimmed.
fn field<'a>(reply: &'a str, label: &str) -> Option<&'a str> {
    let pos = reply.to_ascii_uppercase().find(label)?;
    Some(reply[pos + label.len()..].trim_start())
}

// The first complete JSON object starting at the first '{'. Trailing text
// (REASON lines and the like) is ignored.
fn first_json_object(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
    match stream.next() {
        Some(Ok(value)) if value.is_object() => Some(value),
        _ => None,
    }
}

pub fn system_prompt(registry: &ToolRegistry) -> String {
    format!(
        "You are Lucy, an autonomous AI agent with full access to the computer.\n\n\
         TOOLS:\n{}\n\n\
         RESPONSE FORMAT:\n\
         To use a tool:\n\
         TOOL: <name>\n\
         PARAMS: <JSON parameters>\n\
         REASON: <reason>\n\n\
         When finished:\n\
         DONE: <final answer>\n\n\
         RULES:\n\
         1. Think logically and plan your actions\n\
         2. You may perform several actions\n\
         3. Warn about dangerous operations",
        registry.describe()
    )
}

pub struct AutonomousLoop<'a> {
    pub provider: &'a dyn ChatProvider,
    pub registry: &'a ToolRegistry,
    pub max_iterations: usize,
    /// Limit for each tool call; an expired call is a failed one.
    pub step_timeout: Duration,
}

impl AutonomousLoop<'_> {
    pub async fn run(
        &self,
        request: &str,
        learnings: &mut LearningLog,
        thoughts: &mut ThoughtLog,
    ) -> Result<String, AgentError> {
        info!("Autonomous loop started: {}", request);
        thoughts.add(
            ThoughtKind::Analysis,
            format!("Thinking autonomously about: \"{}\"", request),
            0.9,
        );

        let mut messages = vec![
            ChatMessage::system(system_prompt(self.registry)),
            ChatMessage::user(request),
        ];
        let mut execution_log: Vec<String> = Vec::new();
        let mut final_answer = None;

        for iteration in 0..self.max_iterations {
            debug!("Autonomous iteration {}/{}", iteration + 1, self.max_iterations);

            let reply = self.provider.chat(&messages).await?;
            debug!("Agent reply: {}", reply);

            let feedback = match parse_reply(&reply) {
                AgentReply::Done(answer) => {
                    final_answer = Some(answer);
                    break;
                }
                AgentReply::ToolCall {
                    tool,
                    params: Some(params),
                    reason,
                } => {
                    let reason = reason.unwrap_or_else(|| format!("Running {}", tool));
                    thoughts.add(ThoughtKind::Execution, format!("{}: {}", tool, reason), 0.85);
                    execution_log.push(reason);
                    self.call_tool(&tool, params, &mut execution_log, learnings).await
                }
                AgentReply::ToolCall { tool, params: None, .. } => {
                    format!("Error of {}: PARAMS must be a JSON object. Answer DONE:", tool)
                }
                AgentReply::Other => NUDGE.to_string(),
            };

            messages.push(ChatMessage::assistant(reply));
            messages.push(ChatMessage::user(feedback));
        }

        let log = execution_log.join("\n");
        let result = match final_answer {
            Some(answer) if log.is_empty() => answer,
            Some(answer) => format!("{}\n\n{}", log, answer),
            None => {
                thoughts.add(
                    ThoughtKind::Reflection,
                    format!("Stopped after {} iterations", self.max_iterations),
                    0.4,
                );
                format!(
                    "Not finished within {} iterations.\n\n{}",
                    self.max_iterations, log
                )
            }
        };
        Ok(result)
    }

    async fn call_tool(
        &self,
        tool: &str,
        params: Value,
        execution_log: &mut Vec<String>,
        learnings: &mut LearningLog,
    ) -> String {
        let action = match Action::from_wire(tool, params) {
            Ok(action) => action,
            Err(e) => {
                execution_log.push(format!("[failed] {}", e));
                learnings
                    .record(tool, LearningResult::Failure, &e.to_string())
                    .await;
                return format!("Error of {}: {}\n\nTry another way or answer DONE:", tool, e);
            }
        };

        let result = execute_with_timeout(self.registry, &action, self.step_timeout).await;
        if result.success {
            execution_log.push(format!("[ok] {}", result.output));
            learnings
                .record(tool, LearningResult::Success, &result.output)
                .await;
            format!(
                "Result of {}: {}\n\nWhat next? If finished, answer DONE:",
                tool, result.output
            )
        } else {
            let error = result.error.unwrap_or_else(|| "unknown error".to_string());
            execution_log.push(format!("[failed] {}", error));
            learnings.record(tool, LearningResult::Failure, &error).await;
            format!("Error of {}: {}\n\nTry another way or answer DONE:", tool, error)
        }
    }
}
