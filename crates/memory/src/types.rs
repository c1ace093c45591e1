use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LearningResult {
    Success,
    Failure,
}

/// Outcome of one executed action.
///
/// Stored lists written by older builds carry a `situation` field that
/// always duplicated `action`; it is ignored on load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Learning {
    pub action: String,
    pub result: LearningResult,
    pub feedback: String,
    /// Unix milliseconds.
    pub timestamp: i64,
}

impl Learning {
    pub fn new(action: &str, result: LearningResult, feedback: &str) -> Self {
        Self {
            action: action.to_string(),
            result,
            feedback: feedback.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.result == LearningResult::Failure
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LearningStats {
    pub total: usize,
    pub successes: usize,
    pub failures: usize,
    /// Percentage in `0.0..=100.0`, zero for an empty log.
    pub success_rate: f64,
}

impl fmt::Display for LearningStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} actions, {} succeeded, {} failed ({:.1}%)",
            self.total, self.successes, self.failures, self.success_rate
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThoughtKind {
    Analysis,
    Plan,
    Decision,
    Execution,
    Reflection,
}

impl ThoughtKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThoughtKind::Analysis => "analysis",
            ThoughtKind::Plan => "plan",
            ThoughtKind::Decision => "decision",
            ThoughtKind::Execution => "execution",
            ThoughtKind::Reflection => "reflection",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Thought {
    pub kind: ThoughtKind,
    pub content: String,
    pub timestamp: i64,
    pub confidence: f32,
}

impl fmt::Display for Thought {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({:.0}%)",
            self.kind.as_str().to_uppercase(),
            self.content,
            self.confidence * 100.0
        )
    }
}
