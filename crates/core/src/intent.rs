//! Keyword intent classification.
//!
//! An ordered table of trigger patterns; the first rule that matches wins
//! and no match means [`Intent::GeneralTask`]. Triggers are anchored on a
//! word start only, so inflected forms ("откройте", "running") still hit.

use crate::error::AgentError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    OpenApplication,
    CreateFile,
    GetInformation,
    ExecuteCommand,
    Search,
    Help,
    GeneralTask,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::OpenApplication => "open_application",
            Intent::CreateFile => "create_file",
            Intent::GetInformation => "get_information",
            Intent::ExecuteCommand => "execute_command",
            Intent::Search => "search",
            Intent::Help => "help",
            Intent::GeneralTask => "general_task",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const RULES: &[(Intent, &[&str])] = &[
    (Intent::OpenApplication, &["открой", "запусти", "open", "launch"]),
    (Intent::CreateFile, &["создай", "создать", "напиши", "create", "write"]),
    (Intent::GetInformation, &["покажи", "список", "show", "list"]),
    (
        Intent::ExecuteCommand,
        &[
            "выполни",
            "сделай",
            "выключи",
            "перезагрузи",
            "execute",
            "run",
            "shutdown",
            "restart",
        ],
    ),
    (Intent::Search, &["найди", "ищи", "find", "search"]),
    (Intent::Help, &["помоги", "как", "help", "how"]),
];

pub struct IntentClassifier {
    rules: Vec<(Intent, Regex)>,
}

impl IntentClassifier {
    pub fn new() -> Result<Self, AgentError> {
        let rules = RULES
            .iter()
            .map(|(intent, triggers)| {
                let pattern = format!(r"(?i)\b(?:{})", triggers.join("|"));
                Ok((*intent, Regex::new(&pattern)?))
            })
            .collect::<Result<Vec<_>, AgentError>>()?;
        Ok(Self { rules })
    }

    pub fn classify(&self, text: &str) -> Intent {
        self.rules
            .iter()
            .find(|(_, pattern)| pattern.is_match(text))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::GeneralTask)
    }
}
