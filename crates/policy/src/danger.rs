use serde::{Deserialize, Serialize};

/// Thresholds consulted by the decision gate and the plan executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionPolicy {
    /// A dangerous plan is rejected when cautiousness is above this.
    pub danger_cautiousness: f32,
    /// Plans below this confidence are rejected.
    pub min_confidence: f32,
    /// Execution stops at the first failed step when cautiousness is above this.
    pub stop_on_error_cautiousness: f32,
    /// The plan reasoning is appended to replies when verbosity is above this.
    pub verbose_reasoning: f32,
    /// A follow-up hint is logged when proactivity is above this.
    pub proactive_hint: f32,
    pub dangerous_keywords: Vec<String>,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            danger_cautiousness: 0.8,
            min_confidence: 0.5,
            stop_on_error_cautiousness: 0.7,
            verbose_reasoning: 0.7,
            proactive_hint: 0.7,
            dangerous_keywords: default_dangerous_keywords(),
        }
    }
}

fn default_dangerous_keywords() -> Vec<String> {
    vec![
        "shutdown".to_string(),
        "restart".to_string(),
        "delete".to_string(),
        "format".to_string(),
        "rm -rf".to_string(),
    ]
}

impl DecisionPolicy {
    pub fn scanner(&self) -> DangerScanner {
        DangerScanner::new(self.dangerous_keywords.clone())
    }
}

/// Case-insensitive substring scan over serialized plan text.
#[derive(Debug, Clone)]
pub struct DangerScanner {
    keywords: Vec<String>,
}

impl DangerScanner {
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// First keyword found in `text`, if any.
    pub fn find(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .find(|keyword| lower.contains(keyword.as_str()))
            .map(|k| k.as_str())
    }

    pub fn is_dangerous(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    pub fn add_keyword(&mut self, keyword: &str) {
        self.keywords.push(keyword.to_lowercase());
    }
}

impl Default for DangerScanner {
    fn default() -> Self {
        Self::new(default_dangerous_keywords())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dangerous_keyword_detected() {
        let scanner = DangerScanner::default();
        assert_eq!(
            scanner.find(r#"{"action":"execute_command","params":{"command":"SHUTDOWN"}}"#),
            Some("shutdown")
        );
        assert!(scanner.is_dangerous("rm -rf /tmp/x"));
    }

    #[test]
    fn test_safe_text() {
        let scanner = DangerScanner::default();
        assert!(!scanner.is_dangerous(r#"{"action":"get_processes","params":{}}"#));
    }

    #[test]
    fn test_custom_keyword() {
        let mut scanner = DangerScanner::default();
        assert!(!scanner.is_dangerous("выключи компьютер"));
        scanner.add_keyword("Выключи");
        assert!(scanner.is_dangerous("выключи компьютер"));
    }

    #[test]
    fn test_default_thresholds() {
        let policy = DecisionPolicy::default();
        assert_eq!(policy.danger_cautiousness, 0.8);
        assert_eq!(policy.min_confidence, 0.5);
        assert_eq!(policy.stop_on_error_cautiousness, 0.7);
        assert_eq!(policy.dangerous_keywords.len(), 5);
    }
}
