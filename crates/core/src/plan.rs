use crate::error::PlanParseError;
use lucy_tools::Action;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct PlanStep {
    pub action: Action,
    pub reason: String,
    pub expected_outcome: String,
}

impl PlanStep {
    pub fn new(action: Action, reason: impl Into<String>, expected_outcome: impl Into<String>) -> Self {
        Self {
            action,
            reason: reason.into(),
            expected_outcome: expected_outcome.into(),
        }
    }

    pub fn to_wire(&self) -> Value {
        json!({
            "action": self.action.name(),
            "params": self.action.params(),
            "reason": self.reason,
            "expectedOutcome": self.expected_outcome,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionPlan {
    pub steps: Vec<PlanStep>,
    pub reasoning: String,
    pub confidence: f32,
}

impl ActionPlan {
    pub fn new(reasoning: impl Into<String>, confidence: f32) -> Self {
        Self {
            steps: Vec::new(),
            reasoning: reasoning.into(),
            confidence,
        }
    }

    pub fn with_step(mut self, step: PlanStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn first_action(&self) -> Option<&Action> {
        self.steps.first().map(|step| &step.action)
    }

    /// Steps in wire form; this is the text the danger scan runs over.
    pub fn steps_json(&self) -> Result<String, serde_json::Error> {
        let steps: Vec<Value> = self.steps.iter().map(PlanStep::to_wire).collect();
        serde_json::to_string(&steps)
    }

    pub fn to_wire(&self) -> Value {
        json!({
            "reasoning": self.reasoning,
            "confidence": self.confidence,
            "steps": self.steps.iter().map(PlanStep::to_wire).collect::<Vec<_>>(),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePlan {
    reasoning: String,
    confidence: f32,
    steps: Vec<WireStep>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireStep {
    action: String,
    params: Value,
    #[serde(default)]
    reason: String,
    #[serde(default)]
    expected_outcome: String,
}

/// Drop Markdown code-fence markers models like to wrap JSON in.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Strictly parse an LLM plan.
pub fn parse_plan(raw: &str) -> Result<ActionPlan, PlanParseError> {
    let wire: WirePlan = serde_json::from_str(strip_code_fences(raw))?;
    if !(0.0..=1.0).contains(&wire.confidence) {
        return Err(PlanParseError::ConfidenceOutOfRange(wire.confidence));
    }

    let steps = wire
        .steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| {
            let action = Action::from_wire(&step.action, step.params)
                .map_err(|source| PlanParseError::InvalidStep { index, source })?;
            Ok(PlanStep {
                action,
                reason: step.reason,
                expected_outcome: step.expected_outcome,
            })
        })
        .collect::<Result<Vec<_>, PlanParseError>>()?;

    Ok(ActionPlan {
        steps,
        reasoning: wire.reasoning,
        confidence: wire.confidence,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    const PLAN: &str = r#"{
        "reasoning": "Open the player first",
        "confidence": 0.95,
        "steps": [
            {
                "action": "open_application",
                "params": {"appName": "Spotify"},
                "reason": "Open Spotify",
                "expectedOutcome": "Spotify starts"
            }
        ]
    }"#;

    #[test]
    fn test_parse_valid_plan() {
        let plan = parse_plan(PLAN).unwrap();
        assert_eq!(plan.confidence, 0.95);
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(
            plan.steps[0].action,
            Action::OpenApplication {
                app_name: "Spotify".to_string()
            }
        );
        assert_eq!(plan.steps[0].expected_outcome, "Spotify starts");
    }

    #[test]
    fn test_code_fences_stripped() {
        let fenced = format!("```json\n{}\n```", PLAN);
        assert!(parse_plan(&fenced).is_ok());
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            parse_plan("Sure! Here is your plan: open it"),
            Err(PlanParseError::Json(_))
        ));
    }

    #[test]
    fn test_missing_fields_rejected() {
        let no_steps = r#"{"reasoning": "x", "confidence": 0.9}"#;
        assert!(parse_plan(no_steps).is_err());
        let no_params = r#"{"reasoning": "x", "confidence": 0.9, "steps": [{"action": "chat"}]}"#;
        assert!(parse_plan(no_params).is_err());
    }

    #[test]
    fn test_confidence_range_checked() {
        let plan = r#"{"reasoning": "x", "confidence": 1.5, "steps": []}"#;
        assert!(matches!(
            parse_plan(plan),
            Err(PlanParseError::ConfidenceOutOfRange(_))
        ));
    }

    #[test]
    fn test_ill_typed_params_rejected() {
        let plan = r#"{"reasoning": "x", "confidence": 0.9,
            "steps": [{"action": "create_file", "params": {"path": 42}}]}"#;
        assert!(matches!(
            parse_plan(plan),
            Err(PlanParseError::InvalidStep { index: 0, .. })
        ));
    }

    #[test]
    fn test_unknown_action_kept() {
        let plan = r#"{"reasoning": "x", "confidence": 0.9,
            "steps": [{"action": "media_control", "params": {"action": "play"}}]}"#;
        let plan = parse_plan(plan).unwrap();
        assert_eq!(plan.steps[0].action.name(), "media_control");
    }

    #[test]
    fn test_steps_json_uses_wire_names() {
        let plan = parse_plan(PLAN).unwrap();
        let json = plan.steps_json().unwrap();
        assert!(json.contains("\"appName\":\"Spotify\""));
        assert!(json.contains("expectedOutcome"));
    }
}
