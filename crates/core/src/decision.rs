use crate::plan::ActionPlan;
use lucy_memory::{LearningLog, ThoughtKind, ThoughtLog};
use lucy_policy::{DangerScanner, DecisionPolicy, PersonalityTraits};

pub const REJECTION_MESSAGE: &str =
    "I'm not sure this action is safe. Please confirm it explicitly.";

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Approved,
    Rejected(RejectReason),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    EmptyPlan,
    Dangerous(String),
    LowConfidence(f32),
}

impl Decision {
    pub fn is_approved(&self) -> bool {
        matches!(self, Decision::Approved)
    }
}

/// Approves or rejects a plan before anything runs.
pub struct DecisionGate {
    policy: DecisionPolicy,
    scanner: DangerScanner,
}

impl DecisionGate {
    pub fn new(policy: DecisionPolicy) -> Self {
        let scanner = policy.scanner();
        Self { policy, scanner }
    }

    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    pub fn evaluate(
        &self,
        plan: &ActionPlan,
        traits: &PersonalityTraits,
        learnings: &LearningLog,
        thoughts: &mut ThoughtLog,
    ) -> Result<Decision, serde_json::Error> {
        thoughts.add(ThoughtKind::Decision, "Evaluating the plan...", 0.8);

        if plan.is_empty() {
            thoughts.add(ThoughtKind::Decision, "The plan has no steps", 0.9);
            return Ok(Decision::Rejected(RejectReason::EmptyPlan));
        }

        let serialized = plan.steps_json()?;
        if let Some(keyword) = self.scanner.find(&serialized) {
            thoughts.add(
                ThoughtKind::Decision,
                format!("The plan may be dangerous ({}), caution required", keyword),
                0.5,
            );
            if traits.cautiousness > self.policy.danger_cautiousness {
                thoughts.add(
                    ThoughtKind::Decision,
                    "Rejecting the plan because of high cautiousness",
                    0.9,
                );
                return Ok(Decision::Rejected(RejectReason::Dangerous(keyword.to_string())));
            }
        }

        if plan.confidence < self.policy.min_confidence {
            thoughts.add(
                ThoughtKind::Decision,
                "Low confidence in the plan, better to ask the user",
                0.7,
            );
            return Ok(Decision::Rejected(RejectReason::LowConfidence(plan.confidence)));
        }

        if let Some(action) = plan.first_action() {
            let failed_before = learnings
                .latest_for(action.name())
                .is_some_and(|learning| learning.is_failure());
            if failed_before {
                thoughts.add(
                    ThoughtKind::Decision,
                    format!("{} failed last time, proceeding carefully", action.name()),
                    0.6,
                );
            }
        }

        thoughts.add(ThoughtKind::Decision, "Plan approved for execution", 0.9);
        Ok(Decision::Approved)
    }
}
