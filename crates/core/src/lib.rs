//! Intent-to-action planning and execution for the Lucy agent.

pub mod agent;
pub mod autonomous;
pub mod decision;
pub mod error;
pub mod executor;
pub mod intent;
pub mod plan;
pub mod planner;

pub use agent::{AgentConfig, LucyAgent};
pub use autonomous::{parse_reply, AgentReply, AutonomousLoop, DEFAULT_MAX_ITERATIONS};
pub use decision::{Decision, DecisionGate, RejectReason, REJECTION_MESSAGE};
pub use error::{AgentError, PlanParseError};
pub use executor::{ExecutionReport, PlanExecutor, DEFAULT_STEP_TIMEOUT};
pub use intent::{Intent, IntentClassifier};
pub use plan::{parse_plan, ActionPlan, PlanStep};
pub use planner::Planner;
