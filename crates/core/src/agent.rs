use crate::autonomous::{AutonomousLoop, DEFAULT_MAX_ITERATIONS};
use crate::decision::{Decision, DecisionGate, REJECTION_MESSAGE};
use crate::error::AgentError;
use crate::executor::{PlanExecutor, DEFAULT_STEP_TIMEOUT};
use crate::intent::{Intent, IntentClassifier};
use crate::plan::ActionPlan;
use crate::planner::{app_not_found, Planner};
use lucy_memory::{LearningLog, LearningStats, Thought, ThoughtKind, ThoughtLog};
use lucy_policy::{DecisionPolicy, PersonalityTraits, PersonalityUpdate};
use lucy_providers::ChatProvider;
use lucy_tools::{Action, AppInventory, InstalledApp, ToolRegistry};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub traits: PersonalityTraits,
    pub policy: DecisionPolicy,
    pub step_timeout: Duration,
    pub max_iterations: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            traits: PersonalityTraits::default(),
            policy: DecisionPolicy::default(),
            step_timeout: DEFAULT_STEP_TIMEOUT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// The intent-to-action agent.
///
/// One request at a time: analysis, plan, decision, execution, reflection.
/// Every stage leaves thoughts behind and every executed step a learning.
pub struct LucyAgent {
    classifier: IntentClassifier,
    planner: Planner,
    gate: DecisionGate,
    executor: PlanExecutor,
    registry: Arc<ToolRegistry>,
    inventory: AppInventory,
    learnings: LearningLog,
    thoughts: ThoughtLog,
    provider: Option<Arc<dyn ChatProvider>>,
    traits: PersonalityTraits,
    max_iterations: usize,
    step_timeout: Duration,
}

impl LucyAgent {
    pub fn new(
        registry: Arc<ToolRegistry>,
        inventory: AppInventory,
        learnings: LearningLog,
        provider: Option<Arc<dyn ChatProvider>>,
        config: AgentConfig,
    ) -> Result<Self, AgentError> {
        Ok(Self {
            classifier: IntentClassifier::new()?,
            planner: Planner::new()?,
            gate: DecisionGate::new(config.policy),
            executor: PlanExecutor::new(registry.clone(), config.step_timeout),
            registry,
            inventory,
            learnings,
            thoughts: ThoughtLog::new(),
            provider,
            traits: config.traits.normalized(),
            max_iterations: config.max_iterations,
            step_timeout: config.step_timeout,
        })
    }

    /// Load persisted learnings and scan installed applications.
    pub async fn initialize(&mut self) {
        let loaded = self.learnings.load_at_startup().await;
        self.thoughts.add(
            ThoughtKind::Analysis,
            format!("Loaded {} learnings", loaded),
            0.9,
        );

        match self.inventory.refresh().await {
            Ok(count) => self.thoughts.add(
                ThoughtKind::Analysis,
                format!("Application list updated, {} found", count),
                1.0,
            ),
            Err(e) => self.thoughts.add(
                ThoughtKind::Reflection,
                format!("Failed to update the application list: {}", e),
                0.2,
            ),
        }

        self.thoughts.add(
            ThoughtKind::Analysis,
            "I am Lucy, an autonomous AI agent. Initialization complete.",
            1.0,
        );
        info!("Agent initialized");
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Full pipeline for one utterance. Never fails: errors come back as a
    /// user-facing message.
    pub async fn process_request(&mut self, utterance: &str) -> String {
        match self.run_pipeline(utterance).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Request failed: {}", e);
                self.thoughts
                    .add(ThoughtKind::Reflection, format!("Critical error: {}", e), 0.1);
                self.reflect(false);
                format!(
                    "Error: {}\n\nI have noted this error and will try to avoid it in the future.",
                    e
                )
            }
        }
    }

    async fn run_pipeline(&mut self, utterance: &str) -> Result<String, AgentError> {
        self.thoughts.add(
            ThoughtKind::Analysis,
            format!("Received request: \"{}\"", utterance),
            1.0,
        );
        let intent = self.analyze(utterance);

        let plan = self.create_plan(utterance, intent).await;

        let decision = self
            .gate
            .evaluate(&plan, &self.traits, &self.learnings, &mut self.thoughts)?;
        if let Decision::Rejected(reason) = decision {
            info!("Plan rejected: {:?}", reason);
            self.thoughts.add(
                ThoughtKind::Decision,
                "Plan rejected, asking for confirmation",
                0.5,
            );
            return Ok(REJECTION_MESSAGE.to_string());
        }

        let stop_on_error = self.traits.cautiousness > self.gate.policy().stop_on_error_cautiousness;
        let report = self
            .executor
            .execute(&plan, stop_on_error, &mut self.learnings, &mut self.thoughts)
            .await;

        self.reflect(report.is_success());

        let mut response = report.to_string();
        if self.traits.verbosity > self.gate.policy().verbose_reasoning {
            response.push_str(&format!("\n\nMy reasoning: {}", plan.reasoning));
        }
        Ok(response)
    }

    fn analyze(&mut self, utterance: &str) -> Intent {
        self.thoughts.add(
            ThoughtKind::Analysis,
            format!("Analyzing request: \"{}\"", utterance),
            0.9,
        );
        let intent = self.classifier.classify(utterance);
        self.thoughts
            .add(ThoughtKind::Analysis, format!("Request type: {}", intent), 0.85);
        intent
    }

    async fn create_plan(&mut self, utterance: &str, intent: Intent) -> ActionPlan {
        self.thoughts
            .add(ThoughtKind::Plan, "Creating an action plan...", 0.8);

        if let Some(provider) = self.provider.clone() {
            self.thoughts
                .add(ThoughtKind::Plan, "Using the LLM to build the plan...", 0.9);
            match self
                .planner
                .smart_plan(provider.as_ref(), &self.registry, utterance)
                .await
            {
                Ok(plan) => {
                    let plan = self.resolve_applications(plan).await;
                    self.thoughts.add(
                        ThoughtKind::Plan,
                        format!("Plan created: {} steps", plan.steps.len()),
                        plan.confidence,
                    );
                    return plan;
                }
                Err(e) => {
                    warn!("LLM planning failed: {}", e);
                    self.thoughts.add(
                        ThoughtKind::Reflection,
                        format!("Planning error: {}. Switching to the basic plan.", e),
                        0.3,
                    );
                }
            }
        }

        let app = match intent {
            Intent::OpenApplication => self.find_application(utterance).await,
            _ => None,
        };
        let plan = self.planner.basic_plan(utterance, intent, app.as_ref());
        self.thoughts.add(
            ThoughtKind::Plan,
            format!("Basic plan: {} steps", plan.steps.len()),
            plan.confidence,
        );
        plan
    }

    /// Point every `open_application` step of an LLM plan at an installed
    /// application. Names with no match become a "not found" chat step.
    async fn resolve_applications(&mut self, mut plan: ActionPlan) -> ActionPlan {
        for step in plan.steps.iter_mut() {
            let Action::OpenApplication { app_name } = &step.action else {
                continue;
            };
            let query = app_name.clone();
            match self.lookup_application(&query).await {
                Some(app) => {
                    step.action = Action::OpenApplication { app_name: app.path };
                }
                None => *step = app_not_found(&query),
            }
        }
        plan
    }

    async fn find_application(&mut self, utterance: &str) -> Option<InstalledApp> {
        let query = self.planner.app_query(utterance);
        self.lookup_application(&query).await
    }

    async fn lookup_application(&mut self, query: &str) -> Option<InstalledApp> {
        if self.inventory.apps().await.is_empty() {
            self.thoughts.add(
                ThoughtKind::Analysis,
                "The application list is empty, cannot search",
                0.4,
            );
            return None;
        }

        self.thoughts.add(
            ThoughtKind::Analysis,
            format!("Looking for application: \"{}\"", query),
            0.9,
        );
        if let Some(app) = self.inventory.apps().await.iter().find(|a| a.path == query) {
            return Some(app.clone());
        }
        match self.inventory.find(query).await {
            Some(app) => {
                self.thoughts
                    .add(ThoughtKind::Analysis, format!("Best match: {}", app.name), 0.8);
                Some(app)
            }
            None => {
                self.thoughts.add(
                    ThoughtKind::Analysis,
                    format!("Application \"{}\" not found", query),
                    0.5,
                );
                None
            }
        }
    }

    fn reflect(&mut self, success: bool) {
        self.thoughts
            .add(ThoughtKind::Reflection, "Analyzing the results...", 0.8);
        if success {
            self.thoughts
                .add(ThoughtKind::Reflection, "Task completed successfully", 1.0);
            if self.traits.proactivity > self.gate.policy().proactive_hint {
                self.thoughts
                    .add(ThoughtKind::Reflection, "I can suggest related actions...", 0.7);
            }
        } else {
            self.thoughts
                .add(ThoughtKind::Reflection, "There were problems during execution", 0.4);
            self.thoughts
                .add(ThoughtKind::Reflection, "Remembering the error for the future", 0.9);
        }
    }

    /// Multi-turn tool loop. Requires a configured provider.
    pub async fn autonomous_think(
        &mut self,
        request: &str,
        max_iterations: usize,
    ) -> Result<String, AgentError> {
        let provider = self.provider.clone().ok_or(AgentError::ProviderUnavailable)?;
        let agent_loop = AutonomousLoop {
            provider: provider.as_ref(),
            registry: &self.registry,
            max_iterations,
            step_timeout: self.step_timeout,
        };
        agent_loop
            .run(request, &mut self.learnings, &mut self.thoughts)
            .await
    }

    /// Autonomous loop when an LLM is available, the keyword pipeline
    /// otherwise or when the loop fails.
    pub async fn smart_execute(&mut self, request: &str) -> String {
        if self.provider.is_some() {
            match self.autonomous_think(request, self.max_iterations).await {
                Ok(result) => return result,
                Err(e) => {
                    warn!("Autonomous loop failed, falling back: {}", e);
                    self.thoughts.add(
                        ThoughtKind::Reflection,
                        format!("Autonomous mode failed: {}. Using the basic pipeline.", e),
                        0.3,
                    );
                }
            }
        }
        self.process_request(request).await
    }

    pub fn thoughts(&self) -> Vec<Thought> {
        self.thoughts.all()
    }

    pub fn recent_thoughts(&self, count: usize) -> Vec<Thought> {
        self.thoughts.recent(count)
    }

    pub fn learning_stats(&self) -> LearningStats {
        self.learnings.stats()
    }

    pub fn learnings(&self) -> &LearningLog {
        &self.learnings
    }

    pub async fn clear_memory(&mut self) {
        self.thoughts.clear();
        self.learnings.clear().await;
        self.thoughts
            .add(ThoughtKind::Analysis, "Memory cleared", 1.0);
    }

    pub fn update_personality(&mut self, update: PersonalityUpdate) {
        self.traits.apply(update);
        self.thoughts
            .add(ThoughtKind::Reflection, "Personality traits updated", 0.9);
    }

    pub fn personality(&self) -> PersonalityTraits {
        self.traits
    }
}
