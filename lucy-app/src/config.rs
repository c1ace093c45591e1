use anyhow::{bail, Context, Result};
use lucy_providers::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const API_KEY_ENV: &str = "LUCY_API_KEY";
pub const MODEL_ENV: &str = "LUCY_LLM_MODEL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: ProviderConfig,
    #[serde(default)]
    pub agent: AgentSettings,
}

/// How free-form input is handled by the REPL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Keyword pipeline: analyze, plan, decide, execute, reflect.
    #[default]
    Pipeline,
    /// LLM tool loop, falling back to the pipeline.
    Autonomous,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<PathBuf>,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_step_timeout_secs")]
    pub step_timeout_secs: u64,
    #[serde(default)]
    pub mode: RunMode,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_max_iterations() -> usize {
    lucy_core::DEFAULT_MAX_ITERATIONS
}

fn default_step_timeout_secs() -> u64 {
    lucy_core::DEFAULT_STEP_TIMEOUT.as_secs()
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            profile: None,
            max_iterations: default_max_iterations(),
            step_timeout_secs: default_step_timeout_secs(),
            mode: RunMode::default(),
        }
    }
}

impl AgentSettings {
    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.step_timeout_secs)
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Defaults when `path` does not exist, otherwise the parsed file.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write {}", path.as_ref().display()))?;
        Ok(())
    }

    /// `LUCY_API_KEY` and `LUCY_LLM_MODEL` win over the file.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(MODEL_ENV).ok(),
        );
    }

    pub fn apply_overrides(&mut self, api_key: Option<String>, model: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            self.llm.model = Some(model);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.agent.max_iterations == 0 {
            bail!("agent.max_iterations must be at least 1");
        }
        if self.agent.step_timeout_secs == 0 {
            bail!("agent.step_timeout_secs must be at least 1");
        }
        self.llm.validate().context("Invalid [llm] section")?;
        Ok(())
    }
}
