use anyhow::{Context, Result};
use lucy_app::{parse_args, Command, Config, Repl};
use lucy_core::{AgentConfig, LucyAgent};
use lucy_executor::{CommandExecutor, LocalBackend};
use lucy_memory::{JsonFileStore, LearningLog};
use lucy_policy::AgentProfile;
use lucy_providers::build_provider;
use lucy_tools::{AppInventory, Backend, ToolRegistry};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = match parse_args(&args)? {
        Command::ResetConfig { path } => {
            Config::default().save(&path)?;
            println!("✅ Default configuration written to {}", path.display());
            return Ok(());
        }
        Command::Run { config } => config,
    };

    let mut config = Config::load_or_default(&config_path)?;
    config.apply_env();
    config.validate()?;

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║                        Lucy Terminal Agent                       ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let profile = match &config.agent.profile {
        Some(path) => AgentProfile::load(path)
            .await
            .with_context(|| format!("Failed to load profile {}", path.display()))?,
        None => AgentProfile::default(),
    };

    let store = JsonFileStore::new(&config.agent.data_dir);
    store
        .initialize()
        .await
        .context("Failed to initialize the data directory")?;
    let learnings = LearningLog::new(Arc::new(store));

    let provider = build_provider(&config.llm).context("Failed to configure the LLM provider")?;
    let provider = match provider {
        Some(provider) => match provider.health_check().await {
            Ok(()) => {
                println!("✅ LLM connected: {}", provider.name());
                Some(provider)
            }
            Err(e) => {
                tracing::warn!("LLM health check failed: {}", e);
                println!("⚠️  LLM not reachable, using keyword planning");
                None
            }
        },
        None => {
            println!("ℹ️  LLM disabled, using keyword planning");
            None
        }
    };

    let local = LocalBackend::new()
        .context("Failed to create the local backend")?
        .with_command_executor(CommandExecutor::new(config.agent.step_timeout()));
    let backend: Arc<dyn Backend> = Arc::new(local);
    let registry = Arc::new(ToolRegistry::with_default_tools(
        backend.clone(),
        provider.clone(),
    ));
    let inventory = AppInventory::new(backend);

    let agent_config = AgentConfig {
        traits: profile.traits,
        policy: profile.policy,
        step_timeout: config.agent.step_timeout(),
        max_iterations: config.agent.max_iterations,
    };
    let mut agent = LucyAgent::new(registry, inventory, learnings, provider, agent_config)
        .context("Failed to create the agent")?;
    agent.initialize().await;
    tracing::info!("Agent '{}' ready in {:?} mode", profile.id, config.agent.mode);

    let mut repl = Repl::new(agent, config.agent.mode, config.agent.max_iterations);
    repl.run().await?;
    Ok(())
}
