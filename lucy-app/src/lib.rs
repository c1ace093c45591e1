pub mod cli;
pub mod config;
pub mod repl;

pub use cli::{parse_args, Command};
pub use config::{AgentSettings, Config, RunMode};
pub use repl::{Repl, ReplOutcome};
