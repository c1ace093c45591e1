//! Interactive terminal session over a `LucyAgent`.

use crate::config::RunMode;
use lucy_core::LucyAgent;
use lucy_policy::PersonalityUpdate;
use std::io::{self, Write};

const RECENT_THOUGHTS: usize = 10;
const RECENT_LEARNINGS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplOutcome {
    Exit,
    Reply(String),
    Skip,
}

pub struct Repl {
    agent: LucyAgent,
    mode: RunMode,
    max_iterations: usize,
}

impl Repl {
    pub fn new(agent: LucyAgent, mode: RunMode, max_iterations: usize) -> Self {
        Self {
            agent,
            mode,
            max_iterations,
        }
    }

    pub fn agent(&self) -> &LucyAgent {
        &self.agent
    }

    pub async fn run(&mut self) -> io::Result<()> {
        println!("╔══════════════════════════════════════════════════════════════════╗");
        println!("║                        Lucy Agent REPL                           ║");
        println!("║  Commands: exit, help, status, thoughts, stats, clear, /think    ║");
        println!("╚══════════════════════════════════════════════════════════════════╝");
        println!();

        loop {
            print!("lucy> ");
            io::stdout().flush()?;

            let mut input = String::new();
            if io::stdin().read_line(&mut input)? == 0 {
                println!();
                break;
            }

            match self.handle(&input).await {
                ReplOutcome::Exit => {
                    println!("👋 Goodbye!");
                    break;
                }
                ReplOutcome::Reply(text) => println!("\n{}\n", text),
                ReplOutcome::Skip => {}
            }
        }
        Ok(())
    }

    /// One line of user input.
    pub async fn handle(&mut self, input: &str) -> ReplOutcome {
        let input = input.trim();
        if input.is_empty() {
            return ReplOutcome::Skip;
        }

        match input {
            "exit" | "quit" => ReplOutcome::Exit,
            "help" => ReplOutcome::Reply(help_text()),
            "status" => ReplOutcome::Reply(self.status()),
            "thoughts" => ReplOutcome::Reply(self.thoughts()),
            "stats" => ReplOutcome::Reply(format!("📊 Learnings: {}", self.agent.learning_stats())),
            "learnings" => ReplOutcome::Reply(self.learnings()),
            "clear" => {
                self.agent.clear_memory().await;
                ReplOutcome::Reply("🧹 Memory cleared".to_string())
            }
            _ => {
                if let Some(request) = input.strip_prefix("/think") {
                    return ReplOutcome::Reply(self.think(request.trim()).await);
                }
                if let Some(args) = input.strip_prefix("/set") {
                    return ReplOutcome::Reply(self.set_trait(args.trim()));
                }
                let reply = match self.mode {
                    RunMode::Pipeline => self.agent.process_request(input).await,
                    RunMode::Autonomous => self.agent.smart_execute(input).await,
                };
                ReplOutcome::Reply(reply)
            }
        }
    }

    async fn think(&mut self, request: &str) -> String {
        if request.is_empty() {
            return "Usage: /think <request>".to_string();
        }
        match self.agent.autonomous_think(request, self.max_iterations).await {
            Ok(result) => result,
            Err(e) => format!("❌ Autonomous mode unavailable: {}", e),
        }
    }

    fn set_trait(&mut self, args: &str) -> String {
        let mut parts = args.split_whitespace();
        let (Some(name), Some(value)) = (parts.next(), parts.next()) else {
            return "Usage: /set <cautiousness|creativity|verbosity|proactivity> <0..1>".to_string();
        };
        let Ok(value) = value.parse::<f32>() else {
            return format!("Not a number: {}", value);
        };

        let mut update = PersonalityUpdate::default();
        match name {
            "cautiousness" => update.cautiousness = Some(value),
            "creativity" => update.creativity = Some(value),
            "verbosity" => update.verbosity = Some(value),
            "proactivity" => update.proactivity = Some(value),
            other => return format!("Unknown trait: {}", other),
        }
        self.agent.update_personality(update);
        format!("✅ {} set", name)
    }

    fn status(&self) -> String {
        let traits = self.agent.personality();
        format!(
            "📊 Agent Status:\n  Mode: {:?}\n  LLM: {}\n  Learnings: {}\n  Personality: cautiousness {:.2}, creativity {:.2}, verbosity {:.2}, proactivity {:.2}",
            self.mode,
            if self.agent.has_provider() {
                "connected"
            } else {
                "not available, keyword planning only"
            },
            self.agent.learning_stats(),
            traits.cautiousness,
            traits.creativity,
            traits.verbosity,
            traits.proactivity
        )
    }

    fn learnings(&self) -> String {
        let entries: Vec<_> = self.agent.learnings().entries().collect();
        if entries.is_empty() {
            return "Nothing learned yet".to_string();
        }
        let lines: Vec<String> = entries
            .iter()
            .skip(entries.len().saturating_sub(RECENT_LEARNINGS))
            .map(|l| {
                let mark = if l.is_failure() { "❌" } else { "✅" };
                format!("  {} {}: {}", mark, l.action, l.feedback)
            })
            .collect();
        format!("📚 Recent learnings:\n{}", lines.join("\n"))
    }

    fn thoughts(&self) -> String {
        let recent = self.agent.recent_thoughts(RECENT_THOUGHTS);
        if recent.is_empty() {
            return "No thoughts yet".to_string();
        }
        let lines: Vec<String> = recent.iter().map(|t| format!("  {}", t)).collect();
        format!("💭 Recent thoughts:\n{}", lines.join("\n"))
    }
}

fn help_text() -> String {
    [
        "📖 Available Commands:",
        "  exit, quit      - Exit the agent",
        "  help            - Show this help message",
        "  status          - Show mode, LLM and personality",
        "  thoughts        - Show recent thoughts",
        "  stats           - Show learning statistics",
        "  learnings       - Show recent learnings",
        "  clear           - Forget thoughts and learnings",
        "  /think <text>   - Run the autonomous tool loop",
        "  /set <trait> <v> - Adjust a personality trait",
        "",
        "💡 Anything else is handled as a request",
    ]
    .join("\n")
}
