use anyhow::{bail, Result};
use std::path::PathBuf;

pub const DEFAULT_CONFIG: &str = "config.toml";

const USAGE: &str = "Usage: lucy [CONFIG_PATH] | lucy config reset [CONFIG_PATH]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the REPL with the config at `config`.
    Run { config: PathBuf },
    /// Write the default config to `path`.
    ResetConfig { path: PathBuf },
}

/// Parse the arguments after the program name.
pub fn parse_args(args: &[String]) -> Result<Command> {
    let path_or_default =
        |arg: Option<&String>| arg.map(PathBuf::from).unwrap_or_else(|| DEFAULT_CONFIG.into());

    match args {
        [] => Ok(Command::Run {
            config: DEFAULT_CONFIG.into(),
        }),
        [first, rest @ ..] if first == "config" => match rest {
            [sub, tail @ ..] if sub == "reset" && tail.len() <= 1 => Ok(Command::ResetConfig {
                path: path_or_default(tail.first()),
            }),
            [sub, ..] if sub != "reset" => bail!("Unknown config subcommand '{}'. {}", sub, USAGE),
            _ => bail!(USAGE),
        },
        [path] => Ok(Command::Run {
            config: PathBuf::from(path),
        }),
        _ => bail!(USAGE),
    }
}
