//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Wayfinder - conversational trip-planning assistant
#[derive(Parser)]
#[command(name = "wf", about = "Conversational trip-planning assistant", version)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive chat session (default)
    Chat,

    /// Run a single message through a fresh session and print the reply
    Ask {
        /// The message to send
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ask_subcommand() {
        let cli = Cli::parse_from(["wf", "ask", "find restaurants near Paris"]);
        match cli.command {
            Some(Command::Ask { message }) => assert_eq!(message, "find restaurants near Paris"),
            other => panic!("expected Ask, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_to_no_subcommand() {
        let cli = Cli::parse_from(["wf"]);
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["wf", "-l", "DEBUG", "--config", "custom.yml", "chat"]);
        assert_eq!(cli.log_level.as_deref(), Some("DEBUG"));
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("custom.yml")));
    }
}
