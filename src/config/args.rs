//! Command-line argument parsing

use clap::{Parser, Subcommand};

/// Owner-scoped URL shortener
#[derive(Debug, Parser)]
#[command(name = "shortkeep", version, about)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Configuration helpers
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Print a sample configuration, or write it to a file
    Generate {
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    /// Resolve the command to run, defaulting to `serve`.
    pub fn command(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Serve)
    }
}
