pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "mindsync")]
#[command(about = "Mirror a Minds user's activity feed into a text file", long_about = None)]
pub struct Cli {
    /// Re-fetch items that are already complete
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Guid of the user to mirror
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Mirror file to read and rewrite
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Number of concurrent detail fetches
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    /// Configuration file (default: ~/.config/mindsync/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Fetch new minds and update the mirror file (default)
    Sync,
    /// List mirrored minds
    List,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Sync)
    }

    /// Applies command-line overrides on top of the loaded configuration.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(user) = &self.user {
            config.sync.user_id = user.clone();
        }
        if let Some(output) = &self.output {
            config.sync.output = output.clone();
        }
        if let Some(workers) = self.workers {
            config.sync.workers = Some(workers);
        }
        config
    }
}
