// Command-line argument model.
//
// The config flags are global so `--token`, `--workspace` and `--api` can
// be given to any subcommand; they become the highest-precedence layer of
// the effective configuration.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ConfigFlags;

#[derive(Parser, Debug)]
#[command(
    name = "exercism",
    version,
    about = "Command-line client for Exercism",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Emit debug logs on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags that override the persisted user config.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// API token from your settings page
    #[arg(long, short = 't', global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Directory holding your downloaded exercises
    #[arg(long, short = 'w', global = true, value_name = "DIR")]
    pub workspace: Option<String>,

    /// API base URL
    #[arg(long, short = 'a', global = true, value_name = "URL")]
    pub api: Option<String>,
}

impl ConfigArgs {
    pub fn flags(&self) -> ConfigFlags {
        ConfigFlags {
            token: self.token.clone(),
            workspace: self.workspace.clone(),
            api: self.api.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit your solution to an exercise
    #[command(visible_alias = "s")]
    Submit(SubmitArgs),
    /// Write the configuration flags to your user config
    Configure(ConfigureArgs),
}

/// Call the command with the list of files you want to submit.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConfigureArgs {
    /// Print the current configuration without changing it
    #[arg(long)]
    pub show: bool,
}
