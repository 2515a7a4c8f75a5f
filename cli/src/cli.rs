//! CLI argument parsing with clap derive

use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;
use crate::domain::DeployError;

/// Deploy a containerized application from a git repository to one remote host
#[derive(Parser)]
#[command(
    name = "shipyard",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Never prompt; missing inputs take their default or fail
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sync, verify, prepare the host and deploy
    Deploy(Box<commands::deploy::DeployArgs>),

    /// Print a remote batch without contacting any host
    Script(commands::script::ScriptArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns the `DeployError` that stopped the command.
    pub async fn run(self) -> Result<(), DeployError> {
        let Cli { json, quiet, no_color, yes, command } = self;
        let app = AppContext::new(&AppFlags { no_color, quiet, json, yes });
        match command {
            Command::Deploy(args) => commands::deploy::run(&app, &args).await,
            Command::Script(args) => {
                commands::script::run(&args).inspect_err(|e| app.output.error(&e.to_string()))
            }
            Command::Version => {
                commands::version::run(json);
                Ok(())
            }
        }
    }
}
