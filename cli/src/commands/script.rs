//! `shipyard script`: print a remote batch without contacting any host.

use clap::{Args, ValueEnum};

use crate::domain::config::{DEFAULT_APP_PORT, DEFAULT_REMOTE_DIR, validate_port, validate_remote_dir};
use crate::domain::deploy::deploy_script;
use crate::domain::provision::provisioning_script;
use crate::domain::{DeployError, RemoteScript};

/// Which remote batch to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScriptKind {
    /// Remote environment preparation (phase 5)
    Provision,
    /// Application deployment (phase 6)
    Deploy,
}

#[derive(Args)]
pub struct ScriptArgs {
    /// Batch to print
    #[arg(value_enum)]
    pub kind: ScriptKind,

    /// Remote username the provisioning batch adds to the docker group
    #[arg(long, env = "SHIPYARD_USER")]
    pub user: Option<String>,

    /// Application port published by the deploy batch
    #[arg(long, default_value = DEFAULT_APP_PORT)]
    pub port: String,

    /// Deployment directory, relative to the remote home
    #[arg(long, default_value = DEFAULT_REMOTE_DIR)]
    pub remote_dir: String,
}

/// Render the requested batch.
///
/// # Errors
///
/// Returns `MissingUsername` when a provisioning batch has no user,
/// `InvalidPort` for a malformed port, or `Internal` for an invalid remote
/// directory.
pub fn render(args: &ScriptArgs) -> Result<RemoteScript, DeployError> {
    Ok(match args.kind {
        ScriptKind::Provision => {
            let user = args
                .user
                .as_deref()
                .filter(|u| !u.trim().is_empty())
                .ok_or(DeployError::MissingUsername)?;
            provisioning_script(user.trim())
        }
        ScriptKind::Deploy => {
            validate_remote_dir(&args.remote_dir)?;
            deploy_script(&args.remote_dir, validate_port(&args.port)?)
        }
    })
}

/// Run the script command.
///
/// # Errors
///
/// See [`render`].
pub fn run(args: &ScriptArgs) -> Result<(), DeployError> {
    print!("{}", render(args)?.render());
    Ok(())
}
