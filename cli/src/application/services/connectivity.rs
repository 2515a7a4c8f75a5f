//! Phase 4: remote connectivity check.

use crate::application::ports::{RemoteShell, RunLog};
use crate::application::services::failure_detail;
use crate::domain::DeployError;

/// Text echoed back by the acknowledgement command.
pub const ACK: &str = "shipyard-ack";

/// Open a non-interactive session and run a trivial command, then probe
/// (non-fatally) for an existing container runtime.
///
/// Returns whether `docker` was already present on the remote host.
///
/// # Errors
///
/// Returns `RemoteUnreachable` if the session cannot be established or the
/// acknowledgement command exits non-zero.
pub async fn check_connectivity(
    shell: &impl RemoteShell,
    log: &impl RunLog,
) -> Result<bool, DeployError> {
    let target = shell.target();
    log.info(&format!("Connecting to {target}"));

    let detail = match shell.exec(&format!("echo {ACK}")).await {
        Ok(out) if out.status.success() => None,
        Ok(out) => Some(failure_detail(&out)),
        Err(e) => Some(format!("{e:#}")),
    };
    if let Some(detail) = detail {
        return Err(DeployError::RemoteUnreachable { target, detail });
    }
    log.info(&format!("Connected to {target}"));

    let present = match shell.exec("command -v docker").await {
        Ok(out) => out.status.success(),
        Err(e) => {
            log.warn(&format!("Could not check for Docker: {e:#}"));
            false
        }
    };
    if present {
        log.info("Docker is already installed on the remote host");
    } else {
        log.info("Docker is not installed on the remote host yet");
    }
    Ok(present)
}
