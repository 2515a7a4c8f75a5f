//! Phase 5: remote environment preparation.

use crate::application::ports::{RemoteShell, RunLog};
use crate::application::services::{failure_detail, log_remote_markers};
use crate::domain::DeployError;
use crate::domain::provision::provisioning_script;

/// Run the idempotent provisioning batch as one remote session.
///
/// Only the batch's overall exit status is inspected; the failing step is
/// visible in the run log through the step markers.
///
/// # Errors
///
/// Returns `ProvisioningFailed` if the batch cannot be sent or exits non-zero.
pub async fn prepare_environment(
    shell: &impl RemoteShell,
    user: &str,
    log: &impl RunLog,
) -> Result<(), DeployError> {
    let script = provisioning_script(user);
    log.info(&format!(
        "Running provisioning batch ({} steps) on {}",
        script.steps().count(),
        shell.target()
    ));

    let out = shell
        .exec_script(&script.render())
        .await
        .map_err(|e| DeployError::ProvisioningFailed(format!("{e:#}")))?;
    log_remote_markers(log, &out, Some("Installed versions"));
    if !out.status.success() {
        return Err(DeployError::ProvisioningFailed(failure_detail(&out)));
    }
    Ok(())
}
