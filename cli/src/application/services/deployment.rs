//! Phase 6: application transfer, start, and verification.

use std::path::Path;
use std::time::Duration;

use crate::application::ports::{FileTransfer, HttpProbe, RemoteShell, RunLog};
use crate::application::services::{failure_detail, log_remote_markers};
use crate::domain::deploy::{EXIT_MISSING_REMOTE_DIR, EXIT_NOTHING_TO_DEPLOY, deploy_script};
use crate::domain::{DeployError, DeploymentConfig, Reachability};

/// Timeout for the post-deploy HTTP probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Copy the project to the remote host and build/start it there.
///
/// # Errors
///
/// Returns `TransferFailed` if the copy fails, `NothingToDeploy` if the
/// remote tree has no build descriptor, or `RemoteDeployFailed` for any other
/// remote failure.
pub async fn deploy_application(
    remote: &(impl RemoteShell + FileTransfer),
    config: &DeploymentConfig,
    project: &Path,
    log: &impl RunLog,
) -> Result<(), DeployError> {
    let target = remote.target();
    log.info(&format!(
        "Transferring {} to {target}:~/{}",
        project.display(),
        config.remote_dir
    ));
    let detail = match remote.transfer_dir(project, &config.remote_dir).await {
        Ok(out) if out.status.success() => None,
        Ok(out) => Some(failure_detail(&out)),
        Err(e) => Some(format!("{e:#}")),
    };
    if let Some(detail) = detail {
        return Err(DeployError::TransferFailed { target, detail });
    }
    log.info("Transfer complete");

    let script = deploy_script(&config.remote_dir, config.app_port);
    let out = remote
        .exec_script(&script.render())
        .await
        .map_err(|e| DeployError::RemoteDeployFailed(format!("{e:#}")))?;
    log_remote_markers(log, &out, Some("Running containers"));

    match out.status.code() {
        Some(0) => Ok(()),
        Some(EXIT_NOTHING_TO_DEPLOY) => Err(DeployError::NothingToDeploy(config.remote_dir.clone())),
        Some(EXIT_MISSING_REMOTE_DIR) => Err(DeployError::RemoteDeployFailed(format!(
            "deployment directory ~/{} is missing",
            config.remote_dir
        ))),
        _ => Err(DeployError::RemoteDeployFailed(failure_detail(&out))),
    }
}

/// Probe `url` from the operator's machine. Never fails the run.
pub async fn probe_reachability(
    http: &impl HttpProbe,
    url: &str,
    timeout: Duration,
    log: &impl RunLog,
) -> Reachability {
    log.info(&format!("Probing {url}"));
    let reachability = match http.get_status(url, timeout).await {
        Ok(code) if code < 400 => Reachability::Accessible { url: url.to_string() },
        Ok(code) => Reachability::NotAccessible {
            url: url.to_string(),
            reason: format!("HTTP {code}"),
        },
        Err(e) => Reachability::NotAccessible {
            url: url.to_string(),
            reason: format!("{e:#}"),
        },
    };
    if reachability.is_accessible() {
        log.success(&reachability.to_string());
    } else {
        log.warn(&reachability.to_string());
    }
    reachability
}
