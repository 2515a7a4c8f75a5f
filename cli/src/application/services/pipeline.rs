//! The deployment run: phases 2–6 in order, plus the finalizer.
//!
//! Phase 1 (input collection) runs before the pipeline because it produces
//! the `DeploymentConfig` everything else consumes; its outcome is reported
//! through the same `conclude_phase` gate.

use std::path::PathBuf;
use std::time::Duration;

use crate::application::ports::{
    FileTransfer, HttpProbe, ProjectFs, RemoteShell, RunLog, VersionControl,
};
use crate::application::services::{artifacts, connectivity, deployment, environment, repo_sync};
use crate::domain::{DeployError, DeploymentConfig, DeploymentReport, Phase};

/// Run-level switches that are not part of the deployment configuration.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Skip phase 5 on hosts already known to be prepared.
    pub skip_provision: bool,
    pub probe_timeout: Duration,
    pub log_file: Option<PathBuf>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            skip_provision: false,
            probe_timeout: deployment::PROBE_TIMEOUT,
            log_file: None,
        }
    }
}

/// Log a phase's outcome and record it as passed on success.
///
/// # Errors
///
/// Returns `result`'s error unchanged after logging it with its exit code.
pub fn conclude_phase<T>(
    log: &impl RunLog,
    phase: Phase,
    passed: &mut Vec<Phase>,
    result: Result<T, DeployError>,
) -> Result<T, DeployError> {
    match result {
        Ok(value) => {
            log.success(&format!("{phase} passed"));
            passed.push(phase);
            Ok(value)
        }
        Err(e) => {
            log.error(&format!("{phase} failed: {e} (exit code {})", e.exit_code()));
            Err(e)
        }
    }
}

/// Run phases 2–6 against `config`. `passed` carries phases already
/// concluded by the caller (normally input collection).
///
/// Every fatal phase stops the run; the reachability probe never does.
///
/// # Errors
///
/// Returns the first phase's `DeployError`.
#[allow(clippy::too_many_arguments)]
pub async fn run_pipeline(
    vcs: &impl VersionControl,
    fs: &impl ProjectFs,
    remote: &(impl RemoteShell + FileTransfer),
    http: &impl HttpProbe,
    log: &impl RunLog,
    config: &DeploymentConfig,
    opts: &PipelineOptions,
    mut passed: Vec<Phase>,
) -> Result<DeploymentReport, DeployError> {
    log.info(&format!("{} started", Phase::RepositorySync));
    let (project, checkout) = conclude_phase(
        log,
        Phase::RepositorySync,
        &mut passed,
        repo_sync::sync_repository(vcs, fs, config, log).await,
    )?;

    log.info(&format!("{} started", Phase::ArtifactVerification));
    let descriptor = conclude_phase(
        log,
        Phase::ArtifactVerification,
        &mut passed,
        artifacts::verify_build_descriptor(fs, &project, log),
    )?;

    log.info(&format!("{} started", Phase::RemoteConnectivity));
    let runtime_preinstalled = conclude_phase(
        log,
        Phase::RemoteConnectivity,
        &mut passed,
        connectivity::check_connectivity(remote, log).await,
    )?;

    if opts.skip_provision {
        log.warn(&format!("{} skipped", Phase::EnvironmentPreparation));
    } else {
        log.info(&format!("{} started", Phase::EnvironmentPreparation));
        conclude_phase(
            log,
            Phase::EnvironmentPreparation,
            &mut passed,
            environment::prepare_environment(remote, &config.user, log).await,
        )?;
    }

    log.info(&format!("{} started", Phase::Deployment));
    conclude_phase(
        log,
        Phase::Deployment,
        &mut passed,
        deployment::deploy_application(remote, config, &project, log).await,
    )?;

    let reachability =
        deployment::probe_reachability(http, &config.probe_url(), opts.probe_timeout, log).await;

    Ok(DeploymentReport {
        phases_passed: passed,
        checkout,
        descriptor,
        runtime_preinstalled,
        provisioning_skipped: opts.skip_provision,
        reachability,
        log_file: opts.log_file.clone(),
    })
}

/// Always-run finalizer: writes the terminal summary line.
pub fn finalize(log: &impl RunLog, outcome: &Result<DeploymentReport, DeployError>) {
    match outcome {
        Ok(report) => {
            let note = if report.reachability.is_accessible() {
                "application accessible"
            } else {
                "application not accessible"
            };
            log.success(&format!(
                "Deployment succeeded: {} of {} phases passed; {note}",
                report.phases_passed.len(),
                Phase::ALL.len()
            ));
        }
        Err(e) => log.error(&format!(
            "Deployment failed ({}): {e} (exit code {})",
            e.category().as_str(),
            e.exit_code()
        )),
    }
}
