//! Phase 2: repository synchronization.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::{Path, PathBuf};
use std::process::Output;

use crate::application::ports::{ProjectFs, RunLog, VersionControl};
use crate::application::services::failure_detail;
use crate::domain::{CheckoutAction, DeployError, DeploymentConfig};

/// Ensure `work_dir/<repo>` exists with `config.branch` checked out at its
/// latest remote commit.
///
/// An existing checkout (its `.git` directory is present) is first switched
/// to the branch and then pulled, so the update always lands on the branch
/// being deployed. Otherwise a fresh single-branch clone is made. No
/// stashing, cleaning, or conflict resolution is attempted: a dirty or
/// diverged tree surfaces as `PullFailed`.
///
/// The credential-bearing URL is passed to git per call. `origin` always
/// holds the plain repository URL, since the checkout is later copied to the
/// remote host as-is.
///
/// # Errors
///
/// Returns `PullFailed`, `CloneFailed`, or `BranchSwitchFailed`.
pub async fn sync_repository(
    vcs: &impl VersionControl,
    fs: &impl ProjectFs,
    config: &DeploymentConfig,
    log: &impl RunLog,
) -> Result<(PathBuf, CheckoutAction), DeployError> {
    let project = config.project_dir()?;
    let branch = config.branch.as_str();

    if fs.exists(&project.join(".git")) {
        log.info(&format!("Existing checkout at {}", project.display()));
        let pull_failed = |detail: String| DeployError::PullFailed {
            branch: branch.to_string(),
            detail: config.credential.redact(&detail),
        };
        reset_origin(vcs, &project, &config.repo_url).await.map_err(pull_failed)?;
        ensure_branch(vcs, &project, branch, log).await?;

        log.info(&format!("Pulling branch '{branch}'"));
        outcome(vcs.pull(&project, &config.authenticated_url(), branch).await)
            .map_err(pull_failed)?;
        return Ok((project, CheckoutAction::Updated));
    }

    log.info(&format!(
        "Cloning branch '{branch}' of {} into {}",
        config.repo_url,
        project.display()
    ));
    let clone_failed = |detail: String| DeployError::CloneFailed {
        branch: branch.to_string(),
        detail: config.credential.redact(&detail),
    };
    outcome(vcs.clone_branch(&config.authenticated_url(), branch, &project).await)
        .map_err(clone_failed)?;
    reset_origin(vcs, &project, &config.repo_url).await.map_err(clone_failed)?;
    ensure_branch(vcs, &project, branch, log).await?;
    Ok((project, CheckoutAction::Cloned))
}

async fn reset_origin(
    vcs: &impl VersionControl,
    project: &Path,
    repo_url: &str,
) -> Result<(), String> {
    outcome(vcs.set_origin(project, repo_url).await)
        .map_err(|detail| format!("cannot reset origin URL: {detail}"))
}

/// Collapse a git call into `Err(detail)` unless it ran and exited zero.
fn outcome(result: anyhow::Result<Output>) -> Result<(), String> {
    match result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => Err(failure_detail(&out)),
        Err(e) => Err(format!("{e:#}")),
    }
}

/// Confirm the checkout is on `branch`, switching once if it is not.
async fn ensure_branch(
    vcs: &impl VersionControl,
    project: &Path,
    branch: &str,
    log: &impl RunLog,
) -> Result<(), DeployError> {
    let actual = current_branch(vcs, project).await;
    if actual.as_deref() == Some(branch) {
        log.info(&format!("Checkout is on branch '{branch}'"));
        return Ok(());
    }

    let shown = actual.unwrap_or_else(|| "unknown".to_string());
    log.warn(&format!("Checkout is on '{shown}', switching to '{branch}'"));
    // A failed checkout is detected by the re-check below.
    let _ = vcs.checkout(project, branch).await;

    match current_branch(vcs, project).await {
        Some(now) if now == branch => {
            log.info(&format!("Switched to branch '{branch}'"));
            Ok(())
        }
        now => Err(DeployError::BranchSwitchFailed {
            expected: branch.to_string(),
            actual: now.unwrap_or_else(|| "unknown".to_string()),
        }),
    }
}

async fn current_branch(vcs: &impl VersionControl, project: &Path) -> Option<String> {
    match vcs.current_branch(project).await {
        Ok(out) if out.status.success() => {
            let name = String::from_utf8_lossy(&out.stdout).trim().to_string();
            (!name.is_empty()).then_some(name)
        }
        _ => None,
    }
}
