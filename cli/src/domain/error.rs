//! Typed deployment error enum.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! Every fatal failure class maps to exactly one process exit code.

use thiserror::Error;

/// Broad failure class used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Synchronization,
    Precondition,
    Connectivity,
    Provisioning,
    Deployment,
    Internal,
}

impl ErrorCategory {
    /// Short lowercase name used in log lines and JSON output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Synchronization => "synchronization",
            Self::Precondition => "precondition",
            Self::Connectivity => "connectivity",
            Self::Provisioning => "provisioning",
            Self::Deployment => "deployment",
            Self::Internal => "internal",
        }
    }
}

// ── Deployment errors ─────────────────────────────────────────────────────────

/// Every way a deployment run can stop early.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("Repository URL is required.")]
    MissingRepoUrl,

    #[error("Cannot derive a repository name from '{0}'.")]
    InvalidRepoUrl(String),

    #[error("Access token is required.")]
    MissingCredential,

    #[error("Remote username is required.")]
    MissingUsername,

    #[error("Remote host address is required.")]
    MissingHost,

    #[error("SSH key path is required.")]
    MissingKeyPath,

    #[error("Invalid application port '{0}': expected digits only, 1-65535.")]
    InvalidPort(String),

    #[error("Failed to update existing checkout on branch '{branch}': {detail}")]
    PullFailed { branch: String, detail: String },

    #[error("Failed to clone branch '{branch}': {detail}")]
    CloneFailed { branch: String, detail: String },

    #[error("Checkout is on '{actual}' and could not be switched to '{expected}'.")]
    BranchSwitchFailed { expected: String, actual: String },

    #[error(
        "No build descriptor in {0}. Expected Dockerfile, docker-compose.yml or docker-compose.yaml."
    )]
    MissingBuildDescriptor(String),

    #[error("Cannot reach remote host {target}: {detail}")]
    RemoteUnreachable { target: String, detail: String },

    #[error("Remote environment preparation failed: {0}")]
    ProvisioningFailed(String),

    #[error("File transfer to {target} failed: {detail}")]
    TransferFailed { target: String, detail: String },

    #[error("Remote deployment failed: {0}")]
    RemoteDeployFailed(String),

    #[error("Nothing to deploy: no build descriptor found in remote directory '{0}'.")]
    NothingToDeploy(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl DeployError {
    /// Process exit code for this failure.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingRepoUrl | Self::InvalidRepoUrl(_) => 1,
            Self::MissingCredential => 2,
            Self::MissingUsername => 3,
            Self::MissingHost => 4,
            Self::MissingKeyPath => 5,
            Self::InvalidPort(_) => 6,
            Self::PullFailed { .. } => 7,
            Self::CloneFailed { .. } => 8,
            Self::BranchSwitchFailed { .. } => 9,
            Self::MissingBuildDescriptor(_) => 10,
            Self::RemoteUnreachable { .. } => 11,
            Self::ProvisioningFailed(_) => 12,
            Self::TransferFailed { .. } | Self::RemoteDeployFailed(_) => 13,
            Self::NothingToDeploy(_) => 14,
            Self::Internal(_) => 70,
        }
    }

    /// Failure class of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingRepoUrl
            | Self::InvalidRepoUrl(_)
            | Self::MissingCredential
            | Self::MissingUsername
            | Self::MissingHost
            | Self::MissingKeyPath
            | Self::InvalidPort(_) => ErrorCategory::Configuration,
            Self::PullFailed { .. } | Self::CloneFailed { .. } | Self::BranchSwitchFailed { .. } => {
                ErrorCategory::Synchronization
            }
            Self::MissingBuildDescriptor(_) => ErrorCategory::Precondition,
            Self::RemoteUnreachable { .. } => ErrorCategory::Connectivity,
            Self::ProvisioningFailed(_) => ErrorCategory::Provisioning,
            Self::TransferFailed { .. } | Self::RemoteDeployFailed(_) | Self::NothingToDeploy(_) => {
                ErrorCategory::Deployment
            }
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }
}
