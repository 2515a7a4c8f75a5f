//! Phase identities and the end-of-run deployment report.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::deploy::BuildDescriptor;

/// The six ordered phases of a deployment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    InputCollection,
    RepositorySync,
    ArtifactVerification,
    RemoteConnectivity,
    EnvironmentPreparation,
    Deployment,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Self::InputCollection,
        Self::RepositorySync,
        Self::ArtifactVerification,
        Self::RemoteConnectivity,
        Self::EnvironmentPreparation,
        Self::Deployment,
    ];

    /// 1-based position in the run.
    #[must_use]
    pub fn number(self) -> usize {
        Self::ALL.iter().position(|p| *p == self).map_or(0, |i| i + 1)
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::InputCollection => "Input collection",
            Self::RepositorySync => "Repository sync",
            Self::ArtifactVerification => "Build-artifact verification",
            Self::RemoteConnectivity => "Remote connectivity check",
            Self::EnvironmentPreparation => "Remote environment preparation",
            Self::Deployment => "Application deployment",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}] {}", self.number(), Self::ALL.len(), self.title())
    }
}

/// How the local checkout was brought up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutAction {
    Cloned,
    Updated,
}

/// Outcome of the post-deploy HTTP probe. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reachability {
    Accessible { url: String },
    NotAccessible { url: String, reason: String },
}

impl Reachability {
    #[must_use]
    pub fn is_accessible(&self) -> bool {
        matches!(self, Self::Accessible { .. })
    }
}

impl fmt::Display for Reachability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accessible { url } => write!(f, "Application is accessible at {url}"),
            Self::NotAccessible { url, reason } => {
                write!(f, "Application is not accessible at {url} ({reason})")
            }
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentReport {
    pub phases_passed: Vec<Phase>,
    pub checkout: CheckoutAction,
    pub descriptor: BuildDescriptor,
    /// Whether the container runtime was already installed before preparation.
    pub runtime_preinstalled: bool,
    pub provisioning_skipped: bool,
    pub reachability: Reachability,
    pub log_file: Option<PathBuf>,
}
