//! Phase 3: build-artifact verification.

use std::path::Path;

use crate::application::ports::{ProjectFs, RunLog};
use crate::domain::deploy::detect_descriptor;
use crate::domain::{BuildDescriptor, DeployError};

/// Precondition gate: the synced project must contain a container build
/// descriptor. Contents are not parsed.
///
/// # Errors
///
/// Returns `MissingBuildDescriptor` when no recognised file is present.
pub fn verify_build_descriptor(
    fs: &impl ProjectFs,
    project: &Path,
    log: &impl RunLog,
) -> Result<BuildDescriptor, DeployError> {
    let descriptor = detect_descriptor(|name| fs.exists(&project.join(name)))
        .ok_or_else(|| DeployError::MissingBuildDescriptor(project.display().to_string()))?;
    log.info(&format!("Found {}", descriptor.file_name()));
    Ok(descriptor)
}
