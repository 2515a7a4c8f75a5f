//! JSON output helpers for `--json` mode.

use anyhow::{Context, Result};

use crate::domain::{DeployError, DeploymentReport};

/// Format a JSON error object for a failed run.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "category": "...",
///   "code": 11
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(err: &DeployError) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": err.to_string(),
        "category": err.category().as_str(),
        "code": err.exit_code(),
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Format the deployment report of a successful run.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_report(report: &DeploymentReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("JSON serialization failed")
}
