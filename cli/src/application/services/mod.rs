//! Application services: one module per deployment phase.
//!
//! Each service composes domain logic with port trait calls. Services import
//! only from `crate::domain` and `crate::application::ports`, never from
//! `crate::infra`, `crate::commands`, or `crate::output`.

pub mod artifacts;
pub mod connectivity;
pub mod deployment;
pub mod environment;
pub mod input;
pub mod pipeline;
pub mod repo_sync;

use std::process::Output;

use crate::application::ports::RunLog;

/// Short description of why a command failed: its last non-empty stderr
/// line, else stdout, else the exit status.
#[must_use]
pub fn failure_detail(output: &Output) -> String {
    let last_line = |bytes: &[u8]| {
        String::from_utf8_lossy(bytes)
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(str::to_string)
    };
    last_line(output.stderr.as_slice())
        .or_else(|| last_line(output.stdout.as_slice()))
        .unwrap_or_else(|| match output.status.code() {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_string(),
        })
}

/// Copy a remote batch's `==>` step markers into the run log, plus every
/// line printed after the `verbose_from` marker.
pub fn log_remote_markers(log: &impl RunLog, output: &Output, verbose_from: Option<&str>) {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut verbose = false;
    for line in stdout.lines() {
        if let Some(label) = line.strip_prefix("==> ") {
            log.info(&format!("remote: {label}"));
            verbose = verbose_from == Some(label);
        } else if verbose && !line.trim().is_empty() {
            log.info(&format!("remote:   {line}"));
        }
    }
}
