//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::InputField;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(&self, program: &str, args: &[&str], timeout: Duration)
    -> Result<Output>;
    /// Run a program with stdin piped from `stdin`.
    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output>;
}

// ── Version Control Port ──────────────────────────────────────────────────────

/// Local repository operations. Every call returns the tool's raw output; a
/// non-zero exit status is a failed operation, `Err` means the tool could not
/// be run at all.
#[allow(async_fn_in_trait)]
pub trait VersionControl {
    /// Fresh checkout of a single branch into `dest`.
    async fn clone_branch(&self, url: &str, branch: &str, dest: &Path) -> Result<Output>;
    /// Merge `branch` fetched from `url` into the current branch at `repo`.
    /// The URL is used for this call only and is not stored.
    async fn pull(&self, repo: &Path, url: &str, branch: &str) -> Result<Output>;
    /// Point `origin` of the checkout at `repo` to `url`.
    async fn set_origin(&self, repo: &Path, url: &str) -> Result<Output>;
    /// Name of the branch currently checked out at `repo`.
    async fn current_branch(&self, repo: &Path) -> Result<Output>;
    /// Switch the checkout at `repo` to `branch`.
    async fn checkout(&self, repo: &Path, branch: &str) -> Result<Output>;
}

// ── Local Filesystem Port ─────────────────────────────────────────────────────

/// Read-only view of the local project tree.
pub trait ProjectFs {
    fn exists(&self, path: &Path) -> bool;
}

// ── Remote Ports ──────────────────────────────────────────────────────────────

/// Command execution on the remote host.
///
/// The returned `Output` is the remote session result: exit status plus
/// captured stdout/stderr, inspected immediately by the calling phase.
#[allow(async_fn_in_trait)]
pub trait RemoteShell {
    /// `user@host` label for messages.
    fn target(&self) -> String;
    /// Run a single non-interactive command.
    async fn exec(&self, command: &str) -> Result<Output>;
    /// Run a multi-line bash batch, sent on stdin.
    async fn exec_script(&self, script: &str) -> Result<Output>;
}

/// Host-to-remote file transfer.
#[allow(async_fn_in_trait)]
pub trait FileTransfer {
    /// Recursively copy the contents of `local` into `remote_dir` (relative
    /// to the remote home), creating it if needed.
    async fn transfer_dir(&self, local: &Path, remote_dir: &str) -> Result<Output>;
}

// ── Network Probe Port ────────────────────────────────────────────────────────

/// HTTP reachability check, mockable without network access.
#[allow(async_fn_in_trait)]
pub trait HttpProbe {
    /// Issue a GET and return the response status code.
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure or timeout.
    async fn get_status(&self, url: &str, timeout: Duration) -> Result<u16>;
}

// ── Operator Input Port ───────────────────────────────────────────────────────

/// Interactive source of operator answers.
pub trait Prompter {
    /// Ask for `field`. An empty string means the operator gave no answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    fn ask(&self, field: InputField) -> Result<String>;
}

// ── Run Log Port ──────────────────────────────────────────────────────────────

/// Severity of a run-log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Success => "OK",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

/// Append-only log of a deployment run, injected into every phase.
pub trait RunLog {
    fn record(&self, level: LogLevel, message: &str);

    fn info(&self, message: &str) {
        self.record(LogLevel::Info, message);
    }

    fn success(&self, message: &str) {
        self.record(LogLevel::Success, message);
    }

    fn warn(&self, message: &str) {
        self.record(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.record(LogLevel::Error, message);
    }
}

/// Tee: every line goes to both logs, in order.
impl<A: RunLog, B: RunLog> RunLog for (A, B) {
    fn record(&self, level: LogLevel, message: &str) {
        self.0.record(level, message);
        self.1.record(level, message);
    }
}

impl<L: RunLog + ?Sized> RunLog for &L {
    fn record(&self, level: LogLevel, message: &str) {
        (**self).record(level, message);
    }
}
