//! Infrastructure implementation of the remote ports over OpenSSH.
//!
//! `OpenSsh<R>` runs `ssh` and `scp` through a `CommandRunner`. Every session
//! is non-interactive (`BatchMode=yes`), so a missing or rejected key fails
//! immediately instead of prompting.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, FileTransfer, RemoteShell};
use crate::domain::DeploymentConfig;
use crate::domain::script::shell_quote;
use crate::infra::command_runner::{
    DEFAULT_BATCH_TIMEOUT, DEFAULT_CMD_TIMEOUT, DEFAULT_TRANSFER_TIMEOUT, TokioCommandRunner,
};

/// Seconds `ssh` waits for the TCP connection before giving up.
pub const CONNECT_TIMEOUT_SECS: u32 = 10;

/// Connection identity for one remote host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTarget {
    pub user: String,
    pub host: String,
    pub port: u16,
    pub key: PathBuf,
}

impl SshTarget {
    #[must_use]
    pub fn from_config(config: &DeploymentConfig) -> Self {
        Self {
            user: config.user.clone(),
            host: config.host.clone(),
            port: config.ssh_port,
            key: config.ssh_key.clone(),
        }
    }

    /// `user@host`.
    #[must_use]
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    /// Options shared by `ssh` and `scp`; `port_flag` is `-p` or `-P`.
    fn common_args(&self, port_flag: &str) -> Vec<String> {
        vec![
            "-i".to_string(),
            self.key.display().to_string(),
            port_flag.to_string(),
            self.port.to_string(),
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            "StrictHostKeyChecking=accept-new".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={CONNECT_TIMEOUT_SECS}"),
        ]
    }

    /// Full `ssh` argument list running `command` on the remote host.
    #[must_use]
    pub fn ssh_args(&self, command: &str) -> Vec<String> {
        let mut args = self.common_args("-p");
        args.push(self.destination());
        args.push(command.to_string());
        args
    }

    /// Full `scp` argument list copying the contents of `local` into `remote_dir`.
    #[must_use]
    pub fn scp_args(&self, local: &Path, remote_dir: &str) -> Vec<String> {
        let mut args = vec!["-r".to_string()];
        args.extend(self.common_args("-P"));
        args.push(local.join(".").display().to_string());
        args.push(format!("{}:{remote_dir}/", self.destination()));
        args
    }
}

/// Routes remote commands and transfers through `ssh`/`scp`.
///
/// Holds three runners with different default timeouts: short commands,
/// file transfers, and long remote batches.
pub struct OpenSsh<R: CommandRunner> {
    target: SshTarget,
    cmd_runner: R,
    transfer_runner: R,
    batch_runner: R,
}

impl<R: CommandRunner> OpenSsh<R> {
    /// Create an adapter with explicit runner instances.
    pub fn new(target: SshTarget, cmd_runner: R, transfer_runner: R, batch_runner: R) -> Self {
        Self {
            target,
            cmd_runner,
            transfer_runner,
            batch_runner,
        }
    }
}

impl OpenSsh<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner(target: SshTarget) -> Self {
        Self::new(
            target,
            TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT),
            TokioCommandRunner::new(DEFAULT_TRANSFER_TIMEOUT),
            TokioCommandRunner::new(DEFAULT_BATCH_TIMEOUT),
        )
    }
}

fn as_strs(args: &[String]) -> Vec<&str> {
    args.iter().map(String::as_str).collect()
}

impl<R: CommandRunner> RemoteShell for OpenSsh<R> {
    fn target(&self) -> String {
        self.target.destination()
    }

    async fn exec(&self, command: &str) -> Result<Output> {
        let args = self.target.ssh_args(command);
        self.cmd_runner
            .run("ssh", &as_strs(&args))
            .await
            .context("ssh exec")
    }

    async fn exec_script(&self, script: &str) -> Result<Output> {
        let args = self.target.ssh_args("bash -s");
        self.batch_runner
            .run_with_stdin("ssh", &as_strs(&args), script.as_bytes())
            .await
            .context("ssh batch")
    }
}

impl<R: CommandRunner> FileTransfer for OpenSsh<R> {
    async fn transfer_dir(&self, local: &Path, remote_dir: &str) -> Result<Output> {
        let mkdir = self
            .exec(&format!("mkdir -p \"$HOME\"/{}", shell_quote(remote_dir)))
            .await?;
        if !mkdir.status.success() {
            return Ok(mkdir);
        }
        let args = self.target.scp_args(local, remote_dir);
        self.transfer_runner
            .run("scp", &as_strs(&args))
            .await
            .context("scp")
    }
}
