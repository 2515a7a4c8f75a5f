//! Infrastructure implementation of the `VersionControl` port on the `git` CLI.

use std::path::Path;
use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, VersionControl};
use crate::infra::command_runner::{
    DEFAULT_CMD_TIMEOUT, DEFAULT_TRANSFER_TIMEOUT, TokioCommandRunner,
};

/// Routes all git calls through a `CommandRunner`.
///
/// Generic over `R: CommandRunner` so tests can record the argument lists
/// without spawning real processes.
pub struct GitCli<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> GitCli<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl GitCli<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner::new(DEFAULT_TRANSFER_TIMEOUT))
    }
}

fn path_arg(path: &Path) -> Result<&str> {
    path.to_str()
        .with_context(|| format!("path is not valid UTF-8: {}", path.display()))
}

impl<R: CommandRunner> VersionControl for GitCli<R> {
    async fn clone_branch(&self, url: &str, branch: &str, dest: &Path) -> Result<Output> {
        let dest = path_arg(dest)?;
        // The URL may carry a credential, so it is kept out of the context message.
        self.runner
            .run(
                "git",
                &["clone", "--branch", branch, "--single-branch", url, dest],
            )
            .await
            .context("git clone")
    }

    async fn pull(&self, repo: &Path, url: &str, branch: &str) -> Result<Output> {
        let repo = path_arg(repo)?;
        self.runner
            .run("git", &["-C", repo, "pull", url, branch])
            .await
            .context("git pull")
    }

    async fn set_origin(&self, repo: &Path, url: &str) -> Result<Output> {
        let repo = path_arg(repo)?;
        self.runner
            .run_with_timeout(
                "git",
                &["-C", repo, "remote", "set-url", "origin", url],
                DEFAULT_CMD_TIMEOUT,
            )
            .await
            .context("git remote set-url")
    }

    async fn current_branch(&self, repo: &Path) -> Result<Output> {
        let repo = path_arg(repo)?;
        self.runner
            .run_with_timeout(
                "git",
                &["-C", repo, "rev-parse", "--abbrev-ref", "HEAD"],
                DEFAULT_CMD_TIMEOUT,
            )
            .await
            .context("git rev-parse")
    }

    async fn checkout(&self, repo: &Path, branch: &str) -> Result<Output> {
        let repo = path_arg(repo)?;
        self.runner
            .run_with_timeout("git", &["-C", repo, "checkout", branch], DEFAULT_CMD_TIMEOUT)
            .await
            .context("git checkout")
    }
}
