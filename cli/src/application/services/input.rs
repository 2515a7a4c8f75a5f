//! Phase 1: operator input collection.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::PathBuf;

use crate::application::ports::{Prompter, RunLog};
use crate::domain::config::{expand_home, resolve_field, validate_port, validate_remote_dir};
use crate::domain::{DeployDefaults, DeployError, DeploymentConfig, InputField, OperatorInput, Secret};

/// Prompter used in non-interactive mode: every question goes unanswered,
/// so fields fall back to their defaults or fail.
pub struct NoPrompt;

impl Prompter for NoPrompt {
    fn ask(&self, _field: InputField) -> anyhow::Result<String> {
        Ok(String::new())
    }
}

/// Local and remote placement settings that are not prompted for.
#[derive(Debug, Clone)]
pub struct Placement {
    pub work_dir: PathBuf,
    pub remote_dir: String,
    pub ssh_port: u16,
    /// Local home directory, used to expand `~/` in the key path.
    pub home: Option<PathBuf>,
}

/// Where a field's value came from. Values themselves are never logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Supplied,
    ConfigFile,
    Prompt,
}

impl Source {
    fn as_str(self) -> &'static str {
        match self {
            Self::Supplied => "command line",
            Self::ConfigFile => "config file",
            Self::Prompt => "prompt",
        }
    }
}

/// Collect and validate every field, in prompt order.
///
/// Precedence is supplied flag/env, then config file, then the prompter.
/// The run fails on the first field left empty that has no default, before
/// any later field is asked for.
///
/// # Errors
///
/// Returns the field's configuration error (`MissingRepoUrl`,
/// `MissingCredential`, `MissingUsername`, `MissingHost`, `MissingKeyPath`,
/// `InvalidPort`, `InvalidRepoUrl`), or `Internal` if the terminal cannot be
/// read or the remote directory is invalid.
pub fn collect_input(
    supplied: &OperatorInput,
    defaults: &DeployDefaults,
    prompter: &impl Prompter,
    placement: Placement,
    log: &impl RunLog,
) -> Result<DeploymentConfig, DeployError> {
    let mut values = Vec::with_capacity(InputField::ALL.len());
    for field in InputField::ALL {
        let (answer, source) = if let Some(v) = non_empty(field, supplied.answer_for(field)) {
            (v.to_string(), Source::Supplied)
        } else if let Some(v) = non_empty(field, defaults.answer_for(field)) {
            (v.to_string(), Source::ConfigFile)
        } else {
            (prompter.ask(field)?, Source::Prompt)
        };
        let used_default = is_blank(field, &answer) && field.default_value().is_some();
        let value = resolve_field(field, Some(&answer))?;
        if used_default {
            log.info(&format!("{}: using default", field.prompt()));
        } else {
            log.info(&format!("{}: provided via {}", field.prompt(), source.as_str()));
        }
        values.push(value);
    }

    let [repo_url, credential, branch, user, host, key_path, port]: [String; 7] = values
        .try_into()
        .map_err(|_| DeployError::Internal(anyhow::anyhow!("incomplete operator input")))?;

    crate::domain::config::repo_name(&repo_url)?;
    validate_remote_dir(&placement.remote_dir)?;

    Ok(DeploymentConfig {
        repo_url,
        credential: Secret::new(credential),
        branch,
        user,
        host,
        ssh_key: expand_home(&key_path, placement.home.as_deref()),
        app_port: validate_port(&port)?,
        ssh_port: placement.ssh_port,
        work_dir: placement.work_dir,
        remote_dir: placement.remote_dir,
    })
}

fn non_empty(field: InputField, value: Option<&str>) -> Option<&str> {
    value.filter(|v| !is_blank(field, v))
}

/// Whitespace counts as an answer for the port, so it fails validation
/// instead of falling back to the default.
fn is_blank(field: InputField, value: &str) -> bool {
    if field == InputField::AppPort {
        value.is_empty()
    } else {
        value.trim().is_empty()
    }
}
