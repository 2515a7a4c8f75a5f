//! Domain types and validators for deployment configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::DeployError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_APP_PORT: &str = "8000";
pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_REMOTE_DIR: &str = "app";

static PORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // compile-time constant pattern
    Regex::new(r"^[0-9]+$").expect("valid port pattern")
});

// ── Secret ───────────────────────────────────────────────────────────────────

/// A credential that never prints its contents.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw credential. Callers must not log the returned value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Replaces every occurrence of the credential in `text` with `***`.
    #[must_use]
    pub fn redact(&self, text: &str) -> String {
        if self.0.is_empty() {
            return text.to_string();
        }
        text.replace(&self.0, "***")
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

// ── Operator input fields ────────────────────────────────────────────────────

/// The operator-supplied fields, in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    RepoUrl,
    Credential,
    Branch,
    Username,
    Host,
    KeyPath,
    AppPort,
}

impl InputField {
    /// Prompt order.
    pub const ALL: [InputField; 7] = [
        Self::RepoUrl,
        Self::Credential,
        Self::Branch,
        Self::Username,
        Self::Host,
        Self::KeyPath,
        Self::AppPort,
    ];

    #[must_use]
    pub fn prompt(self) -> &'static str {
        match self {
            Self::RepoUrl => "Repository URL",
            Self::Credential => "Access token",
            Self::Branch => "Branch",
            Self::Username => "Remote username",
            Self::Host => "Remote host address",
            Self::KeyPath => "SSH key path",
            Self::AppPort => "Application port",
        }
    }

    /// Value used when the operator leaves the field empty.
    #[must_use]
    pub fn default_value(self) -> Option<&'static str> {
        match self {
            Self::Branch => Some(DEFAULT_BRANCH),
            Self::AppPort => Some(DEFAULT_APP_PORT),
            _ => None,
        }
    }

    /// Whether the field must be read without echo.
    #[must_use]
    pub fn is_secret(self) -> bool {
        matches!(self, Self::Credential)
    }

    /// Error reported when the field is left empty and has no default.
    #[must_use]
    pub fn missing_error(self) -> DeployError {
        match self {
            Self::RepoUrl => DeployError::MissingRepoUrl,
            Self::Credential => DeployError::MissingCredential,
            Self::Username => DeployError::MissingUsername,
            Self::Host => DeployError::MissingHost,
            Self::KeyPath => DeployError::MissingKeyPath,
            Self::AppPort => DeployError::InvalidPort(String::new()),
            // Branch always has a default; kept total for exhaustiveness.
            Self::Branch => DeployError::Internal(anyhow::anyhow!("branch is required")),
        }
    }
}

/// Applies the field's default to an empty answer and validates the result.
///
/// The port answer is taken verbatim: only a truly empty answer takes the
/// default, and surrounding whitespace is a non-digit like any other.
///
/// # Errors
///
/// Returns the field's missing-value error when the answer is empty and the
/// field has no default, or `InvalidPort` for a malformed port.
pub fn resolve_field(field: InputField, answer: Option<&str>) -> Result<String, DeployError> {
    let trimmed = match answer {
        Some(raw) if field == InputField::AppPort => raw,
        Some(raw) => raw.trim(),
        None => "",
    };
    let value = if trimmed.is_empty() {
        field.default_value().ok_or_else(|| field.missing_error())?
    } else {
        trimmed
    };
    if field == InputField::AppPort {
        validate_port(value)?;
    }
    Ok(value.to_string())
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Parses an application port: digits only, within 1-65535.
///
/// # Errors
///
/// Returns `InvalidPort` for empty input, any non-digit character, zero, or a
/// value above 65535.
pub fn validate_port(raw: &str) -> Result<u16, DeployError> {
    if !PORT_PATTERN.is_match(raw) {
        return Err(DeployError::InvalidPort(raw.to_string()));
    }
    match raw.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(DeployError::InvalidPort(raw.to_string())),
    }
}

/// Derives the checkout directory name from a repository URL.
///
/// Takes the last path segment and strips a trailing `.git`.
///
/// # Errors
///
/// Returns `InvalidRepoUrl` if no non-empty name can be derived.
pub fn repo_name(url: &str) -> Result<String, DeployError> {
    let trimmed = url.trim().trim_end_matches('/');
    let last = trimmed
        .rsplit(['/', ':'])
        .next()
        .unwrap_or_default()
        .trim_end_matches(".git");
    if last.is_empty() || last == "." || last == ".." {
        return Err(DeployError::InvalidRepoUrl(url.to_string()));
    }
    Ok(last.to_string())
}

/// Embeds the credential into an HTTP(S) URL; other URL forms are returned unchanged.
#[must_use]
pub fn authenticated_url(url: &str, credential: &Secret) -> String {
    for scheme in ["https://", "http://"] {
        if let Some(rest) = url.strip_prefix(scheme) {
            // Drop any userinfo already present so the token is the only one.
            let rest = match rest.split_once('@') {
                Some((userinfo, host)) if !userinfo.contains('/') => host,
                _ => rest,
            };
            return format!("{scheme}{}@{rest}", credential.expose());
        }
    }
    url.to_string()
}

/// Expands a leading `~/` against `home`.
#[must_use]
pub fn expand_home(path: &str, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if path == "~" && home.is_some() => home.map(Path::to_path_buf).unwrap_or_default(),
        _ => PathBuf::from(path),
    }
}

/// Validates the remote deployment directory, relative to the remote home.
///
/// # Errors
///
/// Returns an error if the path is empty, absolute, home-relative, climbs
/// out with `..`, or contains characters other than ASCII letters, digits,
/// `-`, `_`, `.` and `/`. The path is passed unquoted to `scp`.
pub fn validate_remote_dir(dir: &str) -> Result<()> {
    anyhow::ensure!(!dir.trim().is_empty(), "remote directory must not be empty");
    anyhow::ensure!(
        dir.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/')),
        "remote directory '{dir}' may only contain letters, digits, '-', '_', '.' and '/'"
    );
    anyhow::ensure!(
        !dir.starts_with('/') && !dir.starts_with('~'),
        "remote directory '{dir}' must be relative to the remote home directory"
    );
    anyhow::ensure!(
        Path::new(dir).components().all(|c| matches!(c, Component::Normal(_))),
        "remote directory '{dir}' must not contain '.' or '..' components"
    );
    Ok(())
}

// ── Config schema ────────────────────────────────────────────────────────────

/// Optional defaults stored in `~/.shipyard/config.yaml`.
///
/// The access token is intentionally not part of the schema.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DeployDefaults {
    pub repo_url: Option<String>,
    pub branch: Option<String>,
    pub user: Option<String>,
    pub host: Option<String>,
    pub ssh_key: Option<String>,
    pub app_port: Option<String>,
    pub ssh_port: Option<u16>,
    pub work_dir: Option<PathBuf>,
    pub remote_dir: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl DeployDefaults {
    /// The configured answer for a prompt field, if any.
    #[must_use]
    pub fn answer_for(&self, field: InputField) -> Option<&str> {
        match field {
            InputField::RepoUrl => self.repo_url.as_deref(),
            InputField::Credential => None,
            InputField::Branch => self.branch.as_deref(),
            InputField::Username => self.user.as_deref(),
            InputField::Host => self.host.as_deref(),
            InputField::KeyPath => self.ssh_key.as_deref(),
            InputField::AppPort => self.app_port.as_deref(),
        }
    }
}

// ── Supplied input ───────────────────────────────────────────────────────────

/// Answers supplied up front by flags or environment variables.
#[derive(Debug, Clone, Default)]
pub struct OperatorInput {
    pub repo_url: Option<String>,
    pub credential: Option<Secret>,
    pub branch: Option<String>,
    pub user: Option<String>,
    pub host: Option<String>,
    pub ssh_key: Option<String>,
    pub app_port: Option<String>,
}

impl OperatorInput {
    /// The supplied answer for a prompt field, if any.
    #[must_use]
    pub fn answer_for(&self, field: InputField) -> Option<&str> {
        match field {
            InputField::RepoUrl => self.repo_url.as_deref(),
            InputField::Credential => self.credential.as_ref().map(Secret::expose),
            InputField::Branch => self.branch.as_deref(),
            InputField::Username => self.user.as_deref(),
            InputField::Host => self.host.as_deref(),
            InputField::KeyPath => self.ssh_key.as_deref(),
            InputField::AppPort => self.app_port.as_deref(),
        }
    }
}

// ── Deployment configuration ─────────────────────────────────────────────────

/// Immutable configuration for one deployment run.
#[derive(Debug, Clone)]
pub struct DeploymentConfig {
    pub repo_url: String,
    pub credential: Secret,
    pub branch: String,
    pub user: String,
    pub host: String,
    pub ssh_key: PathBuf,
    pub app_port: u16,
    pub ssh_port: u16,
    /// Local directory the repository is checked out under.
    pub work_dir: PathBuf,
    /// Deployment directory, relative to the remote user's home.
    pub remote_dir: String,
}

impl DeploymentConfig {
    /// Checkout directory name derived from the repository URL.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRepoUrl` if the URL has no usable last segment.
    pub fn repo_name(&self) -> Result<String, DeployError> {
        repo_name(&self.repo_url)
    }

    /// Local checkout path: `work_dir/<repo name>`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRepoUrl` if the URL has no usable last segment.
    pub fn project_dir(&self) -> Result<PathBuf, DeployError> {
        Ok(self.work_dir.join(self.repo_name()?))
    }

    /// Fetch URL with the credential embedded.
    #[must_use]
    pub fn authenticated_url(&self) -> String {
        authenticated_url(&self.repo_url, &self.credential)
    }

    /// `user@host`.
    #[must_use]
    pub fn target(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    /// URL probed after deployment.
    #[must_use]
    pub fn probe_url(&self) -> String {
        format!("http://{}:{}/", self.host, self.app_port)
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
