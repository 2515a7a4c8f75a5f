//! Application context: unified state passed to every command handler.

use crate::output::OutputContext;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
    /// Skip interactive prompts (also set by `CI` / `SHIPYARD_YES` env vars).
    pub yes: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// When `true`, never prompt: missing fields take their default or fail.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `SHIPYARD_YES`
    /// environment variables are set to anything but empty, `0` or `false`.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// In JSON mode the terminal stream is quieted so stdout carries only
    /// the final JSON document.
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let ci_env = ["CI", "SHIPYARD_YES"]
            .iter()
            .any(|name| env_flag_set(std::env::var(name).ok().as_deref()));
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        Self {
            output: OutputContext::new(flags.no_color, flags.quiet || flags.json),
            mode,
            non_interactive: flags.yes || ci_env,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }
}

/// Whether a boolean-ish environment variable counts as enabled.
fn env_flag_set(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        let v = v.trim();
        !v.is_empty() && v != "0" && !v.eq_ignore_ascii_case("false")
    })
}
