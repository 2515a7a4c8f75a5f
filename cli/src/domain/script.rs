//! Structured remote shell batches.
//!
//! A `RemoteScript` is an ordered list of stages composed into one bash
//! script at execution time. Each step is independently inspectable so the
//! provisioning and deploy batches can be tested step by step.

use std::fmt::Write as _;

/// Header emitted at the top of every rendered script.
pub const SCRIPT_HEADER: &str = "set -euo pipefail";

/// Condition under which a step runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// Run only when `check` fails (e.g. the tool is not installed yet).
    Unless(String),
    /// Run only when `check` succeeds.
    When(String),
}

/// One labelled unit of remote work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub label: String,
    pub commands: Vec<String>,
    pub guard: Option<Guard>,
    /// When set, each command's failure is ignored.
    pub tolerate_failure: bool,
}

impl Step {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            commands: Vec::new(),
            guard: None,
            tolerate_failure: false,
        }
    }

    #[must_use]
    pub fn run(mut self, command: impl Into<String>) -> Self {
        self.commands.push(command.into());
        self
    }

    /// Skip the step when `check` succeeds on the remote host.
    #[must_use]
    pub fn unless(mut self, check: impl Into<String>) -> Self {
        self.guard = Some(Guard::Unless(check.into()));
        self
    }

    /// Run the step only when `check` succeeds on the remote host.
    #[must_use]
    pub fn when(mut self, check: impl Into<String>) -> Self {
        self.guard = Some(Guard::When(check.into()));
        self
    }

    #[must_use]
    pub fn tolerate_failure(mut self) -> Self {
        self.tolerate_failure = true;
        self
    }

    fn render(&self, out: &mut String, indent: &str) {
        let _ = writeln!(out, "{indent}echo {}", shell_quote(&format!("==> {}", self.label)));
        let (body_indent, close) = match &self.guard {
            Some(Guard::Unless(check)) => {
                let _ = writeln!(out, "{indent}if ! {check} >/dev/null 2>&1; then");
                (format!("{indent}  "), true)
            }
            Some(Guard::When(check)) => {
                let _ = writeln!(out, "{indent}if {check} >/dev/null 2>&1; then");
                (format!("{indent}  "), true)
            }
            None => (indent.to_string(), false),
        };
        for cmd in &self.commands {
            if self.tolerate_failure {
                let _ = writeln!(out, "{body_indent}{cmd} || true");
            } else {
                let _ = writeln!(out, "{body_indent}{cmd}");
            }
        }
        if close {
            let _ = writeln!(out, "{indent}fi");
        }
    }
}

/// A conditional arm of a `Stage::Select`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Shell test evaluated on the remote host.
    pub condition: String,
    pub steps: Vec<Step>,
}

/// A top-level element of a remote script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Step(Step),
    /// Runs the steps of the first branch whose condition holds, else `otherwise`.
    Select {
        branches: Vec<Branch>,
        otherwise: Vec<Step>,
    },
}

impl Stage {
    fn steps(&self) -> Vec<&Step> {
        match self {
            Stage::Step(step) => vec![step],
            Stage::Select { branches, otherwise } => branches
                .iter()
                .flat_map(|b| b.steps.iter())
                .chain(otherwise.iter())
                .collect(),
        }
    }
}

/// An ordered remote batch, rendered to a single bash script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteScript {
    pub name: String,
    pub stages: Vec<Stage>,
}

impl RemoteScript {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    #[must_use]
    pub fn step(mut self, step: Step) -> Self {
        self.stages.push(Stage::Step(step));
        self
    }

    #[must_use]
    pub fn select(mut self, branches: Vec<Branch>, otherwise: Vec<Step>) -> Self {
        self.stages.push(Stage::Select { branches, otherwise });
        self
    }

    /// All steps in order, including those inside select arms.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.stages.iter().flat_map(Stage::steps)
    }

    /// Finds a step by label.
    #[must_use]
    pub fn find(&self, label: &str) -> Option<&Step> {
        self.steps().find(|s| s.label == label)
    }

    /// Renders the batch as a bash script that stops on the first failing command.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "#!/usr/bin/env bash");
        let _ = writeln!(out, "# {}", self.name);
        let _ = writeln!(out, "{SCRIPT_HEADER}");
        for stage in &self.stages {
            match stage {
                Stage::Step(step) => step.render(&mut out, ""),
                Stage::Select { branches, otherwise } => {
                    for (i, branch) in branches.iter().enumerate() {
                        let keyword = if i == 0 { "if" } else { "elif" };
                        let _ = writeln!(out, "{keyword} {}; then", branch.condition);
                        for step in &branch.steps {
                            step.render(&mut out, "  ");
                        }
                    }
                    if branches.is_empty() {
                        for step in otherwise {
                            step.render(&mut out, "");
                        }
                    } else {
                        if !otherwise.is_empty() {
                            let _ = writeln!(out, "else");
                            for step in otherwise {
                                step.render(&mut out, "  ");
                            }
                        }
                        let _ = writeln!(out, "fi");
                    }
                }
            }
        }
        out
    }
}

/// Single-quotes `value` for safe interpolation into a shell command.
#[must_use]
pub fn shell_quote(value: &str) -> String {
    if !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '='))
    {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', r"'\''"))
}
