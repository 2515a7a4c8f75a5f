//! Structural tests for layer boundary enforcement.
//!
//! These tests scan source files to verify that the domain stays pure and
//! that services depend on ports, never on adapters.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Non-comment lines that appear before the first `#[cfg(test)]`.
fn production_lines(path: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .take_while(|l| !l.trim().starts_with("#[cfg(test)]"))
        .filter(|l| {
            let trimmed = l.trim();
            !trimmed.starts_with("//") && !trimmed.starts_with("/*") && !trimmed.starts_with('*')
        })
        .map(String::from)
        .collect()
}

fn src_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src")
}

/// Every `(file:line: text)` in `dir` whose production code contains one of
/// `forbidden`.
fn violations_in(dir: &Path, forbidden: &[&str]) -> Vec<String> {
    let mut violations = Vec::new();
    for file in collect_rs_files(dir) {
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();
        for (i, line) in production_lines(&file).iter().enumerate() {
            for pattern in forbidden {
                if line.contains(pattern) {
                    violations.push(format!("{rel}:{}: `{pattern}`: {line}", i + 1));
                }
            }
        }
    }
    violations
}

#[test]
fn domain_performs_no_io() {
    let violations = violations_in(
        &src_dir().join("domain"),
        &[
            "tokio",
            "std::fs",
            "std::process",
            "std::net",
            "crate::infra",
            "crate::application",
            "crate::commands",
            "crate::output",
        ],
    );
    assert!(
        violations.is_empty(),
        "Found I/O or outer-layer imports in domain/:\n{}",
        violations.join("\n")
    );
}

#[test]
fn application_depends_only_on_ports() {
    let violations = violations_in(
        &src_dir().join("application"),
        &["crate::infra", "crate::commands", "crate::output", "tokio::", "std::fs"],
    );
    assert!(
        violations.is_empty(),
        "Found adapter imports in application/: use port traits instead:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    let violations = violations_in(
        &src_dir().join("infra"),
        &["crate::commands", "crate::output"],
    );
    assert!(
        violations.is_empty(),
        "Found presentation imports in infra/:\n{}",
        violations.join("\n")
    );
}

#[test]
fn no_tokio_command_runner_new_outside_infra() {
    let mut violations = Vec::new();
    for dir in ["application", "commands", "domain", "output"] {
        violations.extend(violations_in(&src_dir().join(dir), &["TokioCommandRunner::new"]));
    }
    assert!(
        violations.is_empty(),
        "Found TokioCommandRunner::new outside infra/: use the adapters' default_runner():\n{}",
        violations.join("\n")
    );
}

#[test]
fn services_take_trait_bounds_not_adapters() {
    let violations = violations_in(
        &src_dir().join("application").join("services"),
        &["GitCli", "OpenSsh", "TokioCommandRunner", "UreqProbe", "FileRunLog", "LocalFs"],
    );
    assert!(
        violations.is_empty(),
        "Found concrete adapter types in services:\n{}",
        violations.join("\n")
    );
}
