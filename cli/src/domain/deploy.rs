//! Build descriptors and the remote deploy batch.

use serde::Serialize;

use crate::domain::script::{Branch, RemoteScript, Step, shell_quote};

pub const DOCKERFILE: &str = "Dockerfile";
pub const COMPOSE_FILES: [&str; 2] = ["docker-compose.yml", "docker-compose.yaml"];

/// Remote exit code meaning no build descriptor exists in the deployed tree.
pub const EXIT_NOTHING_TO_DEPLOY: i32 = 42;
/// Remote exit code meaning the deployment directory does not exist.
pub const EXIT_MISSING_REMOTE_DIR: i32 = 43;

/// Log lines tailed from the most recently started container.
pub const LOG_TAIL_LINES: u32 = 50;

/// A recognised container build descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildDescriptor {
    /// Multi-service compose file (carries the filename variant found).
    Compose(&'static str),
    /// Single-image build file.
    Dockerfile,
}

impl BuildDescriptor {
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Compose(name) => name,
            Self::Dockerfile => DOCKERFILE,
        }
    }
}

/// Finds a build descriptor given a file-existence predicate.
///
/// Compose files take precedence over a single `Dockerfile`, matching the
/// order the remote deploy batch checks them in.
pub fn detect_descriptor(exists: impl Fn(&str) -> bool) -> Option<BuildDescriptor> {
    COMPOSE_FILES
        .into_iter()
        .find(|&name| exists(name))
        .map(BuildDescriptor::Compose)
        .or_else(|| exists(DOCKERFILE).then_some(BuildDescriptor::Dockerfile))
}

/// Builds the remote deploy batch for `remote_dir` (relative to `$HOME`).
#[must_use]
pub fn deploy_script(remote_dir: &str, app_port: u16) -> RemoteScript {
    let dir = shell_quote(remote_dir);
    let compose_test = COMPOSE_FILES
        .iter()
        .map(|f| format!("[ -f {f} ]"))
        .collect::<Vec<_>>()
        .join(" || ");

    RemoteScript::new("shipyard: deploy application")
        .step(
            Step::new("Entering deployment directory")
                .run(format!(
                    "cd \"$HOME\"/{dir} || {{ echo \"deployment directory {dir} not found\" >&2; exit {EXIT_MISSING_REMOTE_DIR}; }}"
                )),
        )
        .select(
            vec![
                Branch {
                    condition: compose_test,
                    steps: vec![
                        Step::new("Selecting compose command").run(
                            "if docker compose version >/dev/null 2>&1; then COMPOSE=\"docker compose\"; else COMPOSE=\"docker-compose\"; fi",
                        ),
                        Step::new("Stopping previous stack").run("$COMPOSE down").tolerate_failure(),
                        Step::new("Starting stack").run("$COMPOSE up -d --build"),
                    ],
                },
                Branch {
                    condition: format!("[ -f {DOCKERFILE} ]"),
                    steps: vec![
                        Step::new("Naming image")
                            .run("IMAGE=\"$(basename \"$PWD\" | tr '[:upper:]' '[:lower:]')\""),
                        Step::new("Building image").run("docker build -t \"$IMAGE\" ."),
                        Step::new("Removing previous container")
                            .run("docker rm -f \"$IMAGE\" >/dev/null 2>&1")
                            .tolerate_failure(),
                        Step::new("Starting container").run(format!(
                            "docker run -d --name \"$IMAGE\" --restart unless-stopped -p {app_port}:{app_port} \"$IMAGE\""
                        )),
                    ],
                },
            ],
            vec![
                Step::new("No build descriptor")
                    .run("echo \"no Dockerfile or docker-compose file in $PWD\" >&2")
                    .run(format!("exit {EXIT_NOTHING_TO_DEPLOY}")),
            ],
        )
        .step(Step::new("Running containers").run("docker ps"))
        .step(
            Step::new("Recent logs")
                .run(format!(
                    "docker logs --tail {LOG_TAIL_LINES} \"$(docker ps -lq)\" 2>&1"
                ))
                .tolerate_failure(),
        )
}
