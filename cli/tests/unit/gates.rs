//! Phases 3 and 4: the build-descriptor and connectivity gates.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use shipyard_cli::application::services::artifacts::verify_build_descriptor;
use shipyard_cli::application::services::connectivity::check_connectivity;
use shipyard_cli::domain::{BuildDescriptor, DeployError};

use crate::mocks::{FakeFs, FakeRemote, RecordingLog};

const PROJECT: &str = "/srv/work/shop";

#[test]
fn test_compose_file_wins_over_dockerfile() {
    let fs = FakeFs::checkout(Path::new(PROJECT), &["Dockerfile", "docker-compose.yaml"]);
    let found = verify_build_descriptor(&fs, Path::new(PROJECT), &RecordingLog::default())
        .expect("descriptor");
    assert_eq!(found, BuildDescriptor::Compose("docker-compose.yaml"));
}

#[test]
fn test_dockerfile_alone_is_accepted() {
    let fs = FakeFs::checkout(Path::new(PROJECT), &["Dockerfile"]);
    let log = RecordingLog::default();
    let found = verify_build_descriptor(&fs, Path::new(PROJECT), &log).expect("descriptor");
    assert_eq!(found, BuildDescriptor::Dockerfile);
    assert!(log.contains("Found Dockerfile"));
}

#[test]
fn test_missing_descriptor_is_fatal() {
    let fs = FakeFs::checkout(Path::new(PROJECT), &["README.md", "compose.yml"]);
    let err = verify_build_descriptor(&fs, Path::new(PROJECT), &RecordingLog::default())
        .unwrap_err();
    assert!(matches!(err, DeployError::MissingBuildDescriptor(_)));
    assert_eq!(err.exit_code(), 10);
}

#[tokio::test]
async fn test_reachable_host_reports_existing_runtime() {
    let remote = FakeRemote::healthy();
    let present = check_connectivity(&remote, &RecordingLog::default())
        .await
        .expect("reachable");
    assert!(present);
    assert_eq!(remote.commands(), ["echo shipyard-ack", "command -v docker"]);
}

#[tokio::test]
async fn test_missing_runtime_is_not_fatal() {
    let remote = FakeRemote::healthy().without_docker();
    let log = RecordingLog::default();
    let present = check_connectivity(&remote, &log).await.expect("reachable");
    assert!(!present);
    assert!(log.contains("not installed"));
}

#[tokio::test]
async fn test_unreachable_host_is_fatal_with_detail() {
    let remote = FakeRemote::unreachable();
    let err = check_connectivity(&remote, &RecordingLog::default())
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), 11);
    assert!(err.to_string().contains("Connection refused"));
    assert_eq!(remote.commands().len(), 1, "runtime probe must not run");
}
