//! End-to-end runs of all six phases against mocked ports.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use shipyard_cli::application::ports::LogLevel;
use shipyard_cli::application::services::input::{NoPrompt, Placement, collect_input};
use shipyard_cli::application::services::pipeline::{
    PipelineOptions, conclude_phase, finalize, run_pipeline,
};
use shipyard_cli::domain::{
    CheckoutAction, DeployDefaults, DeployError, DeploymentReport, OperatorInput, Phase, Secret,
};

use crate::mocks::{FakeFs, FakeProbe, FakeRemote, FakeVcs, RecordingLog};

const PROJECT: &str = "/srv/work/shop";

fn supplied() -> OperatorInput {
    OperatorInput {
        repo_url: Some("https://github.com/acme/shop.git".to_string()),
        credential: Some(Secret::new("ghp_s3cr3t")),
        branch: None,
        user: Some("deploy".to_string()),
        host: Some("10.0.0.5".to_string()),
        ssh_key: Some("/home/op/.ssh/id_ed25519".to_string()),
        app_port: None,
    }
}

/// Drive a run the way the deploy command does.
async fn deploy(
    input: OperatorInput,
    vcs: &FakeVcs,
    fs: &FakeFs,
    remote: &FakeRemote,
    http: &FakeProbe,
    log: &RecordingLog,
    opts: &PipelineOptions,
) -> Result<DeploymentReport, DeployError> {
    let placement = Placement {
        work_dir: PathBuf::from("/srv/work"),
        remote_dir: "app".to_string(),
        ssh_port: 22,
        home: None,
    };
    let mut passed = Vec::new();
    let collected = collect_input(&input, &DeployDefaults::default(), &NoPrompt, placement, log);
    let outcome = match conclude_phase(log, Phase::InputCollection, &mut passed, collected) {
        Ok(config) => run_pipeline(vcs, fs, remote, http, log, &config, opts, passed).await,
        Err(e) => Err(e),
    };
    finalize(log, &outcome);
    outcome
}

#[tokio::test]
async fn test_scenario_up_to_date_checkout_deploys_and_is_accessible() {
    let vcs = FakeVcs::on_branch("main");
    let fs = FakeFs::checkout(Path::new(PROJECT), &["docker-compose.yml"]);
    let remote = FakeRemote::healthy();
    let log = RecordingLog::default();

    let report = deploy(
        supplied(),
        &vcs,
        &fs,
        &remote,
        &FakeProbe::Status(200),
        &log,
        &PipelineOptions::default(),
    )
    .await
    .expect("deployment succeeds");

    assert_eq!(report.phases_passed, Phase::ALL.to_vec());
    assert_eq!(report.checkout, CheckoutAction::Updated);
    assert!(report.reachability.is_accessible());
    for phase in Phase::ALL {
        assert!(log.contains(&format!("{phase} passed")), "{phase} not logged as passed");
    }
    assert!(log.contains("Application is accessible at http://10.0.0.5:8000/"));
    assert_eq!(remote.transfers(), [(PathBuf::from(PROJECT), "app".to_string())]);
    assert!(!log.contains("ghp_s3cr3t"));
}

#[tokio::test]
async fn test_scenario_fresh_clone_then_same_phases() {
    let fs = FakeFs::with(&[Path::new(PROJECT).join("docker-compose.yml")]);
    let vcs = FakeVcs::on_branch("main").creating_in(&fs);
    let remote = FakeRemote::healthy();
    let log = RecordingLog::default();

    let report = deploy(
        supplied(),
        &vcs,
        &fs,
        &remote,
        &FakeProbe::Status(200),
        &log,
        &PipelineOptions::default(),
    )
    .await
    .expect("deployment succeeds");

    assert_eq!(report.checkout, CheckoutAction::Cloned);
    assert_eq!(report.phases_passed.len(), 6);
    assert!(vcs.calls()[0].starts_with("clone https://ghp_s3cr3t@github.com/acme/shop.git main"));
}

#[tokio::test]
async fn test_scenario_missing_descriptor_never_opens_a_session() {
    let vcs = FakeVcs::on_branch("main");
    let fs = FakeFs::checkout(Path::new(PROJECT), &["README.md"]);
    let remote = FakeRemote::healthy();
    let log = RecordingLog::default();

    let err = deploy(
        supplied(),
        &vcs,
        &fs,
        &remote,
        &FakeProbe::Status(200),
        &log,
        &PipelineOptions::default(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.exit_code(), 10);
    assert!(!remote.touched());
    assert!(log.contains("[3/6] Build-artifact verification failed"));
    let (level, last) = log.last().unwrap();
    assert_eq!(level, LogLevel::Error);
    assert!(last.contains("Deployment failed (precondition)"), "got: {last}");
    assert!(last.contains("(exit code 10)"));
}

#[tokio::test]
async fn test_scenario_closed_port_still_succeeds_but_logs_not_accessible() {
    let vcs = FakeVcs::on_branch("main");
    let fs = FakeFs::checkout(Path::new(PROJECT), &["Dockerfile"]);
    let remote = FakeRemote::healthy();
    let log = RecordingLog::default();

    let report = deploy(
        supplied(),
        &vcs,
        &fs,
        &remote,
        &FakeProbe::Refused,
        &log,
        &PipelineOptions::default(),
    )
    .await
    .expect("probe failure is not fatal");

    assert!(!report.reachability.is_accessible());
    let (level, last) = log.last().unwrap();
    assert_eq!(level, LogLevel::Success);
    assert!(last.contains("not accessible"), "got: {last}");
}

#[tokio::test]
async fn test_http_error_status_is_not_accessible() {
    let vcs = FakeVcs::on_branch("main");
    let fs = FakeFs::checkout(Path::new(PROJECT), &["Dockerfile"]);
    let log = RecordingLog::default();

    let report = deploy(
        supplied(),
        &vcs,
        &fs,
        &FakeRemote::healthy(),
        &FakeProbe::Status(502),
        &log,
        &PipelineOptions::default(),
    )
    .await
    .expect("deployment succeeds");

    assert!(!report.reachability.is_accessible());
    assert!(log.contains("HTTP 502"));
}

#[tokio::test]
async fn test_missing_input_has_no_side_effects() {
    let vcs = FakeVcs::on_branch("main");
    let fs = FakeFs::checkout(Path::new(PROJECT), &["Dockerfile"]);
    let remote = FakeRemote::healthy();
    let input = OperatorInput {
        host: None,
        ..supplied()
    };

    let err = deploy(
        input,
        &vcs,
        &fs,
        &remote,
        &FakeProbe::Status(200),
        &RecordingLog::default(),
        &PipelineOptions::default(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.exit_code(), 4);
    assert!(vcs.calls().is_empty());
    assert!(!remote.touched());
}

#[tokio::test]
async fn test_unreachable_host_skips_provisioning_and_deployment() {
    let remote = FakeRemote::unreachable();
    let err = deploy(
        supplied(),
        &FakeVcs::on_branch("main"),
        &FakeFs::checkout(Path::new(PROJECT), &["Dockerfile"]),
        &remote,
        &FakeProbe::Status(200),
        &RecordingLog::default(),
        &PipelineOptions::default(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.exit_code(), 11);
    assert!(remote.scripts().is_empty());
    assert!(remote.transfers().is_empty());
}

#[tokio::test]
async fn test_provisioning_failure_stops_before_transfer() {
    let remote = FakeRemote::healthy().failing_provision();
    let log = RecordingLog::default();
    let err = deploy(
        supplied(),
        &FakeVcs::on_branch("main"),
        &FakeFs::checkout(Path::new(PROJECT), &["Dockerfile"]),
        &remote,
        &FakeProbe::Status(200),
        &log,
        &PipelineOptions::default(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.exit_code(), 12);
    assert!(err.to_string().contains("Unable to locate package"));
    assert!(remote.transfers().is_empty());
    assert!(log.contains("remote: Refreshing package index"));
}

#[tokio::test]
async fn test_provisioning_output_reports_installed_versions() {
    let log = RecordingLog::default();
    deploy(
        supplied(),
        &FakeVcs::on_branch("main"),
        &FakeFs::checkout(Path::new(PROJECT), &["Dockerfile"]),
        &FakeRemote::healthy(),
        &FakeProbe::Status(200),
        &log,
        &PipelineOptions::default(),
    )
    .await
    .expect("deployment succeeds");

    assert!(log.contains("Docker version 27.1.1"));
}

#[tokio::test]
async fn test_skip_provision_sends_only_the_deploy_batch() {
    let remote = FakeRemote::healthy();
    let log = RecordingLog::default();
    let opts = PipelineOptions {
        skip_provision: true,
        ..PipelineOptions::default()
    };

    let report = deploy(
        supplied(),
        &FakeVcs::on_branch("main"),
        &FakeFs::checkout(Path::new(PROJECT), &["docker-compose.yml"]),
        &remote,
        &FakeProbe::Status(200),
        &log,
        &opts,
    )
    .await
    .expect("deployment succeeds");

    assert!(report.provisioning_skipped);
    assert!(!report.phases_passed.contains(&Phase::EnvironmentPreparation));
    let scripts = remote.scripts();
    assert_eq!(scripts.len(), 1);
    assert!(scripts[0].contains("# shipyard: deploy application"));
    assert!(log.contains("[5/6] Remote environment preparation skipped"));
}

#[tokio::test]
async fn test_transfer_failure_is_deployment_failure() {
    let remote = FakeRemote::healthy().failing_transfer();
    let err = deploy(
        supplied(),
        &FakeVcs::on_branch("main"),
        &FakeFs::checkout(Path::new(PROJECT), &["Dockerfile"]),
        &remote,
        &FakeProbe::Status(200),
        &RecordingLog::default(),
        &PipelineOptions::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, DeployError::TransferFailed { .. }));
    assert_eq!(err.exit_code(), 13);
    assert_eq!(remote.scripts().len(), 1, "deploy batch must not run");
}

#[tokio::test]
async fn test_remote_without_descriptor_is_nothing_to_deploy() {
    let remote = FakeRemote::healthy().deploy_exit(42, "==> No build descriptor\n");
    let err = deploy(
        supplied(),
        &FakeVcs::on_branch("main"),
        &FakeFs::checkout(Path::new(PROJECT), &["Dockerfile"]),
        &remote,
        &FakeProbe::Status(200),
        &RecordingLog::default(),
        &PipelineOptions::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, DeployError::NothingToDeploy(ref dir) if dir == "app"));
    assert_eq!(err.exit_code(), 14);
}

#[tokio::test]
async fn test_missing_remote_directory_is_deploy_failure() {
    let remote = FakeRemote::healthy().deploy_exit(43, "==> Entering deployment directory\n");
    let err = deploy(
        supplied(),
        &FakeVcs::on_branch("main"),
        &FakeFs::checkout(Path::new(PROJECT), &["Dockerfile"]),
        &remote,
        &FakeProbe::Status(200),
        &RecordingLog::default(),
        &PipelineOptions::default(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.exit_code(), 13);
    assert!(err.to_string().contains("~/app is missing"));
}

#[tokio::test]
async fn test_build_failure_surfaces_remote_stderr() {
    let remote = FakeRemote::healthy().deploy_exit(1, "==> Building image\n");
    let log = RecordingLog::default();
    let err = deploy(
        supplied(),
        &FakeVcs::on_branch("main"),
        &FakeFs::checkout(Path::new(PROJECT), &["Dockerfile"]),
        &remote,
        &FakeProbe::Status(200),
        &log,
        &PipelineOptions::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, DeployError::RemoteDeployFailed(ref d) if d == "build failed"));
    assert!(log.contains("remote: Building image"));
    assert!(log.contains("[6/6] Application deployment failed"));
}
