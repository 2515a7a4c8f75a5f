//! `shipyard deploy`: run the six deployment phases against one host.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::Local;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::RunLog;
use crate::application::services::input::{NoPrompt, Placement, collect_input};
use crate::application::services::pipeline::{
    PipelineOptions, conclude_phase, finalize, run_pipeline,
};
use crate::domain::config::{DEFAULT_REMOTE_DIR, DEFAULT_SSH_PORT, expand_home};
use crate::domain::{
    CheckoutAction, DeployDefaults, DeployError, DeploymentConfig, DeploymentReport, OperatorInput,
    Phase, Secret,
};
use crate::infra::config::YamlConfigStore;
use crate::infra::fs::LocalFs;
use crate::infra::git::GitCli;
use crate::infra::network::UreqProbe;
use crate::infra::prompt::DialoguerPrompter;
use crate::infra::run_log::FileRunLog;
use crate::infra::ssh::{OpenSsh, SshTarget};
use crate::output::{OutputContext, TerminalReporter, json};

/// Default log directory, relative to the local home.
pub const DEFAULT_LOG_DIR: &str = "~/.shipyard/logs";

#[derive(Args, Default)]
pub struct DeployArgs {
    /// Git repository URL
    #[arg(long, env = "SHIPYARD_REPO_URL")]
    pub repo_url: Option<String>,

    /// Access token for the repository
    #[arg(long, env = "SHIPYARD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Branch to deploy [default: main]
    #[arg(long, env = "SHIPYARD_BRANCH")]
    pub branch: Option<String>,

    /// Remote username
    #[arg(long, env = "SHIPYARD_USER")]
    pub user: Option<String>,

    /// Remote host address
    #[arg(long, env = "SHIPYARD_HOST")]
    pub host: Option<String>,

    /// SSH private key path
    #[arg(long, env = "SHIPYARD_SSH_KEY")]
    pub key: Option<String>,

    /// Application port [default: 8000]
    #[arg(long, env = "SHIPYARD_APP_PORT")]
    pub port: Option<String>,

    /// Local working directory the repository is checked out under [default: .]
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    /// Deployment directory, relative to the remote home [default: app]
    #[arg(long)]
    pub remote_dir: Option<String>,

    /// SSH port of the remote host [default: 22]
    #[arg(long)]
    pub ssh_port: Option<u16>,

    /// Directory for run log files [default: ~/.shipyard/logs]
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Skip remote environment preparation on hosts known to be prepared
    #[arg(long)]
    pub skip_provision: bool,

    /// Config file [default: $SHIPYARD_CONFIG or ~/.shipyard/config.yaml]
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl DeployArgs {
    /// Prompt-field answers supplied by flags or environment.
    #[must_use]
    pub fn operator_input(&self) -> OperatorInput {
        OperatorInput {
            repo_url: self.repo_url.clone(),
            credential: self.token.clone().map(Secret::new),
            branch: self.branch.clone(),
            user: self.user.clone(),
            host: self.host.clone(),
            ssh_key: self.key.clone(),
            app_port: self.port.clone(),
        }
    }

    /// Placement settings: flag, then config file, then built-in default.
    ///
    /// # Errors
    ///
    /// Returns an error if no working directory is given and the current
    /// directory cannot be read.
    pub fn placement(
        &self,
        defaults: &DeployDefaults,
        home: Option<&Path>,
    ) -> anyhow::Result<Placement> {
        let work_dir = match self.work_dir.clone().or_else(|| defaults.work_dir.clone()) {
            Some(dir) => expand_home(&dir.to_string_lossy(), home),
            None => std::env::current_dir().context("cannot read current directory")?,
        };
        Ok(Placement {
            work_dir,
            remote_dir: self
                .remote_dir
                .clone()
                .or_else(|| defaults.remote_dir.clone())
                .unwrap_or_else(|| DEFAULT_REMOTE_DIR.to_string()),
            ssh_port: self.ssh_port.or(defaults.ssh_port).unwrap_or(DEFAULT_SSH_PORT),
            home: home.map(Path::to_path_buf),
        })
    }

    /// Log directory: flag, then config file, then `~/.shipyard/logs`.
    #[must_use]
    pub fn log_dir(&self, defaults: &DeployDefaults, home: Option<&Path>) -> PathBuf {
        match self.log_dir.clone().or_else(|| defaults.log_dir.clone()) {
            Some(dir) => expand_home(&dir.to_string_lossy(), home),
            None => expand_home(DEFAULT_LOG_DIR, home),
        }
    }
}

/// Run the deploy command and print its summary.
///
/// # Errors
///
/// Returns the `DeployError` that stopped the run. It has already been
/// written to the run log and the terminal.
pub async fn run(app: &AppContext, args: &DeployArgs) -> Result<(), DeployError> {
    let outcome = execute(app, args).await;
    match &outcome {
        Ok(report) if app.is_json() => println!("{}", json::format_report(report)?),
        Ok(report) => print_summary(&app.output, report),
        Err(e) if app.is_json() => println!("{}", json::format_error(e)?),
        Err(_) => {}
    }
    outcome.map(|_| ())
}

async fn execute(app: &AppContext, args: &DeployArgs) -> Result<DeploymentReport, DeployError> {
    let started = Local::now();
    let home = dirs::home_dir();
    let terminal = TerminalReporter::new(&app.output);

    let store = YamlConfigStore::new(args.config.clone());
    let defaults = store.load().map_err(|e| {
        let e = DeployError::from(e);
        terminal.error(&format!("{e} (exit code {})", e.exit_code()));
        e
    })?;

    let file_log = FileRunLog::create(&args.log_dir(&defaults, home.as_deref()), &started)
        .map_err(|e| {
            let e = DeployError::from(e);
            terminal.error(&format!("{e} (exit code {})", e.exit_code()));
            e
        })?;
    let log_file = file_log.path().to_path_buf();
    let log = (file_log, terminal);
    log.info(&format!("Deployment run started; logging to {}", log_file.display()));

    let outcome = run_phases(app, args, &defaults, home.as_deref(), &log, log_file).await;
    finalize(&log, &outcome);
    outcome
}

async fn run_phases(
    app: &AppContext,
    args: &DeployArgs,
    defaults: &DeployDefaults,
    home: Option<&Path>,
    log: &impl RunLog,
    log_file: PathBuf,
) -> Result<DeploymentReport, DeployError> {
    let mut passed = Vec::with_capacity(Phase::ALL.len());

    log.info(&format!("{} started", Phase::InputCollection));
    let collected = gather(app, args, defaults, home, log);
    let config = conclude_phase(log, Phase::InputCollection, &mut passed, collected)?;
    log.info(&format!(
        "Deploying branch '{}' to {}:~/{}",
        config.branch,
        config.target(),
        config.remote_dir
    ));

    let opts = PipelineOptions {
        skip_provision: args.skip_provision,
        log_file: Some(log_file),
        ..PipelineOptions::default()
    };
    let remote = OpenSsh::default_runner(SshTarget::from_config(&config));
    run_pipeline(
        &GitCli::default_runner(),
        &LocalFs,
        &remote,
        &UreqProbe,
        log,
        &config,
        &opts,
        passed,
    )
    .await
}

fn gather(
    app: &AppContext,
    args: &DeployArgs,
    defaults: &DeployDefaults,
    home: Option<&Path>,
    log: &impl RunLog,
) -> Result<DeploymentConfig, DeployError> {
    let placement = args.placement(defaults, home)?;
    let supplied = args.operator_input();
    if app.non_interactive {
        collect_input(&supplied, defaults, &NoPrompt, placement, log)
    } else {
        collect_input(&supplied, defaults, &DialoguerPrompter, placement, log)
    }
}

fn print_summary(ctx: &OutputContext, report: &DeploymentReport) {
    if ctx.quiet {
        return;
    }
    println!();
    ctx.header("Deployment summary");
    ctx.kv(
        "Phases passed:",
        &format!("{}/{}", report.phases_passed.len(), Phase::ALL.len()),
    );
    ctx.kv("Checkout:     ", checkout_label(report));
    ctx.kv("Descriptor:   ", report.descriptor.file_name());
    ctx.kv(
        "Runtime:      ",
        if report.provisioning_skipped {
            "preparation skipped"
        } else if report.runtime_preinstalled {
            "already installed"
        } else {
            "installed during this run"
        },
    );
    ctx.kv("Reachability: ", &report.reachability.to_string());
    if let Some(path) = &report.log_file {
        ctx.kv("Log file:     ", &path.display().to_string());
    }
}

fn checkout_label(report: &DeploymentReport) -> &'static str {
    match report.checkout {
        CheckoutAction::Cloned => "cloned",
        CheckoutAction::Updated => "updated",
    }
}
