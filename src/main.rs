use anyhow::Result;
use clap::Parser;
use tracing::{error, warn};

use wtree_itest::cli::Cli;
use wtree_itest::config::{self, Config};
use wtree_itest::docker::{self, CancelToken, DockerCli};
use wtree_itest::harness::{Action, Harness, RunStatus, plan};
use wtree_itest::signal;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    std::process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let cfg = match load_config(cli) {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("{err:#}");
            return 1;
        }
    };

    if let Err(err) = docker::ensure_available() {
        error!("{err:#}");
        return 1;
    }

    let cancel = CancelToken::new();
    signal::install(&cancel);

    let harness = Harness::new(cfg, DockerCli, cancel);

    match plan(cli) {
        Action::ListImages => match harness.list_images() {
            Ok(()) => 0,
            Err(err) => {
                error!("{err:#}");
                1
            }
        },
        Action::RemoveImage => {
            harness.remove_image();
            0
        }
        Action::Run(run_plan) => match harness.run_suite(&run_plan) {
            Ok(RunStatus::Interrupted) => {
                warn!("Interrupted by user");
                RunStatus::Interrupted.exit_code()
            }
            Ok(status) => status.exit_code(),
            Err(err) => {
                error!("{err:#}");
                // The run aborted mid-sequence; release the container if the
                // test phase hadn't already done so.
                harness.cleanup();
                1
            }
        },
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut cfg = match &cli.config {
        Some(path) => config::load_path(path)?,
        None => {
            let cwd = std::env::current_dir()?;
            config::load(&cwd)?.unwrap_or_default()
        }
    };
    cli.apply(&mut cfg);
    Ok(cfg)
}
