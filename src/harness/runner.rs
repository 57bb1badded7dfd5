use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, bail};
use chrono::Local;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::docker::{CancelToken, Docker};

use super::commands;
use super::types::{RunPlan, RunStatus};

/// Owns one build/run/cleanup cycle against a uniquely named container.
pub struct Harness<D: Docker> {
    cfg: Config,
    docker: D,
    cancel: CancelToken,
    container: String,
    cleaned: AtomicBool,
}

/// Scoped release of the container: dropping the guard runs cleanup, so it
/// fires on every exit path out of the test phase, early returns and `?`
/// included.
struct CleanupGuard<'a, D: Docker> {
    harness: &'a Harness<D>,
}

impl<D: Docker> Drop for CleanupGuard<'_, D> {
    fn drop(&mut self) {
        self.harness.cleanup();
    }
}

impl<D: Docker> Harness<D> {
    pub fn new(cfg: Config, docker: D, cancel: CancelToken) -> Self {
        let container = commands::container_name(&cfg.image_name, Local::now());
        Self {
            cfg,
            docker,
            cancel,
            container,
            cleaned: AtomicBool::new(false),
        }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// Run the build/test sequence. Every phase talks to Docker exactly once;
    /// there are no retries anywhere.
    pub fn run_suite(&self, plan: &RunPlan) -> Result<RunStatus> {
        if plan.build {
            self.build()?;
            if self.cancel.is_cancelled() {
                // Interrupted before any container existed; the cleanup
                // contract still runs (and is benign here).
                self.cleanup();
                return Ok(RunStatus::Interrupted);
            }
        }

        if !plan.test {
            return Ok(RunStatus::Passed);
        }

        let _guard = CleanupGuard { harness: self };
        let passed = self.run_tests()?;
        if self.cancel.is_cancelled() {
            return Ok(RunStatus::Interrupted);
        }
        Ok(if passed {
            RunStatus::Passed
        } else {
            RunStatus::Failed
        })
    }

    fn build(&self) -> Result<()> {
        info!("Building Docker image...");
        let cmd = commands::build_command(&self.cfg);
        debug!("running: docker {}", cmd.args.join(" "));

        if self.cfg.verbose {
            let outcome = self.docker.stream(&cmd, &self.cancel)?;
            if outcome.cancelled {
                return Ok(());
            }
            if outcome.timed_out {
                bail!("docker build timed out after {}s", self.cfg.docker_timeout);
            }
            if !outcome.success() {
                bail!("docker build failed ({})", describe_exit(outcome.exit_code));
            }
        } else {
            let captured = self.docker.capture(&cmd, &self.cancel)?;
            if captured.cancelled {
                return Ok(());
            }
            if captured.timed_out {
                bail!("docker build timed out after {}s", self.cfg.docker_timeout);
            }
            if !captured.success() {
                error!("Command failed: docker {}", cmd.args.join(" "));
                if !captured.stdout.is_empty() {
                    println!("STDOUT: {}", captured.stdout);
                }
                if !captured.stderr.is_empty() {
                    eprintln!("STDERR: {}", captured.stderr);
                }
                bail!("docker build failed ({})", describe_exit(captured.exit_code));
            }
        }

        info!("Docker image '{}' built successfully", self.cfg.image_name);
        Ok(())
    }

    fn run_tests(&self) -> Result<bool> {
        info!("Starting test container...");

        let script = std::path::absolute(&self.cfg.test_script)
            .with_context(|| format!("failed to resolve test script {}", self.cfg.test_script))?;
        let extra = self.cfg.resolved_run_args()?;
        let cmd = commands::test_command(&self.cfg, &self.container, &script, &extra);
        debug!("running: docker {}", cmd.args.join(" "));

        // Output is streamed, not captured, so the caller sees live progress.
        let outcome = self.docker.stream(&cmd, &self.cancel)?;
        if outcome.cancelled {
            return Ok(false);
        }
        if outcome.timed_out {
            error!("Tests timed out after {}s", self.cfg.docker_timeout);
            return Ok(false);
        }

        if outcome.success() {
            info!("Tests completed successfully");
            Ok(true)
        } else {
            error!("Tests failed");
            Ok(false)
        }
    }

    /// Best-effort stop-then-remove of the named container. Runs at most once
    /// per harness; failures are swallowed since the container may
    /// legitimately not exist.
    pub fn cleanup(&self) {
        if self.cleaned.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("Cleaning up...");

        // A tripped interrupt token must not kill the cleanup commands.
        let cancel = CancelToken::new();
        for cmd in [
            commands::stop_command(&self.cfg, &self.container),
            commands::remove_container_command(&self.cfg, &self.container),
        ] {
            debug!("running: docker {}", cmd.args.join(" "));
            if let Ok(captured) = self.docker.capture(&cmd, &cancel)
                && captured.success()
                && self.cfg.verbose
                && !captured.stdout.is_empty()
            {
                print!("{}", captured.stdout);
            }
        }
    }

    /// Print the image table for this tool's images. Pure passthrough.
    pub fn list_images(&self) -> Result<()> {
        let cmd = commands::list_images_command(&self.cfg);
        debug!("running: docker {}", cmd.args.join(" "));

        let captured = self.docker.capture(&cmd, &self.cancel)?;
        if !captured.success() {
            if !captured.stderr.is_empty() {
                eprintln!("STDERR: {}", captured.stderr);
            }
            bail!("docker images failed ({})", describe_exit(captured.exit_code));
        }
        print!("{}", captured.stdout);
        Ok(())
    }

    /// Remove the image. Failure is logged, never escalated.
    pub fn remove_image(&self) {
        info!("Removing Docker image '{}'...", self.cfg.image_name);
        let cmd = commands::remove_image_command(&self.cfg);
        debug!("running: docker {}", cmd.args.join(" "));

        match self.docker.capture(&cmd, &self.cancel) {
            Ok(captured) if captured.success() => {
                if self.cfg.verbose && !captured.stdout.is_empty() {
                    print!("{}", captured.stdout);
                }
                info!("Image removed successfully");
            }
            Ok(captured) => {
                if !captured.stderr.is_empty() {
                    eprintln!("STDERR: {}", captured.stderr);
                }
                error!("Failed to remove image");
            }
            Err(err) => error!("Failed to remove image: {err:#}"),
        }
    }
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit {code}"),
        None => "killed by signal".to_string(),
    }
}
