use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Runner settings beyond the flag surface.
///
/// Every field has a default matching the conventional git-wtree test layout,
/// so a bare checkout needs no config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tag for the built image and prefix for container names.
    pub image_name: String,
    /// Build-definition file, relative to the working directory.
    pub dockerfile: String,
    /// Host-side test script, mounted read-only into the container.
    pub test_script: String,
    /// Where the test script appears inside the container.
    pub container_script_path: String,
    /// Interpreter that executes the script inside the container.
    pub shell: String,
    /// Upper bound in seconds on any single docker invocation.
    pub docker_timeout: u64,
    /// Extra arguments spliced into `docker run` before the image name,
    /// written as one shell-quoted string (e.g. `"--network host"`).
    pub extra_run_args: Option<String>,
    /// Stream build output instead of capturing it.
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_name: "git-wtree-test".to_string(),
            dockerfile: "Dockerfile".to_string(),
            test_script: "tests/integration_test.fish".to_string(),
            container_script_path: "/home/testuser/integration_test.fish".to_string(),
            shell: "fish".to_string(),
            docker_timeout: 600,
            extra_run_args: None,
            verbose: false,
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.docker_timeout)
    }

    /// Split `extra_run_args` into an argv fragment. Empty when unset.
    pub fn resolved_run_args(&self) -> Result<Vec<String>> {
        match &self.extra_run_args {
            Some(raw) => shell_words::split(raw)
                .with_context(|| format!("invalid extra_run_args: {raw:?}")),
            None => Ok(Vec::new()),
        }
    }

    /// The command line handed to the in-container interpreter.
    pub fn container_command(&self) -> String {
        format!("{} {}", self.shell, self.container_script_path)
    }
}
