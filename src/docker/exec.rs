use anyhow::Result;

use super::run;
use super::types::{CancelToken, Captured, DockerCommand, StreamOutcome};

/// Boundary trait for issuing docker invocations.
///
/// The harness talks to Docker only through this trait, so its sequencing can
/// be exercised in tests with a recording stub instead of a live daemon. The
/// token is per call: the cleanup path runs with a fresh one so that an
/// already-tripped interrupt cannot kill the cleanup commands themselves.
pub trait Docker {
    /// Run to completion with output captured.
    fn capture(&self, cmd: &DockerCommand, cancel: &CancelToken) -> Result<Captured>;

    /// Run with stdio inherited so output reaches the terminal live.
    fn stream(&self, cmd: &DockerCommand, cancel: &CancelToken) -> Result<StreamOutcome>;
}

/// Production executor: shells out to the `docker` binary on PATH.
pub struct DockerCli;

impl Docker for DockerCli {
    fn capture(&self, cmd: &DockerCommand, cancel: &CancelToken) -> Result<Captured> {
        run::capture(cmd, cancel)
    }

    fn stream(&self, cmd: &DockerCommand, cancel: &CancelToken) -> Result<StreamOutcome> {
        run::stream(cmd, cancel)
    }
}
