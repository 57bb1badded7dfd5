use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Cooperative cancellation token backed by an `AtomicBool`.
///
/// The SIGINT handler trips it; the execution poll loops observe it and kill
/// the child process.
#[derive(Debug, Clone)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// A fully assembled `docker` invocation: the argument list after the program
/// name, plus an upper bound on how long it may run.
#[derive(Debug, Clone)]
pub struct DockerCommand {
    pub args: Vec<String>,
    pub timeout: Duration,
}

/// Outcome of a captured invocation (stdout/stderr drained into strings).
#[derive(Debug)]
pub struct Captured {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub cancelled: bool,
    pub timed_out: bool,
}

impl Captured {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0) && !self.cancelled && !self.timed_out
    }
}

/// Outcome of a streamed invocation (stdio inherited by the caller's terminal).
#[derive(Debug)]
pub struct StreamOutcome {
    pub exit_code: Option<i32>,
    pub cancelled: bool,
    pub timed_out: bool,
}

impl StreamOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0) && !self.cancelled && !self.timed_out
    }
}
