use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};

use super::types::{CancelToken, Captured, DockerCommand, StreamOutcome};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Verify that the Docker daemon is reachable before any phase starts.
pub fn ensure_available() -> Result<()> {
    let status = Command::new("docker")
        .args(["version", "--format", "{{.Server.Version}}"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .context("failed to invoke `docker` — is it installed and on PATH?")?;

    if !status.success() {
        bail!("docker daemon is not running (exit {})", status);
    }
    Ok(())
}

/// Run a docker invocation to completion with stdout/stderr captured.
///
/// Output is drained on reader threads so a chatty child can never fill the
/// pipe and deadlock against the wait loop.
pub fn capture(cmd: &DockerCommand, cancel: &CancelToken) -> Result<Captured> {
    let mut child = Command::new("docker")
        .args(&cmd.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn `docker {}`", cmd.args.join(" ")))?;

    let stdout = child.stdout.take().expect("stdout was piped");
    let stderr = child.stderr.take().expect("stderr was piped");

    let stdout_handle = std::thread::spawn(move || read_to_string_lossy(stdout));
    let stderr_handle = std::thread::spawn(move || read_to_string_lossy(stderr));

    let wait = wait_with_cancel(&mut child, cancel, cmd.timeout);

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();

    Ok(Captured {
        exit_code: wait.status.and_then(|s| s.code()),
        stdout,
        stderr,
        cancelled: wait.cancelled,
        timed_out: wait.timed_out,
    })
}

/// Run a docker invocation with stdout/stderr inherited, so the caller's
/// terminal sees output as it is produced.
pub fn stream(cmd: &DockerCommand, cancel: &CancelToken) -> Result<StreamOutcome> {
    let mut child = Command::new("docker")
        .args(&cmd.args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .with_context(|| format!("failed to spawn `docker {}`", cmd.args.join(" ")))?;

    let wait = wait_with_cancel(&mut child, cancel, cmd.timeout);

    Ok(StreamOutcome {
        exit_code: wait.status.and_then(|s| s.code()),
        cancelled: wait.cancelled,
        timed_out: wait.timed_out,
    })
}

struct WaitOutcome {
    status: Option<ExitStatus>,
    cancelled: bool,
    timed_out: bool,
}

/// Poll the child until it exits, the token fires, or the timeout expires.
/// Cancellation and timeout both kill the child and reap it.
fn wait_with_cancel(child: &mut Child, cancel: &CancelToken, timeout: Duration) -> WaitOutcome {
    let start = Instant::now();
    let mut cancelled = false;
    let mut timed_out = false;

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break Some(status),
            Ok(None) => {}
            Err(_) => break None,
        }

        if cancel.is_cancelled() {
            cancelled = true;
            let _ = child.kill();
            let _ = child.wait();
            break None;
        }

        if start.elapsed() > timeout {
            timed_out = true;
            let _ = child.kill();
            let _ = child.wait();
            break None;
        }

        std::thread::sleep(POLL_INTERVAL);
    };

    WaitOutcome {
        status,
        cancelled,
        timed_out,
    }
}

fn read_to_string_lossy(mut source: impl Read) -> String {
    let mut buf = Vec::new();
    let _ = source.read_to_end(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}
