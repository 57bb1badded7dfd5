//! End-to-end tests for the harness against a real Docker daemon.
//!
//! These require a running daemon and network access to pull `alpine`, and
//! are marked `#[ignore]`. They change the process working directory (the
//! build context is always the invoking directory), so run them serialized:
//! `cargo test -- --ignored --test-threads=1`

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use wtree_itest::config::Config;
use wtree_itest::docker::{CancelToken, DockerCli};
use wtree_itest::harness::{Harness, RunPlan, RunStatus};

static CWD_LOCK: Mutex<()> = Mutex::new(());

const DOCKERFILE: &str = "FROM alpine:3.20\nENTRYPOINT [\"/bin/sh\"]\n";

/// Restores the original working directory when dropped.
struct CwdGuard {
    original: PathBuf,
}

impl CwdGuard {
    fn enter(dir: &Path) -> Self {
        let original = std::env::current_dir().expect("failed to read cwd");
        std::env::set_current_dir(dir).expect("failed to enter workdir");
        Self { original }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Write a Dockerfile and test script into a fresh tempdir.
fn setup_workdir(script_body: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("failed to create tempdir");
    std::fs::write(dir.path().join("Dockerfile"), DOCKERFILE).expect("failed to write Dockerfile");
    std::fs::write(dir.path().join("itest.sh"), script_body).expect("failed to write script");
    dir
}

fn test_config(tag: &str) -> Config {
    Config {
        image_name: format!("wtree-itest-e2e-{}-{tag}", std::process::id()),
        test_script: "itest.sh".into(),
        container_script_path: "/itest.sh".into(),
        shell: "sh".into(),
        docker_timeout: 120,
        ..Config::default()
    }
}

fn remove_test_image(cfg: &Config) {
    Harness::new(cfg.clone(), DockerCli, CancelToken::new()).remove_image();
}

#[test]
#[ignore]
fn full_suite_passes_with_trivial_script() {
    let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = setup_workdir("echo integration ok\nexit 0\n");
    let _cwd = CwdGuard::enter(dir.path());

    let cfg = test_config("pass");
    let harness = Harness::new(cfg.clone(), DockerCli, CancelToken::new());
    let status = harness
        .run_suite(&RunPlan {
            build: true,
            test: true,
        })
        .expect("suite should run");

    assert_eq!(status, RunStatus::Passed);
    remove_test_image(&cfg);
}

#[test]
#[ignore]
fn failing_script_reports_failure() {
    let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = setup_workdir("echo about to fail\nexit 3\n");
    let _cwd = CwdGuard::enter(dir.path());

    let cfg = test_config("fail");
    let harness = Harness::new(cfg.clone(), DockerCli, CancelToken::new());
    let status = harness
        .run_suite(&RunPlan {
            build: true,
            test: true,
        })
        .expect("suite should run");

    assert_eq!(status, RunStatus::Failed);
    remove_test_image(&cfg);
}

#[test]
#[ignore]
fn broken_dockerfile_aborts_the_suite() {
    let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = setup_workdir("exit 0\n");
    std::fs::write(dir.path().join("Dockerfile"), "FROM alpine:3.20\nNOT_AN_INSTRUCTION x\n")
        .expect("failed to overwrite Dockerfile");
    let _cwd = CwdGuard::enter(dir.path());

    let cfg = test_config("broken");
    let harness = Harness::new(cfg, DockerCli, CancelToken::new());
    let result = harness.run_suite(&RunPlan {
        build: true,
        test: true,
    });

    assert!(result.is_err(), "build failure should abort the suite");
}

#[test]
#[ignore]
fn build_only_leaves_an_image_behind() {
    let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = setup_workdir("exit 0\n");
    let _cwd = CwdGuard::enter(dir.path());

    let cfg = test_config("buildonly");
    let harness = Harness::new(cfg.clone(), DockerCli, CancelToken::new());
    let status = harness
        .run_suite(&RunPlan {
            build: true,
            test: false,
        })
        .expect("build should run");
    assert_eq!(status, RunStatus::Passed);

    // The image exists and is removable; remove_image never escalates.
    remove_test_image(&cfg);
}
