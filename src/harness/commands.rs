use std::path::Path;

use chrono::{DateTime, Local};

use crate::config::Config;
use crate::docker::DockerCommand;

/// Derive the container name from the image name and a timestamp.
/// Two harness instances created more than a second apart never collide.
pub fn container_name(image: &str, now: DateTime<Local>) -> String {
    format!("{image}-{}", now.format("%Y%m%d%H%M%S"))
}

/// Build a `docker build` command against the configured Dockerfile.
pub fn build_command(cfg: &Config) -> DockerCommand {
    let mut args = vec![
        "build".into(),
        "-t".into(),
        cfg.image_name.clone(),
        "-f".into(),
        cfg.dockerfile.clone(),
        ".".into(),
    ];
    if cfg.verbose {
        args.push("--progress=plain".into());
    }

    DockerCommand {
        args,
        timeout: cfg.timeout(),
    }
}

/// Build the `docker run` command that mounts the test script read-only and
/// executes it through the configured interpreter.
pub fn test_command(
    cfg: &Config,
    container: &str,
    script: &Path,
    extra_args: &[String],
) -> DockerCommand {
    let mut args = vec![
        "run".into(),
        "--rm".into(),
        "--name".into(),
        container.to_string(),
        "-v".into(),
        format!("{}:{}:ro", script.display(), cfg.container_script_path),
    ];
    args.extend(extra_args.iter().cloned());
    args.extend([
        cfg.image_name.clone(),
        "-c".into(),
        cfg.container_command(),
    ]);

    DockerCommand {
        args,
        timeout: cfg.timeout(),
    }
}

pub fn stop_command(cfg: &Config, container: &str) -> DockerCommand {
    DockerCommand {
        args: vec!["stop".into(), container.to_string()],
        timeout: cfg.timeout(),
    }
}

pub fn remove_container_command(cfg: &Config, container: &str) -> DockerCommand {
    DockerCommand {
        args: vec!["rm".into(), "-f".into(), container.to_string()],
        timeout: cfg.timeout(),
    }
}

/// List images whose reference starts with the configured image name,
/// formatted as a table. The output is printed verbatim, never parsed.
pub fn list_images_command(cfg: &Config) -> DockerCommand {
    DockerCommand {
        args: vec![
            "images".into(),
            "--filter".into(),
            format!("reference={}*", cfg.image_name),
            "--format".into(),
            "table {{.Repository}}\\t{{.Tag}}\\t{{.Size}}\\t{{.CreatedAt}}".into(),
        ],
        timeout: cfg.timeout(),
    }
}

pub fn remove_image_command(cfg: &Config) -> DockerCommand {
    DockerCommand {
        args: vec!["rmi".into(), cfg.image_name.clone()],
        timeout: cfg.timeout(),
    }
}
