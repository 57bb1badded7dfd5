use std::path::Path;

use anyhow::{Context, Result};

use super::types::Config;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".wtree-itest.yml";

/// Load config from `.wtree-itest.yml` in the given directory.
/// A missing file is not an error — the caller falls back to defaults.
pub fn load(dir: &Path) -> Result<Option<Config>> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_path(&path).map(Some)
}

/// Load config from an explicit path. Here a missing file *is* an error,
/// since the user asked for that file specifically.
pub fn load_path(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    // Surface bad quoting at load time rather than mid-run.
    config.resolved_run_args()?;
    Ok(config)
}
