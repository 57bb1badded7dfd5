use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "wtree-itest",
    version,
    about = "Run git-wtree integration tests in Docker"
)]
pub struct Cli {
    /// Only build the Docker image without running tests
    #[arg(long)]
    pub build_only: bool,

    /// Skip building the Docker image
    #[arg(long)]
    pub no_build: bool,

    /// Docker image name (default: git-wtree-test)
    #[arg(long)]
    pub image_name: Option<String>,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    /// List Docker images and exit
    #[arg(long)]
    pub list_images: bool,

    /// Remove Docker image and exit
    #[arg(long)]
    pub clean: bool,

    /// Config file path (default: .wtree-itest.yml in the working directory)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Overlay flag values onto the file-or-default config. Flags win.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(name) = &self.image_name {
            cfg.image_name = name.clone();
        }
        if self.verbose {
            cfg.verbose = true;
        }
    }
}
