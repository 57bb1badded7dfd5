use crate::cli::Cli;

/// Which phases a run invocation executes. Derived purely from the flags so
/// the skip logic is testable without touching Docker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    pub build: bool,
    pub test: bool,
}

/// What a single invocation is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Print the image table and exit; no build or test phase runs.
    ListImages,
    /// Remove the image and exit; no build or test phase runs.
    RemoveImage,
    /// The build/test sequence.
    Run(RunPlan),
}

/// Translate flags into an action. `--list-images` wins over `--clean` when
/// both are given, matching the historical check order.
pub fn plan(cli: &Cli) -> Action {
    if cli.list_images {
        return Action::ListImages;
    }
    if cli.clean {
        return Action::RemoveImage;
    }
    Action::Run(RunPlan {
        build: !cli.no_build,
        test: !cli.build_only,
    })
}

/// Terminal state of a run, mapped onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Passed,
    Failed,
    Interrupted,
}

impl RunStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Passed => 0,
            RunStatus::Failed => 1,
            // 128 + SIGINT, the conventional "terminated by interrupt" code.
            RunStatus::Interrupted => 130,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("wtree-itest").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn default_invocation_builds_and_tests() {
        assert_eq!(
            plan(&parse(&[])),
            Action::Run(RunPlan {
                build: true,
                test: true
            })
        );
    }

    #[test]
    fn build_only_skips_the_test_phase() {
        assert_eq!(
            plan(&parse(&["--build-only"])),
            Action::Run(RunPlan {
                build: true,
                test: false
            })
        );
    }

    #[test]
    fn no_build_skips_the_build_phase() {
        assert_eq!(
            plan(&parse(&["--no-build"])),
            Action::Run(RunPlan {
                build: false,
                test: true
            })
        );
    }

    #[test]
    fn both_skip_flags_leave_nothing_to_run() {
        assert_eq!(
            plan(&parse(&["--build-only", "--no-build"])),
            Action::Run(RunPlan {
                build: false,
                test: false
            })
        );
    }

    #[test]
    fn list_images_short_circuits() {
        assert_eq!(plan(&parse(&["--list-images"])), Action::ListImages);
        // Even when run-phase flags are present.
        assert_eq!(
            plan(&parse(&["--list-images", "--no-build"])),
            Action::ListImages
        );
    }

    #[test]
    fn clean_short_circuits() {
        assert_eq!(plan(&parse(&["--clean"])), Action::RemoveImage);
    }

    #[test]
    fn list_images_wins_over_clean() {
        assert_eq!(
            plan(&parse(&["--clean", "--list-images"])),
            Action::ListImages
        );
    }

    #[test]
    fn exit_codes_follow_convention() {
        assert_eq!(RunStatus::Passed.exit_code(), 0);
        assert_eq!(RunStatus::Failed.exit_code(), 1);
        assert_eq!(RunStatus::Interrupted.exit_code(), 130);
    }
}
