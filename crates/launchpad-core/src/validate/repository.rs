//! Git repository presence.

use std::path::Path;

use super::{CheckCategory, CheckReport};
use crate::exec::CommandRunner;
use crate::git::{self, GitClient};
use crate::report::Finding;

/// Ensure `root` is a git repository, initializing one when allowed.
///
/// With `may_initialize == false` (an earlier check failed) nothing is run
/// and initialization is reported as deferred; the run is going to stop
/// before any mutation anyway.
pub fn check_repository<R: CommandRunner>(
    root: &Path,
    git: &GitClient<R>,
    may_initialize: bool,
) -> CheckReport {
    let mut report = CheckReport::new(CheckCategory::Git);

    if git::has_repository(root) {
        report.push(Finding::ok("Git repository found"));
        return report;
    }

    report.push(Finding::warn("Git repository not initialized"));
    if !may_initialize {
        report.push(Finding::info(
            "Initialization deferred until the other checks pass",
        ));
        return report;
    }

    report.push(Finding::info("Initializing git repository..."));
    let output = git.init();
    if output.success {
        report.push(Finding::ok("Git repository initialized"));
    } else {
        report.fail("Failed to initialize git repository");
        if let Some(line) = output.summary_line() {
            report.push(Finding::info(line.to_string()));
        }
    }

    report
}
