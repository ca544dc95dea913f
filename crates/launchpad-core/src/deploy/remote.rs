//! Remote configuration.

use tracing::{info, warn};

use super::{DeployStep, StepReport, StepStatus};
use crate::exec::CommandRunner;
use crate::git::{self, GitClient};
use crate::report::Finding;

/// Make sure a remote called `name` exists, adding it with `url` if not.
///
/// An existing remote is left untouched even if it points elsewhere.
pub fn configure_remote<R: CommandRunner>(
    git: &GitClient<R>,
    name: &str,
    url: &str,
) -> StepReport {
    let listing = git.remotes();
    if listing.success && git::remote_names(&listing.stdout).iter().any(|n| n == name) {
        info!(remote = name, "remote already configured");
        return StepReport::new(
            DeployStep::Remote,
            StepStatus::Unchanged,
            vec![Finding::ok(format!("Remote '{}' already exists", name))],
        );
    }

    let output = git.remote_add(name, url);
    if output.success {
        info!(remote = name, url, "remote added");
        return StepReport::new(
            DeployStep::Remote,
            StepStatus::Done,
            vec![Finding::ok(format!("Remote '{}' added: {}", name, url))],
        );
    }

    warn!(remote = name, stderr = %output.stderr.trim(), "failed to add remote");
    let mut findings = vec![Finding::error(format!("Failed to add remote '{}'", name))];
    if let Some(line) = output.summary_line() {
        findings.push(Finding::info(line.to_string()));
    }
    StepReport::new(DeployStep::Remote, StepStatus::Failed, findings)
}
