//! Stage everything and commit with a timestamped message.

use chrono::NaiveDateTime;
use tracing::{info, warn};

use super::{DeployStep, StepReport, StepStatus};
use crate::exec::CommandRunner;
use crate::git::{self, GitClient};
use crate::report::Finding;

/// Commit message for a deploy at `now`.
pub fn commit_message(prefix: &str, now: NaiveDateTime) -> String {
    format!("{}: {}", prefix, now.format("%Y-%m-%d %H:%M:%S"))
}

pub struct CommitStager<'a, R> {
    git: &'a GitClient<R>,
    prefix: &'a str,
}

impl<'a, R: CommandRunner> CommitStager<'a, R> {
    pub fn new(git: &'a GitClient<R>, prefix: &'a str) -> Self {
        Self { git, prefix }
    }

    /// `git add -A`, then commit if anything is staged.
    ///
    /// A clean tree skips the commit and succeeds. An unreadable status skips
    /// the commit with a warning, as does a failing commit; only a failing
    /// `git add` fails the step.
    pub fn stage_and_commit(&self, now: NaiveDateTime) -> StepReport {
        let mut findings = Vec::new();

        let added = self.git.add_all();
        if !added.success {
            warn!(stderr = %added.stderr.trim(), "git add failed");
            findings.push(Finding::error("git add failed"));
            if let Some(line) = added.summary_line() {
                findings.push(Finding::info(line.to_string()));
            }
            return StepReport::new(DeployStep::Commit, StepStatus::Failed, findings);
        }
        findings.push(Finding::ok("All files staged"));

        let status = self.git.status_porcelain();
        if !status.success {
            warn!(stderr = %status.stderr.trim(), "git status failed, skipping commit");
            findings.push(Finding::warn("Could not read working tree status; commit skipped"));
            if let Some(line) = status.summary_line() {
                findings.push(Finding::info(line.to_string()));
            }
            return StepReport::new(DeployStep::Commit, StepStatus::Warning, findings);
        }
        if !git::has_changes(&status.stdout) {
            info!("working tree clean, nothing to commit");
            findings.push(Finding::warn("No changes to commit"));
            return StepReport::new(DeployStep::Commit, StepStatus::Unchanged, findings);
        }

        let message = commit_message(self.prefix, now);
        let committed = self.git.commit(&message);
        if committed.success {
            info!(%message, "committed");
            findings.push(Finding::ok(format!("Committed: {}", message)));
            StepReport::new(DeployStep::Commit, StepStatus::Done, findings)
        } else {
            warn!(stderr = %committed.stderr.trim(), "git commit failed");
            findings.push(Finding::warn("Commit failed or nothing to commit"));
            if let Some(line) = committed.summary_line() {
                findings.push(Finding::info(line.to_string()));
            }
            StepReport::new(DeployStep::Commit, StepStatus::Warning, findings)
        }
    }
}
