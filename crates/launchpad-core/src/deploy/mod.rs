//! Deploy phase: ignore-file, remote, commit and push.
//!
//! Steps report problems instead of returning errors; apart from the push
//! gate nothing here stops the run.

pub mod commit;
pub mod ignore;
pub mod push;
pub mod remote;

use std::fmt;

use serde::Serialize;

use crate::report::Finding;

pub use commit::CommitStager;
pub use ignore::update_ignore_file;
pub use push::{PushExecutor, PushOutcome, PushReport, PushState};
pub use remote::configure_remote;

/// Deploy steps before the push gate, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStep {
    IgnoreFile,
    Remote,
    Commit,
}

impl fmt::Display for DeployStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeployStep::IgnoreFile => "Update ignore-file",
            DeployStep::Remote => "Configure remote",
            DeployStep::Commit => "Stage & commit",
        };
        f.write_str(label)
    }
}

/// How a step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Changed something
    Done,
    /// Nothing to do
    Unchanged,
    /// Soft failure; the step still counts as successful
    Warning,
    /// The step did not achieve its goal
    Failed,
}

impl StepStatus {
    pub fn is_success(self) -> bool {
        !matches!(self, StepStatus::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: DeployStep,
    pub status: StepStatus,
    pub findings: Vec<Finding>,
}

impl StepReport {
    pub fn new(step: DeployStep, status: StepStatus, findings: Vec<Finding>) -> Self {
        Self {
            step,
            status,
            findings,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_failed_is_unsuccessful() {
        assert!(StepStatus::Done.is_success());
        assert!(StepStatus::Unchanged.is_success());
        assert!(StepStatus::Warning.is_success());
        assert!(!StepStatus::Failed.is_success());
    }
}
