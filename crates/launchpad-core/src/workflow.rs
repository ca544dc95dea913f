//! End-to-end deploy workflow.
//!
//! Validation runs first and must pass completely; only then are the
//! ignore-file, remote and commit steps applied, the gate consulted, and the
//! push chain run. Frontends observe progress through [`WorkflowObserver`].

use std::path::Path;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::DeployConfig;
use crate::deploy::{
    CommitStager, PushExecutor, PushReport, StepReport, configure_remote, update_ignore_file,
};
use crate::exec::CommandRunner;
use crate::git::GitClient;
use crate::validate::{CheckReport, ValidationReport, Validator};

/// Workflow phases, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Validation,
    GitOperations,
    Push,
}

/// Receives progress as the workflow runs.
pub trait WorkflowObserver {
    fn phase_started(&mut self, _phase: Phase) {}

    fn check_finished(&mut self, _check: &CheckReport) {}

    fn step_finished(&mut self, _step: &StepReport) {}

    fn push_finished(&mut self, _push: &PushReport) {}

    fn finished(&mut self, _report: &WorkflowReport) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl WorkflowObserver for NoopObserver {}

/// Confirmation asked right before pushing.
///
/// `Ok(true)` pushes. `Ok(false)` and errors both skip the push.
pub trait PushGate {
    fn confirm(&mut self, remote_url: &str) -> anyhow::Result<bool>;
}

impl<F> PushGate for F
where
    F: FnMut(&str) -> anyhow::Result<bool>,
{
    fn confirm(&mut self, remote_url: &str) -> anyhow::Result<bool> {
        self(remote_url)
    }
}

/// `y` or `yes`, ignoring case and surrounding whitespace.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkflowOptions {
    /// Stop after validation.
    pub validate_only: bool,
    /// Push to the SSH remote URL instead of HTTPS.
    pub use_ssh: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowOutcome {
    ValidationFailed,
    ValidatedOnly,
    PushDeclined,
    Pushed,
    PushFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowReport {
    pub validation: ValidationReport,
    pub steps: Vec<StepReport>,
    pub push: Option<PushReport>,
    pub outcome: WorkflowOutcome,
    /// Command to run by hand when the push did not happen.
    pub manual_command: Option<String>,
}

impl WorkflowReport {
    /// Process exit code: 1 only when validation failed.
    pub fn exit_code(&self) -> u8 {
        match self.outcome {
            WorkflowOutcome::ValidationFailed => 1,
            _ => 0,
        }
    }
}

pub struct Workflow<'a, R> {
    root: &'a Path,
    config: &'a DeployConfig,
    runner: &'a R,
    options: WorkflowOptions,
}

impl<'a, R: CommandRunner> Workflow<'a, R> {
    pub fn new(
        root: &'a Path,
        config: &'a DeployConfig,
        runner: &'a R,
        options: WorkflowOptions,
    ) -> Self {
        Self {
            root,
            config,
            runner,
            options,
        }
    }

    pub fn run(
        &self,
        gate: &mut dyn PushGate,
        observer: &mut dyn WorkflowObserver,
    ) -> WorkflowReport {
        self.run_at(chrono::Local::now().naive_local(), gate, observer)
    }

    /// Same as [`Workflow::run`] with a fixed commit timestamp.
    pub fn run_at(
        &self,
        now: NaiveDateTime,
        gate: &mut dyn PushGate,
        observer: &mut dyn WorkflowObserver,
    ) -> WorkflowReport {
        let report = self.execute(now, gate, observer);
        info!(outcome = ?report.outcome, "workflow finished");
        observer.finished(&report);
        report
    }

    fn execute(
        &self,
        now: NaiveDateTime,
        gate: &mut dyn PushGate,
        observer: &mut dyn WorkflowObserver,
    ) -> WorkflowReport {
        observer.phase_started(Phase::Validation);
        let validation = Validator::new(self.root, &self.config.validation, self.runner)
            .run_with(|check| observer.check_finished(check));

        let mut report = WorkflowReport {
            validation,
            steps: Vec::new(),
            push: None,
            outcome: WorkflowOutcome::ValidatedOnly,
            manual_command: None,
        };

        if !report.validation.passed() {
            warn!(
                failed = ?report.validation.failed_categories(),
                "validation failed, nothing deployed"
            );
            report.outcome = WorkflowOutcome::ValidationFailed;
            return report;
        }
        if self.options.validate_only {
            return report;
        }

        observer.phase_started(Phase::GitOperations);
        let git = GitClient::new(self.runner);
        let remote = &self.config.remote;
        let url = remote.push_url(self.options.use_ssh);

        let mut record = |step: StepReport| {
            observer.step_finished(&step);
            report.steps.push(step);
        };
        record(update_ignore_file(self.root, &self.config.deploy));
        record(configure_remote(&git, &remote.name, url));
        record(CommitStager::new(&git, &self.config.deploy.commit_prefix).stage_and_commit(now));

        observer.phase_started(Phase::Push);
        let confirmed = match gate.confirm(url) {
            Ok(answer) => answer,
            Err(err) => {
                warn!(error = %format!("{:#}", err), "confirmation failed, treating as no");
                false
            }
        };
        if !confirmed {
            info!("push declined");
            report.outcome = WorkflowOutcome::PushDeclined;
            report.manual_command = Some(remote.manual_push_command());
            return report;
        }

        let push = PushExecutor::new(&git, remote).run();
        observer.push_finished(&push);
        report.outcome = if push.succeeded() {
            WorkflowOutcome::Pushed
        } else {
            report.manual_command = Some(remote.manual_push_command());
            WorkflowOutcome::PushFailed
        };
        report.push = Some(push);
        report
    }
}
