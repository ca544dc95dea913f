//! Push fallback chain.
//!
//! ```text
//! TryPrimary ──ok──────────────────────────────▶ Pushed
//!     │ failed, output mentions error/failed
//!     ▼
//! TrySecondary ──ok────────────────────────────▶ Pushed
//!     │ failed                 (TryPrimary failed silently ──┐)
//!     ▼                                                      │
//! ForcePrimary ◀─────────────────────────────────────────────┘
//!     │ ok ─▶ Pushed (forced)
//!     ▼ failed
//!   Failed
//! ```
//!
//! Every attempt runs at most once; there is no loop and no backoff.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::RemoteConfig;
use crate::exec::{CommandOutput, CommandRunner};
use crate::git::{self, GitClient};
use crate::report::Finding;

/// Push attempt kinds, in chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PushStrategy {
    Primary,
    Secondary,
    ForcePrimary,
}

/// State of the push chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushState {
    TryPrimary,
    TrySecondary,
    ForcePrimary,
    Pushed(PushStrategy),
    Failed,
}

impl PushState {
    /// Strategy to attempt in this state; `None` once terminal.
    pub fn strategy(self) -> Option<PushStrategy> {
        match self {
            PushState::TryPrimary => Some(PushStrategy::Primary),
            PushState::TrySecondary => Some(PushStrategy::Secondary),
            PushState::ForcePrimary => Some(PushStrategy::ForcePrimary),
            PushState::Pushed(_) | PushState::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.strategy().is_none()
    }

    /// Transition after the attempt made in this state produced `output`.
    pub fn next(self, output: &CommandOutput) -> PushState {
        let Some(strategy) = self.strategy() else {
            return self;
        };
        if output.success {
            return PushState::Pushed(strategy);
        }
        match self {
            PushState::TryPrimary if has_failure_indicator(output) => PushState::TrySecondary,
            PushState::TryPrimary | PushState::TrySecondary => PushState::ForcePrimary,
            _ => PushState::Failed,
        }
    }
}

/// Whether push output looks like a reported error rather than silence.
pub fn has_failure_indicator(output: &CommandOutput) -> bool {
    let text = output.combined().to_lowercase();
    text.contains("error") || text.contains("failed")
}

/// One executed push command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushAttempt {
    pub strategy: PushStrategy,
    pub command: String,
    pub output: CommandOutput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum PushOutcome {
    Pushed { branch: String, forced: bool },
    Failed { manual_command: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushReport {
    pub attempts: Vec<PushAttempt>,
    pub outcome: PushOutcome,
}

impl PushReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, PushOutcome::Pushed { .. })
    }

    pub fn forced(&self) -> bool {
        matches!(self.outcome, PushOutcome::Pushed { forced: true, .. })
    }

    /// Per-attempt and final findings for display.
    pub fn findings(&self) -> Vec<Finding> {
        let mut findings = Vec::new();
        for attempt in &self.attempts {
            if attempt.output.success {
                continue;
            }
            let reason = if attempt.output.timed_out {
                "timed out".to_string()
            } else {
                attempt
                    .output
                    .summary_line()
                    .unwrap_or("no output")
                    .to_string()
            };
            findings.push(Finding::warn(format!("`{}` failed: {}", attempt.command, reason)));
        }
        match &self.outcome {
            PushOutcome::Pushed { branch, forced: false } => {
                findings.push(Finding::ok(format!("Pushed to branch '{}'", branch)));
            }
            PushOutcome::Pushed { branch, forced: true } => {
                findings.push(Finding::ok(format!("Force-pushed to branch '{}'", branch)));
                findings.push(Finding::warn(format!(
                    "Remote history of '{}' was overwritten",
                    branch
                )));
            }
            PushOutcome::Failed { manual_command } => {
                findings.push(Finding::error("Push failed; check your GitHub credentials"));
                findings.push(Finding::info(format!("Run manually: {}", manual_command)));
            }
        }
        findings
    }
}

/// Drives [`PushState`] to a terminal state against a real remote.
pub struct PushExecutor<'a, R> {
    git: &'a GitClient<R>,
    remote: &'a RemoteConfig,
}

impl<'a, R: CommandRunner> PushExecutor<'a, R> {
    pub fn new(git: &'a GitClient<R>, remote: &'a RemoteConfig) -> Self {
        Self { git, remote }
    }

    pub fn run(&self) -> PushReport {
        let mut state = PushState::TryPrimary;
        let mut attempts = Vec::new();

        while let Some(strategy) = state.strategy() {
            let (branch, force) = self.target(strategy);
            let command = git::push_command(&self.remote.name, branch, force).to_string();
            info!(%command, "pushing");

            let output = self.git.push(&self.remote.name, branch, force);
            state = state.next(&output);
            if !output.success {
                warn!(%command, exit_code = ?output.exit_code, "push attempt failed");
            }
            attempts.push(PushAttempt {
                strategy,
                command,
                output,
            });
        }

        let outcome = match state {
            PushState::Pushed(strategy) => {
                let (branch, force) = self.target(strategy);
                PushOutcome::Pushed {
                    branch: branch.to_string(),
                    forced: force,
                }
            }
            _ => PushOutcome::Failed {
                manual_command: self.remote.manual_push_command(),
            },
        };

        PushReport { attempts, outcome }
    }

    fn target(&self, strategy: PushStrategy) -> (&str, bool) {
        match strategy {
            PushStrategy::Primary => (self.remote.primary_branch.as_str(), false),
            PushStrategy::Secondary => (self.remote.secondary_branch.as_str(), false),
            PushStrategy::ForcePrimary => (self.remote.primary_branch.as_str(), true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::testing::ScriptedRunner;

    const MAIN: &str = "git push -u origin main";
    const MASTER: &str = "git push -u origin master";
    const FORCE: &str = "git push -u origin main --force";

    fn rejected() -> CommandOutput {
        CommandOutput::exited(
            1,
            "error: src refspec main does not match any\nerror: failed to push some refs",
        )
    }

    fn run(runner: &ScriptedRunner) -> PushReport {
        let git = GitClient::new(runner);
        let remote = RemoteConfig::default();
        PushExecutor::new(&git, &remote).run()
    }

    #[test]
    fn transitions_from_primary() {
        assert_eq!(
            PushState::TryPrimary.next(&CommandOutput::succeeded("")),
            PushState::Pushed(PushStrategy::Primary)
        );
        assert_eq!(PushState::TryPrimary.next(&rejected()), PushState::TrySecondary);
        assert_eq!(
            PushState::TryPrimary.next(&CommandOutput::exited(1, "")),
            PushState::ForcePrimary
        );
    }

    #[test]
    fn transitions_from_secondary_and_force() {
        assert_eq!(PushState::TrySecondary.next(&rejected()), PushState::ForcePrimary);
        assert_eq!(
            PushState::TrySecondary.next(&CommandOutput::succeeded("")),
            PushState::Pushed(PushStrategy::Secondary)
        );
        assert_eq!(PushState::ForcePrimary.next(&rejected()), PushState::Failed);
        assert_eq!(
            PushState::ForcePrimary.next(&CommandOutput::succeeded("")),
            PushState::Pushed(PushStrategy::ForcePrimary)
        );
    }

    #[test]
    fn terminal_states_stay_put() {
        assert_eq!(PushState::Failed.next(&CommandOutput::succeeded("")), PushState::Failed);
        let pushed = PushState::Pushed(PushStrategy::Secondary);
        assert_eq!(pushed.next(&rejected()), pushed);
        assert!(pushed.is_terminal());
    }

    #[test]
    fn failure_indicator_is_case_insensitive_across_streams() {
        let mut output = CommandOutput::exited(1, "");
        output.stdout = "Push FAILED".to_string();
        assert!(has_failure_indicator(&output));
        assert!(!has_failure_indicator(&CommandOutput::exited(1, "rejected")));
    }

    #[test]
    fn primary_success_stops_chain() {
        let runner = ScriptedRunner::new();
        let report = run(&runner);
        assert!(report.succeeded());
        assert!(!report.forced());
        assert_eq!(runner.calls(), vec![MAIN]);
    }

    #[test]
    fn secondary_success_never_forces() {
        let runner = ScriptedRunner::new().on(MAIN, rejected());
        let report = run(&runner);

        assert_eq!(
            report.outcome,
            PushOutcome::Pushed {
                branch: "master".to_string(),
                forced: false
            }
        );
        assert_eq!(runner.calls(), vec![MAIN, MASTER]);
        assert!(!runner.was_called(FORCE));
    }

    #[test]
    fn force_success_warns_about_history() {
        let runner = ScriptedRunner::new()
            .on(MAIN, rejected())
            .on(MASTER, rejected());
        let report = run(&runner);

        assert!(report.succeeded());
        assert!(report.forced());
        assert_eq!(runner.calls(), vec![MAIN, MASTER, FORCE]);
        assert!(
            report
                .findings()
                .contains(&Finding::warn("Remote history of 'main' was overwritten"))
        );
    }

    #[test]
    fn silent_primary_failure_skips_secondary() {
        let runner = ScriptedRunner::new().on(MAIN, CommandOutput::exited(1, "rejected"));
        let report = run(&runner);

        assert!(report.forced());
        assert_eq!(runner.calls(), vec![MAIN, FORCE]);
    }

    #[test]
    fn exhausted_chain_suggests_manual_command() {
        let runner = ScriptedRunner::new()
            .on(MAIN, rejected())
            .on(MASTER, rejected())
            .on(FORCE, rejected());
        let report = run(&runner);

        assert!(!report.succeeded());
        assert_eq!(report.attempts.len(), 3);
        assert_eq!(
            report.outcome,
            PushOutcome::Failed {
                manual_command: "git push -u origin main".to_string()
            }
        );
        assert!(
            report
                .findings()
                .contains(&Finding::info("Run manually: git push -u origin main"))
        );
    }
}
