//! Terminal rendering of workflow progress.

use std::io::{self, Write};
use std::path::Path;

use console::style;

use launchpad_core::prelude::*;
use launchpad_core::report::count_level;

/// Writes progress lines as the workflow reports them.
///
/// The observer callbacks cannot fail, so the first write error is kept and
/// returned by [`ConsoleObserver::finish`].
pub struct ConsoleObserver<W: Write = io::Stdout> {
    writer: W,
    remote_url: String,
    error: Option<io::Error>,
}

impl ConsoleObserver<io::Stdout> {
    pub fn stdout(remote_url: impl Into<String>) -> Self {
        Self::new(io::stdout(), remote_url)
    }
}

impl<W: Write> ConsoleObserver<W> {
    pub fn new(writer: W, remote_url: impl Into<String>) -> Self {
        Self {
            writer,
            remote_url: remote_url.into(),
            error: None,
        }
    }

    pub fn header(&mut self, root: &Path, source: &ConfigSource) {
        let config = match source {
            ConfigSource::BuiltIn => "built-in defaults".to_string(),
            ConfigSource::File(path) => path.display().to_string(),
        };
        self.write(|w| {
            writeln!(w)?;
            writeln!(w, "{}", style("  Launchpad Deploy").bold().cyan())?;
            writeln!(w, "  Project: {}", root.display())?;
            writeln!(w, "  Config:  {}", config)
        });
    }

    pub fn finish(self) -> io::Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    #[cfg(test)]
    fn into_writer(self) -> W {
        self.writer
    }

    fn write(&mut self, f: impl FnOnce(&mut W) -> io::Result<()>) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = f(&mut self.writer) {
            self.error = Some(err);
        }
    }

    fn section(&mut self, title: &str) {
        self.write(|w| {
            writeln!(w)?;
            writeln!(w, "{}", style(title).bold())
        });
    }

    fn findings(&mut self, findings: &[Finding]) {
        self.write(|w| {
            for finding in findings {
                writeln!(w, "  {} {}", marker(finding.level), finding.message)?;
            }
            Ok(())
        });
    }
}

fn marker(level: FindingLevel) -> console::StyledObject<&'static str> {
    match level {
        FindingLevel::Ok => style("✓").green(),
        FindingLevel::Info => style("ℹ").blue(),
        FindingLevel::Warn => style("⚠").yellow(),
        FindingLevel::Error => style("✗").red(),
    }
}

impl<W: Write> WorkflowObserver for ConsoleObserver<W> {
    fn phase_started(&mut self, phase: Phase) {
        let banner = match phase {
            Phase::Validation => "Validating project",
            Phase::GitOperations => "Git operations",
            Phase::Push => "Push",
        };
        self.write(|w| {
            writeln!(w)?;
            writeln!(w, "{}", style(format!("== {} ==", banner)).bold().cyan())
        });
    }

    fn check_finished(&mut self, check: &CheckReport) {
        self.section(check.category.display_name());
        self.findings(&check.findings);
    }

    fn step_finished(&mut self, step: &StepReport) {
        self.section(&step.step.to_string());
        self.findings(&step.findings);
    }

    fn push_finished(&mut self, push: &PushReport) {
        self.findings(&push.findings());
    }

    fn finished(&mut self, report: &WorkflowReport) {
        let remote_url = self.remote_url.clone();
        let manual = report.manual_command.clone().unwrap_or_default();
        self.write(|w| {
            writeln!(w)?;
            match report.outcome {
                WorkflowOutcome::ValidationFailed => {
                    let failed: Vec<&str> = report
                        .validation
                        .failed_categories()
                        .into_iter()
                        .map(CheckCategory::display_name)
                        .collect();
                    writeln!(
                        w,
                        "{} Validation failed: {}",
                        marker(FindingLevel::Error),
                        failed.join(", ")
                    )?;
                    writeln!(w, "  Fix the errors above before deploying.")
                }
                WorkflowOutcome::ValidatedOnly => {
                    let warnings: usize = report
                        .validation
                        .checks
                        .iter()
                        .map(|c| count_level(&c.findings, FindingLevel::Warn))
                        .sum();
                    if warnings == 0 {
                        writeln!(w, "{} All checks passed", marker(FindingLevel::Ok))
                    } else {
                        writeln!(
                            w,
                            "{} All checks passed ({} warnings)",
                            marker(FindingLevel::Ok),
                            warnings
                        )
                    }
                }
                WorkflowOutcome::PushDeclined => {
                    writeln!(w, "{} Push cancelled", marker(FindingLevel::Info))?;
                    writeln!(w, "  Changes are committed locally. Push later with: {}", manual)
                }
                WorkflowOutcome::Pushed => {
                    writeln!(
                        w,
                        "{} {}",
                        marker(FindingLevel::Ok),
                        style("Deploy complete").bold().green()
                    )?;
                    writeln!(w, "  Repository: {}", remote_url)
                }
                WorkflowOutcome::PushFailed => {
                    writeln!(w, "{} Deploy incomplete: push failed", marker(FindingLevel::Error))
                }
            }
        });
    }
}
