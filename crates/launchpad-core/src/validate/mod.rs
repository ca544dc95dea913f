//! Deploy-readiness validation.
//!
//! Checks run in a fixed order and never short-circuit: a failing check
//! still lets the later ones report. The aggregate verdict is the logical
//! AND of every check; the type-check can only warn.

pub mod files;
pub mod manifest;
pub mod plugins;
pub mod repository;
pub mod typecheck;

use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::ValidationConfig;
use crate::exec::CommandRunner;
use crate::git::GitClient;
use crate::report::Finding;

/// Validation categories, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckCategory {
    RequiredFiles,
    Manifest,
    TypeCheck,
    Plugins,
    Git,
}

impl CheckCategory {
    pub const ALL: [CheckCategory; 5] = [
        CheckCategory::RequiredFiles,
        CheckCategory::Manifest,
        CheckCategory::TypeCheck,
        CheckCategory::Plugins,
        CheckCategory::Git,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            CheckCategory::RequiredFiles => "Required Files",
            CheckCategory::Manifest => "Manifest",
            CheckCategory::TypeCheck => "Type Check",
            CheckCategory::Plugins => "Plugins",
            CheckCategory::Git => "Git",
        }
    }
}

impl fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub category: CheckCategory,
    pub passed: bool,
    pub findings: Vec<Finding>,
}

impl CheckReport {
    /// Start a passing report; findings are appended as the check runs.
    pub fn new(category: CheckCategory) -> Self {
        Self {
            category,
            passed: true,
            findings: Vec::new(),
        }
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Record an error finding and mark the check failed.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.passed = false;
        self.findings.push(Finding::error(message));
    }
}

/// All check outcomes of one validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub checks: Vec<CheckReport>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failed_categories(&self) -> Vec<CheckCategory> {
        self.checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.category)
            .collect()
    }

    pub fn check(&self, category: CheckCategory) -> Option<&CheckReport> {
        self.checks.iter().find(|c| c.category == category)
    }
}

/// Runs every check against a project root.
pub struct Validator<'a, R> {
    root: &'a Path,
    config: &'a ValidationConfig,
    git: GitClient<&'a R>,
}

impl<'a, R: CommandRunner> Validator<'a, R> {
    pub fn new(root: &'a Path, config: &'a ValidationConfig, runner: &'a R) -> Self {
        Self {
            root,
            config,
            git: GitClient::new(runner),
        }
    }

    pub fn run(&self) -> ValidationReport {
        self.run_with(|_| {})
    }

    /// Run all checks, handing each report to `on_check` as soon as it is done.
    pub fn run_with(&self, mut on_check: impl FnMut(&CheckReport)) -> ValidationReport {
        let mut checks = Vec::with_capacity(CheckCategory::ALL.len());

        for category in CheckCategory::ALL {
            let report = match category {
                CheckCategory::RequiredFiles => {
                    files::check_required_files(self.root, &self.config.required_files)
                }
                CheckCategory::Manifest => manifest::check_manifest(self.root, self.config),
                CheckCategory::TypeCheck => {
                    typecheck::check_typecheck(self.git.runner(), &self.config.typecheck)
                }
                CheckCategory::Plugins => plugins::check_plugins(self.root, self.config),
                CheckCategory::Git => {
                    let earlier_passed = checks.iter().all(|c: &CheckReport| c.passed);
                    repository::check_repository(self.root, &self.git, earlier_passed)
                }
            };

            if report.passed {
                info!(check = %category, "check passed");
            } else {
                warn!(check = %category, "check failed");
            }
            on_check(&report);
            checks.push(report);
        }

        ValidationReport { checks }
    }
}
