//! Helpers for rewriting the project's ignore-file.

use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::{info, warn};

use super::{DeployStep, StepReport, StepStatus};
use crate::config::DeploySettings;
use crate::report::Finding;

/// Ignore-file content written on every deploy.
pub const IGNORE_TEMPLATE: &str = "\
# Dependencies
node_modules
.pnpm-store

# Next.js
.next
out
build
dist

# Environment
.env
.env.local
.env.development.local
.env.test.local
.env.production.local
.env*.local

# Debug
npm-debug.log*
yarn-debug.log*
yarn-error.log*
.pnpm-debug.log*

# TypeScript
*.tsbuildinfo
tsconfig.tsbuildinfo

# Lock files (uncomment to keep them out of the repository)
# pnpm-lock.yaml
# package-lock.json
# yarn.lock

# IDE
.idea
.vscode
*.swp
*.swo

# OS
.DS_Store
Thumbs.db
*.log

# Testing
coverage
.nyc_output

# Misc
.cache
.temp
*.pyc
__pycache__

# Turbo
.turbo
";

/// Overwrite `path` with the template. Existing content is discarded.
pub fn write_ignore_file(path: &Path) -> anyhow::Result<()> {
    fs::write(path, IGNORE_TEMPLATE)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Patterns from `expected` that no active (non-comment) line of `content` lists.
pub fn uncovered_patterns<'a>(content: &str, expected: &'a [String]) -> Vec<&'a str> {
    let active: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    expected
        .iter()
        .map(String::as_str)
        .filter(|pattern| !active.contains(pattern))
        .collect()
}

/// Deploy step: rewrite the ignore-file. Write failures are reported, not raised.
pub fn update_ignore_file(root: &Path, settings: &DeploySettings) -> StepReport {
    let path = root.join(&settings.ignore_file);
    let mut findings = Vec::new();

    if let Err(err) = write_ignore_file(&path) {
        warn!(error = %format!("{:#}", err), "ignore-file update failed");
        findings.push(Finding::error(format!(
            "Failed to update {}: {:#}",
            settings.ignore_file, err
        )));
        return StepReport::new(DeployStep::IgnoreFile, StepStatus::Failed, findings);
    }

    info!(path = %path.display(), "ignore-file rewritten");
    findings.push(Finding::ok(format!("{} updated", settings.ignore_file)));

    let uncovered = uncovered_patterns(IGNORE_TEMPLATE, &settings.exclude_patterns);
    if !uncovered.is_empty() {
        findings.push(Finding::info(format!(
            "Not ignored by the template: {}",
            uncovered.join(", ")
        )));
    }

    StepReport::new(DeployStep::IgnoreFile, StepStatus::Done, findings)
}
