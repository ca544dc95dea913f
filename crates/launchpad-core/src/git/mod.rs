//! Git operations used by the deploy workflow.
//!
//! This module wraps the handful of `git` invocations the workflow needs:
//! - Repository initialization
//! - Remote inspection and registration
//! - Staging, status and commit
//! - Push (optionally forced)
//!
//! Every call returns the raw [`CommandOutput`]; deciding what a failure
//! means is left to the workflow step that issued it.

use std::path::Path;

use crate::exec::{CommandOutput, CommandRunner, CommandSpec};

/// Thin `git` front end over a [`CommandRunner`].
#[derive(Debug, Clone)]
pub struct GitClient<R> {
    runner: R,
}

impl<R: CommandRunner> GitClient<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// `git init`
    pub fn init(&self) -> CommandOutput {
        self.git(&["init"])
    }

    /// `git remote -v`
    pub fn remotes(&self) -> CommandOutput {
        self.git(&["remote", "-v"])
    }

    /// `git remote add <name> <url>`
    pub fn remote_add(&self, name: &str, url: &str) -> CommandOutput {
        self.git(&["remote", "add", name, url])
    }

    /// `git add -A`
    pub fn add_all(&self) -> CommandOutput {
        self.git(&["add", "-A"])
    }

    /// `git status --porcelain`
    pub fn status_porcelain(&self) -> CommandOutput {
        self.git(&["status", "--porcelain"])
    }

    /// `git commit -m <message>`
    pub fn commit(&self, message: &str) -> CommandOutput {
        self.git(&["commit", "-m", message])
    }

    /// `git push -u <remote> <branch> [--force]`
    pub fn push(&self, remote: &str, branch: &str, force: bool) -> CommandOutput {
        self.runner.run(&push_command(remote, branch, force))
    }

    fn git(&self, args: &[&str]) -> CommandOutput {
        self.runner.run(&CommandSpec::new("git").args(args.iter().copied()))
    }
}

/// Command line for a push attempt; also shown to operators.
pub fn push_command(remote: &str, branch: &str, force: bool) -> CommandSpec {
    let spec = CommandSpec::new("git").args(["push", "-u", remote, branch]);
    if force { spec.arg("--force") } else { spec }
}

/// Whether `root` already holds repository metadata (`.git` dir or worktree file).
pub fn has_repository(root: &Path) -> bool {
    root.join(".git").exists()
}

/// Remote names listed by `git remote -v`, first occurrence order, deduplicated.
pub fn remote_names(remote_output: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for line in remote_output.lines() {
        if let Some(name) = line.split_whitespace().next()
            && !names.iter().any(|n| n == name)
        {
            names.push(name.to_string());
        }
    }
    names
}

/// Whether porcelain status output lists any change.
pub fn has_changes(porcelain: &str) -> bool {
    !porcelain.trim().is_empty()
}
