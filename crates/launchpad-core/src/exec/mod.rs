//! External command execution.
//!
//! Every process the workflow starts (git, the type-checker) goes through a
//! [`CommandRunner`], which always produces a typed [`CommandOutput`]. Spawn
//! errors and timeouts become failed outputs rather than `Err`, so callers
//! only branch on `success`.

mod system;
#[cfg(test)]
pub(crate) mod testing;

use std::fmt;
use std::io;
use std::time::Duration;

use serde::{Serialize, Serializer};
use thiserror::Error;

pub use system::SystemRunner;

/// Program plus arguments, run without a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Build from a full command line (`["npx", "tsc", "--noEmit"]`).
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, rest) = argv.split_first()?;
        Some(Self::new(program.clone()).args(rest.iter().cloned()))
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Result of one external command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
    pub success: bool,
    /// `None` when killed by a signal, timed out or never started
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
    pub timed_out: bool,
}

impl CommandOutput {
    /// Successful exit with the given stdout.
    pub fn succeeded(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
            elapsed: Duration::ZERO,
            timed_out: false,
        }
    }

    /// Non-zero exit with the given stderr.
    pub fn exited(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: code == 0,
            exit_code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
            elapsed: Duration::ZERO,
            timed_out: false,
        }
    }

    /// Command killed after exceeding its time bound.
    pub fn timeout(elapsed: Duration) -> Self {
        Self {
            success: false,
            exit_code: None,
            stdout: String::new(),
            stderr: "Command timed out".to_string(),
            elapsed,
            timed_out: true,
        }
    }

    /// Command that could not be run at all.
    pub fn from_error(error: &ExecError, elapsed: Duration) -> Self {
        Self {
            success: false,
            exit_code: None,
            stdout: String::new(),
            stderr: error.to_string(),
            elapsed,
            timed_out: false,
        }
    }

    /// Stdout followed by stderr, the way a terminal would show them.
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (true, _) => self.stderr.clone(),
            (false, true) => self.stdout.clone(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
        }
    }

    /// First non-empty line of stderr (or stdout), for one-line reports.
    pub fn summary_line(&self) -> Option<&str> {
        self.stderr
            .lines()
            .chain(self.stdout.lines())
            .map(str::trim)
            .find(|line| !line.is_empty())
    }
}

fn serialize_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis() as u64)
}

/// Failures starting or supervising a process.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read output of `{command}`: {source}")]
    Output {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Runs external commands for the workflow.
pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec) -> CommandOutput;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, spec: &CommandSpec) -> CommandOutput {
        (**self).run(spec)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn run(&self, spec: &CommandSpec) -> CommandOutput {
        (**self).run(spec)
    }
}
