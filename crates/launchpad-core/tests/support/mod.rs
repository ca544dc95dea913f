#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use launchpad_core::prelude::*;

const GIT_ENV_OVERRIDES: [&str; 4] = [
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_INDEX_FILE",
    "GIT_COMMON_DIR",
];

pub fn git_command() -> Command {
    let mut cmd = Command::new("git");
    for key in GIT_ENV_OVERRIDES {
        cmd.env_remove(key);
    }
    cmd
}

pub fn git_available() -> bool {
    git_command()
        .arg("--version")
        .output()
        .is_ok_and(|out| out.status.success())
}

/// Run git in `dir`, panicking with its stderr on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = git_command()
        .current_dir(dir)
        .args(args)
        .output()
        .expect("git should spawn");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Runner answering from a fixed table; unknown commands succeed silently.
#[derive(Default)]
pub struct FakeRunner {
    responses: HashMap<String, CommandOutput>,
    calls: RefCell<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, command: &str, output: CommandOutput) -> Self {
        self.responses.insert(command.to_string(), output);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn git_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("git "))
            .collect()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, spec: &CommandSpec) -> CommandOutput {
        let key = spec.to_string();
        self.calls.borrow_mut().push(key.clone());
        self.responses
            .get(&key)
            .cloned()
            .unwrap_or_else(|| CommandOutput::succeeded(""))
    }
}

/// Builds a project tree that passes validation under the default config.
pub struct ProjectFixture {
    temp: TempDir,
}

impl ProjectFixture {
    pub fn ready() -> Self {
        let fixture = Self::empty();
        for file in &ValidationConfig::default().required_files {
            fixture.write(file, "");
        }
        fixture.write(
            "package.json",
            r#"{
  "name": "ourin-api",
  "version": "1.0.0",
  "scripts": { "dev": "next dev", "build": "next build", "start": "next start" }
}"#,
        );
        fixture.write("lib/plugins/ai/chat.ts", "export default {}\n");
        fixture.write("lib/plugins/download/video.ts", "export default {}\n");
        fixture
    }

    pub fn empty() -> Self {
        Self {
            temp: TempDir::new().expect("tempdir should succeed"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.temp.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) -> &Self {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create_dir_all should succeed");
        }
        fs::write(path, content).expect("write should succeed");
        self
    }

    pub fn remove(&self, relative: &str) -> &Self {
        fs::remove_file(self.join(relative)).expect("remove should succeed");
        self
    }

    pub fn with_git_dir(&self) -> &Self {
        fs::create_dir_all(self.join(".git")).expect("create_dir_all should succeed");
        self
    }
}

pub fn confirm(answer: bool) -> impl FnMut(&str) -> anyhow::Result<bool> {
    move |_| Ok(answer)
}
