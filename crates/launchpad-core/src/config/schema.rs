//! Configuration schema for launchpad.toml
//!
//! Every field has a built-in default, so an absent or partial file still
//! yields the full deploy configuration:
//! - `[remote]`: where and how to push
//! - `[validation]`: what makes a project tree deploy-ready
//! - `[deploy]`: ignore-file, commit and command settings

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_REMOTE_URL: &str = "https://github.com/LuckyArch/ourin-api.git";
pub const DEFAULT_REMOTE_SSH_URL: &str = "git@github.com:LuckyArch/ourin-api.git";

/// Root configuration structure for launchpad.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeployConfig {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub deploy: DeploySettings,
}

/// Remote repository and branch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Remote name, e.g. "origin"
    pub name: String,
    /// HTTPS push URL
    pub url: String,
    /// SSH alternative, used with `--ssh`
    pub ssh_url: String,
    /// First branch the push chain tries (and force-pushes)
    pub primary_branch: String,
    /// Fallback branch
    pub secondary_branch: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            name: "origin".to_string(),
            url: DEFAULT_REMOTE_URL.to_string(),
            ssh_url: DEFAULT_REMOTE_SSH_URL.to_string(),
            primary_branch: "main".to_string(),
            secondary_branch: "master".to_string(),
        }
    }
}

impl RemoteConfig {
    /// URL to register for the remote.
    pub fn push_url(&self, use_ssh: bool) -> &str {
        if use_ssh { &self.ssh_url } else { &self.url }
    }

    /// Command an operator can run by hand when automation gives up.
    pub fn manual_push_command(&self) -> String {
        format!("git push -u {} {}", self.name, self.primary_branch)
    }
}

/// Project readiness checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Paths (relative to the project root) that must exist
    pub required_files: Vec<String>,
    /// Manifest file name
    pub manifest: String,
    /// Top-level manifest keys that must be present
    pub required_fields: Vec<String>,
    /// Script entries that only warn when missing
    pub recommended_scripts: Vec<String>,
    /// Type-check command line; empty disables the check
    pub typecheck: Vec<String>,
    /// Plugin root directory, relative to the project root
    pub plugin_root: String,
    /// Known plugin category directories
    pub plugin_categories: Vec<String>,
    /// Extension (without dot) of plugin source files
    pub plugin_extension: String,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            required_files: strings(&[
                "package.json",
                "tsconfig.json",
                "next.config.ts",
                "README.md",
                "lib/site.ts",
                "lib/registry.ts",
                "lib/plugins/index.ts",
                "app/page.tsx",
                "app/docs/page.tsx",
            ]),
            manifest: "package.json".to_string(),
            required_fields: strings(&["name", "version", "scripts"]),
            recommended_scripts: strings(&["dev", "build", "start"]),
            typecheck: strings(&["npx", "tsc", "--noEmit"]),
            plugin_root: "lib/plugins".to_string(),
            plugin_categories: strings(&["ai", "download", "stalker"]),
            plugin_extension: "ts".to_string(),
        }
    }
}

/// Deploy-phase settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploySettings {
    /// Ignore-file rewritten before staging
    pub ignore_file: String,
    /// Patterns the ignore-file is expected to cover
    pub exclude_patterns: Vec<String>,
    /// Commit message prefix, followed by ": <timestamp>"
    pub commit_prefix: String,
    /// Upper bound for every external command
    pub command_timeout_secs: u64,
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            ignore_file: ".gitignore".to_string(),
            exclude_patterns: strings(&[
                ".next",
                "node_modules",
                ".env",
                ".env.local",
                ".env.production",
                ".DS_Store",
                "Thumbs.db",
                "*.log",
                "npm-debug.log*",
                "yarn-debug.log*",
                "yarn-error.log*",
                ".pnpm-debug.log*",
                "tsconfig.tsbuildinfo",
                "pnpm-lock.yaml",
                "package-lock.json",
                "yarn.lock",
                ".turbo",
                "coverage",
                ".nyc_output",
                "dist",
                "build",
                "out",
                ".cache",
                ".temp",
                "__pycache__",
                "*.pyc",
            ]),
            commit_prefix: "🚀 Deploy".to_string(),
            command_timeout_secs: 300,
        }
    }
}

impl DeploySettings {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

impl DeployConfig {
    /// Check invariants serde cannot express.
    pub fn validate(&self) -> anyhow::Result<()> {
        let remote = &self.remote;
        if remote.name.trim().is_empty() {
            anyhow::bail!("remote.name must not be empty");
        }
        if remote.name.chars().any(char::is_whitespace) {
            anyhow::bail!("remote.name must not contain whitespace: '{}'", remote.name);
        }
        if remote.url.trim().is_empty() {
            anyhow::bail!("remote.url must not be empty");
        }
        if remote.ssh_url.trim().is_empty() {
            anyhow::bail!("remote.ssh_url must not be empty");
        }
        if remote.primary_branch.trim().is_empty() || remote.secondary_branch.trim().is_empty() {
            anyhow::bail!("remote branch names must not be empty");
        }
        if remote.primary_branch == remote.secondary_branch {
            anyhow::bail!(
                "remote.primary_branch and remote.secondary_branch must differ (both '{}')",
                remote.primary_branch
            );
        }
        if self.validation.manifest.trim().is_empty() {
            anyhow::bail!("validation.manifest must not be empty");
        }
        if self.validation.plugin_extension.trim().is_empty() {
            anyhow::bail!("validation.plugin_extension must not be empty");
        }
        if self.deploy.ignore_file.trim().is_empty() {
            anyhow::bail!("deploy.ignore_file must not be empty");
        }
        if self.deploy.command_timeout_secs == 0 {
            anyhow::bail!("deploy.command_timeout_secs must be greater than zero");
        }
        Ok(())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        DeployConfig::default().validate().unwrap();
    }

    #[test]
    fn default_remote_matches_project_repository() {
        let remote = RemoteConfig::default();
        assert_eq!(remote.push_url(false), DEFAULT_REMOTE_URL);
        assert_eq!(remote.push_url(true), DEFAULT_REMOTE_SSH_URL);
        assert_eq!(remote.manual_push_command(), "git push -u origin main");
    }

    #[test]
    fn default_required_files_keep_order() {
        let validation = ValidationConfig::default();
        assert_eq!(validation.required_files.first().unwrap(), "package.json");
        assert_eq!(validation.required_files.last().unwrap(), "app/docs/page.tsx");
        assert_eq!(validation.required_files.len(), 9);
    }

    #[test]
    fn same_branches_are_rejected() {
        let mut config = DeployConfig::default();
        config.remote.secondary_branch = "main".to_string();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("must differ"));
    }

    #[test]
    fn empty_ssh_url_is_rejected() {
        let mut config = DeployConfig::default();
        config.remote.ssh_url = "  ".to_string();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("remote.ssh_url"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = DeployConfig::default();
        config.deploy.command_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn remote_name_with_spaces_is_rejected() {
        let mut config = DeployConfig::default();
        config.remote.name = "my origin".to_string();
        assert!(config.validate().is_err());
    }
}
