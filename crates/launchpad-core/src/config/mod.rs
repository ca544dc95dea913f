//! Deploy configuration
//!
//! Built-in defaults describe the project this tool was written for; a
//! `launchpad.toml` in the project root (or an explicit `--config` path)
//! overrides any subset of them.

pub mod parser;
pub mod schema;

use std::path::{Path, PathBuf};

use anyhow::Result;

pub use parser::{parse_launchpad_toml, parse_launchpad_toml_str, to_toml};
pub use schema::{DeployConfig, DeploySettings, RemoteConfig, ValidationConfig};

/// Config file looked up in the project root when no path is given.
pub const CONFIG_FILE_NAME: &str = "launchpad.toml";

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    BuiltIn,
    File(PathBuf),
}

/// Resolve the effective configuration for a project.
///
/// An explicit path must exist. Without one, `launchpad.toml` in the project
/// root is used if present, otherwise the built-in defaults.
pub fn load_config(
    project_root: &Path,
    explicit: Option<&Path>,
) -> Result<(DeployConfig, ConfigSource)> {
    if let Some(path) = explicit {
        return load_explicit_config(project_root, path);
    }

    let candidate = project_root.join(CONFIG_FILE_NAME);
    if candidate.is_file() {
        let config = parse_launchpad_toml(&candidate)?;
        tracing::debug!(path = %candidate.display(), "loaded project config");
        return Ok((config, ConfigSource::File(candidate)));
    }

    Ok((DeployConfig::default(), ConfigSource::BuiltIn))
}

/// Load a config file named on the command line. Relative paths resolve
/// against `base`, normally the invocation directory.
pub fn load_explicit_config(base: &Path, path: &Path) -> Result<(DeployConfig, ConfigSource)> {
    let path = base.join(path);
    let config = parse_launchpad_toml(&path)?;
    tracing::debug!(path = %path.display(), "loaded explicit config");
    Ok((config, ConfigSource::File(path)))
}
