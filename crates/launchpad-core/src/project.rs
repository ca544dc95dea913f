use std::path::{Path, PathBuf};

use crate::config::CONFIG_FILE_NAME;

/// Discover the project root directory from an invocation directory.
///
/// Walks upward from `start` and returns the first directory holding the
/// manifest (e.g. `package.json`) or a `launchpad.toml`. Falls back to
/// `start` when none does.
pub fn discover_project_root(start: &Path, manifest: &str) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(manifest).is_file() || dir.join(CONFIG_FILE_NAME).is_file())
        .unwrap_or(start)
        .to_path_buf()
}

/// Resolve an explicit `--root` or discover one, returning a canonical path.
pub fn resolve_project_root(
    explicit: Option<&Path>,
    cwd: &Path,
    manifest: &str,
) -> anyhow::Result<PathBuf> {
    let root = match explicit {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => cwd.join(path),
        None => discover_project_root(cwd, manifest),
    };

    if !root.is_dir() {
        anyhow::bail!("Project root is not a directory: {}", root.display());
    }

    std::fs::canonicalize(&root)
        .map_err(|e| anyhow::anyhow!("Failed to resolve project root {}: {}", root.display(), e))
}
