//! Plugin inventory.
//!
//! Plugins are source files directly inside a category directory under the
//! plugin root. Known categories are always reported; any other
//! subdirectory is reported as a custom category when it holds plugins.

use std::io;
use std::path::Path;

use serde::Serialize;

use super::{CheckCategory, CheckReport};
use crate::config::ValidationConfig;
use crate::report::Finding;

/// Plugin count for one category directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
    pub custom: bool,
}

/// Plugin counts across all category directories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PluginInventory {
    pub categories: Vec<CategoryCount>,
}

impl PluginInventory {
    pub fn total(&self) -> usize {
        self.categories.iter().map(|c| c.count).sum()
    }
}

/// Count plugin files under `plugin_root`.
///
/// Known categories that exist are listed in configuration order (even when
/// empty); custom categories follow in name order and only when non-empty.
pub fn scan_plugins(
    plugin_root: &Path,
    known: &[String],
    extension: &str,
) -> io::Result<PluginInventory> {
    let mut inventory = PluginInventory::default();

    for name in known {
        let dir = plugin_root.join(name);
        if dir.is_dir() {
            inventory.categories.push(CategoryCount {
                name: name.clone(),
                count: count_plugin_files(&dir, extension)?,
                custom: false,
            });
        }
    }

    let mut custom = Vec::new();
    for entry in std::fs::read_dir(plugin_root)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if !path.is_dir() || known.contains(&name) {
            continue;
        }
        let count = count_plugin_files(&path, extension)?;
        if count > 0 {
            custom.push(CategoryCount {
                name,
                count,
                custom: true,
            });
        }
    }
    custom.sort_by(|a, b| a.name.cmp(&b.name));
    inventory.categories.extend(custom);

    Ok(inventory)
}

fn count_plugin_files(dir: &Path, extension: &str) -> io::Result<usize> {
    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            count += 1;
        }
    }
    Ok(count)
}

pub fn check_plugins(root: &Path, config: &ValidationConfig) -> CheckReport {
    let mut report = CheckReport::new(CheckCategory::Plugins);
    let plugin_root = root.join(&config.plugin_root);

    if !plugin_root.is_dir() {
        report.fail(format!("Directory {} not found", config.plugin_root));
        return report;
    }

    let inventory = match scan_plugins(
        &plugin_root,
        &config.plugin_categories,
        config.plugin_extension.trim_start_matches('.'),
    ) {
        Ok(inventory) => inventory,
        Err(e) => {
            report.fail(format!("Failed to scan {}: {}", config.plugin_root, e));
            return report;
        }
    };

    for category in &inventory.categories {
        let label = if category.custom {
            format!("{} (custom)", category.name)
        } else {
            category.name.clone()
        };
        report.push(Finding::ok(format!("{}: {} plugins", label, category.count)));
    }

    let total = inventory.total();
    report.push(Finding::info(format!("Total: {} plugins", total)));
    if total == 0 {
        report.fail("No plugins found");
    }

    report
}
