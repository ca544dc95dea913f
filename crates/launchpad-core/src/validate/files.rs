//! Required file presence.

use std::path::Path;

use super::{CheckCategory, CheckReport};
use crate::report::Finding;

/// Every path must exist relative to `root`; each missing one is reported.
pub fn check_required_files(root: &Path, required: &[String]) -> CheckReport {
    let mut report = CheckReport::new(CheckCategory::RequiredFiles);

    if required.is_empty() {
        report.push(Finding::info("No required files configured"));
        return report;
    }

    for file in required {
        if root.join(file).exists() {
            report.push(Finding::ok(file.as_str()));
        } else {
            report.fail(format!("{} - not found", file));
        }
    }

    report
}
