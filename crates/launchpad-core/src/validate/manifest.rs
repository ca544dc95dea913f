//! `package.json` structure.
//!
//! Missing top-level fields fail the check; missing recommended scripts
//! only warn.

use std::path::Path;

use serde_json::{Map, Value};

use super::{CheckCategory, CheckReport};
use crate::config::ValidationConfig;
use crate::report::Finding;

pub fn check_manifest(root: &Path, config: &ValidationConfig) -> CheckReport {
    let mut report = CheckReport::new(CheckCategory::Manifest);
    let name = config.manifest.as_str();

    let manifest = match load_manifest(&root.join(name)) {
        Ok(manifest) => manifest,
        Err(message) => {
            report.fail(format!("Error reading {}: {}", name, message));
            return report;
        }
    };

    for field in &config.required_fields {
        if manifest.contains_key(field) {
            report.push(Finding::ok(format!("Field '{}' present", field)));
        } else {
            report.fail(format!("Field '{}' is missing", field));
        }
    }

    let scripts = manifest.get("scripts");
    if let Some(value) = scripts
        && !value.is_object()
    {
        report.push(Finding::warn("'scripts' is not an object"));
    }
    let scripts = scripts.and_then(Value::as_object);

    for script in &config.recommended_scripts {
        if scripts.is_some_and(|s| s.contains_key(script)) {
            report.push(Finding::ok(format!("Script '{}' present", script)));
        } else {
            report.push(Finding::warn(format!("Script '{}' is missing", script)));
        }
    }

    report
}

fn load_manifest(path: &Path) -> Result<Map<String, Value>, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    match serde_json::from_str::<Value>(&content).map_err(|e| e.to_string())? {
        Value::Object(map) => Ok(map),
        _ => Err("top-level value is not a JSON object".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::FindingLevel;
    use tempfile::TempDir;

    fn project_with_manifest(content: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("package.json"), content).unwrap();
        temp
    }

    fn warnings(report: &CheckReport) -> Vec<&str> {
        report
            .findings
            .iter()
            .filter(|f| f.level == FindingLevel::Warn)
            .map(|f| f.message.as_str())
            .collect()
    }

    #[test]
    fn complete_manifest_passes_without_warnings() {
        let temp = project_with_manifest(
            r#"{"name":"api","version":"1.0.0","scripts":{"dev":"next dev","build":"next build","start":"next start"}}"#,
        );
        let report = check_manifest(temp.path(), &ValidationConfig::default());
        assert!(report.passed);
        assert!(warnings(&report).is_empty());
    }

    #[test]
    fn each_required_field_fails_independently() {
        let full = serde_json::json!({"name": "api", "version": "1.0.0", "scripts": {}});
        for field in ["name", "version", "scripts"] {
            let mut manifest = full.clone();
            manifest.as_object_mut().unwrap().remove(field);
            let temp = project_with_manifest(&manifest.to_string());

            let report = check_manifest(temp.path(), &ValidationConfig::default());
            assert!(!report.passed, "missing '{}' should fail", field);
            assert!(
                report
                    .findings
                    .contains(&Finding::error(format!("Field '{}' is missing", field)))
            );
        }
    }

    #[test]
    fn missing_scripts_only_warn() {
        let temp =
            project_with_manifest(r#"{"name":"api","version":"1.0.0","scripts":{"dev":"x"}}"#);
        let report = check_manifest(temp.path(), &ValidationConfig::default());
        assert!(report.passed);
        assert_eq!(
            warnings(&report),
            vec!["Script 'build' is missing", "Script 'start' is missing"]
        );
    }

    #[test]
    fn non_object_scripts_warns() {
        let temp = project_with_manifest(r#"{"name":"api","version":"1.0.0","scripts":"dev"}"#);
        let report = check_manifest(temp.path(), &ValidationConfig::default());
        assert!(report.passed);
        assert!(warnings(&report).contains(&"'scripts' is not an object"));
    }

    #[test]
    fn invalid_json_fails() {
        let temp = project_with_manifest("{ not json");
        let report = check_manifest(temp.path(), &ValidationConfig::default());
        assert!(!report.passed);
        assert!(report.findings[0].message.starts_with("Error reading package.json"));
    }

    #[test]
    fn array_manifest_fails() {
        let temp = project_with_manifest("[]");
        let report = check_manifest(temp.path(), &ValidationConfig::default());
        assert!(!report.passed);
    }

    #[test]
    fn missing_manifest_fails() {
        let temp = TempDir::new().unwrap();
        let report = check_manifest(temp.path(), &ValidationConfig::default());
        assert!(!report.passed);
    }
}
