//! Human-readable findings shared by checks and deploy steps.

use serde::Serialize;

/// Severity of a single finding line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingLevel {
    /// Something was verified or done
    Ok,
    /// Neutral information (counts, hints)
    Info,
    /// Soft failure, never fatal
    Warn,
    /// Hard failure for the owning check or step
    Error,
}

/// One line of feedback attached to a check or step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub level: FindingLevel,
    pub message: String,
}

impl Finding {
    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(FindingLevel::Ok, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FindingLevel::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(FindingLevel::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(FindingLevel::Error, message)
    }

    fn new(level: FindingLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Count findings at a given level.
pub fn count_level(findings: &[Finding], level: FindingLevel) -> usize {
    findings.iter().filter(|f| f.level == level).count()
}
