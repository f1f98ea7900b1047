//! # Validation Issues
//!
//! Structured findings returned by the validators. Issues serialize to JSON
//! for reports; `path` points into the project document the way a JSON
//! pointer would be written by hand (`edges[1].ocpd`).

use serde::{Deserialize, Serialize};

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Blocks analysis or indicates a code violation
    Error,
    /// Worth an engineer's attention, analysis continues
    Warning,
    /// Informational only
    Info,
}

/// One validator finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Finding severity
    pub severity: Severity,

    /// Stable machine-readable code (e.g., "TOPOLOGY_CYCLE")
    pub code: String,

    /// Location in the project document
    pub path: String,

    /// Human-readable explanation
    pub message: String,
}

impl Issue {
    /// Create an error-severity issue.
    pub fn error(
        code: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Issue {
            severity: Severity::Error,
            code: code.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a warning-severity issue.
    pub fn warning(
        code: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Issue {
            severity: Severity::Warning,
            code: code.into(),
            path: path.into(),
            message: message.into(),
        }
    }
}

/// True if any issue in the slice is an error.
pub fn has_errors(issues: &[Issue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}
