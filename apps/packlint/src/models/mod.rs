//! Shared data models for findings, reports, and namespace facts.

pub mod namespace;
pub mod report;

pub use namespace::NamespaceInfo;
pub use report::Report;

use serde::Serialize;
use serde_json::{Map, Value as Json};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
/// Severity of a finding. Only `Error` affects validity.
pub enum Severity {
    /// Structurally confirmed violation.
    Error,
    /// Confirmed but non-blocking issue.
    Warning,
    /// Lexical/heuristic match that needs a human to look at it.
    PossibleIssue,
    Info,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Error,
        Severity::Warning,
        Severity::PossibleIssue,
        Severity::Info,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            Severity::Error => 0,
            Severity::Warning => 1,
            Severity::PossibleIssue => 2,
            Severity::Info => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::PossibleIssue => "possible_issue",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A single finding with severity and optional location.
///
/// Built with the chained constructors below; once pushed into a
/// [`Report`] it is only reachable through shared references.
pub struct Finding {
    #[serde(rename = "level")]
    pub severity: Severity,
    pub message: String,
    pub file_path: Option<String>,
    pub line_number: Option<usize>,
    pub context: Map<String, Json>,
}

impl Finding {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Finding {
            severity,
            message: message.into(),
            file_path: None,
            line_number: None,
            context: Map::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn possible_issue(message: impl Into<String>) -> Self {
        Self::new(Severity::PossibleIssue, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn at(mut self, path: &Path) -> Self {
        self.file_path = Some(path.to_string_lossy().to_string());
        self
    }

    pub fn line(mut self, line: usize) -> Self {
        self.line_number = Some(line);
        self
    }

    pub fn context(mut self, key: &str, value: impl Into<Json>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_serializes_level_key() {
        let f = Finding::possible_issue("keyword")
            .at(Path::new("BP/scripts/main.js"))
            .line(4)
            .context("keyword", "aimbot");
        let v = serde_json::to_value(&f).unwrap();
        assert_eq!(v["level"], "possible_issue");
        assert_eq!(v["file_path"], "BP/scripts/main.js");
        assert_eq!(v["line_number"], 4);
        assert_eq!(v["context"]["keyword"], "aimbot");
    }
}
