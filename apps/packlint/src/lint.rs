//! Validation runner.
//!
//! Resolves the content trees, derives namespace facts once, runs the
//! registry and merges rule reports in registry order. Finding paths are
//! made relative to the project root. When enabled, the merged report is
//! persisted as JSON under the project root.

use crate::config::Settings;
use crate::models::{NamespaceInfo, Report, Severity};
use crate::namespace;
use crate::packs::PackPaths;
use crate::rules::registry::run_rule;
use crate::rules::{Registry, RuleContext};
use serde_json::{json, Value as Json};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Merged report plus the namespace facts it was produced with.
pub struct Outcome {
    pub report: Report,
    pub namespace: NamespaceInfo,
    /// Where the JSON report was written, if it was.
    pub report_file: Option<PathBuf>,
}

pub struct Validator {
    settings: Settings,
    packs: PackPaths,
    registry: Registry,
}

impl Validator {
    pub fn new(project_root: &Path, settings: Settings) -> Self {
        Self::with_registry(project_root, settings, Registry::with_defaults())
    }

    pub fn with_registry(project_root: &Path, settings: Settings, registry: Registry) -> Self {
        let packs = PackPaths::resolve(project_root);
        tracing::debug!(bp = ?packs.bp, rp = ?packs.rp, "resolved pack paths");
        Validator {
            settings,
            packs,
            registry,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn packs(&self) -> &PackPaths {
        &self.packs
    }

    /// Run every registered rule.
    pub fn run(&self) -> Outcome {
        let ns = namespace::extract(&self.packs, &self.settings);
        let report: Report = self
            .registry
            .run_all(&self.settings, &self.packs, &ns)
            .into_iter()
            .collect();
        self.finish(report, ns)
    }

    /// Run one rule by id or name. Namespace extraction only happens when
    /// the rule reads it. `None` when no such rule is registered.
    pub fn run_specific(&self, name: &str) -> Option<Outcome> {
        let rule = self.registry.get(name)?;
        let ns = if rule.uses_namespace() {
            namespace::extract(&self.packs, &self.settings)
        } else {
            NamespaceInfo::default()
        };
        let ctx = RuleContext {
            settings: &self.settings,
            packs: &self.packs,
            namespace: &ns,
        };
        let report = run_rule(rule, &ctx);
        Some(self.finish(report, ns))
    }

    fn finish(&self, mut report: Report, namespace: NamespaceInfo) -> Outcome {
        report.relativize(&self.packs.root);
        let mut outcome = Outcome {
            report,
            namespace,
            report_file: None,
        };
        if self.settings.generate_report {
            let path = self.packs.root.join(&self.settings.report_path);
            match persist(&compose_report_json(&outcome.report, &outcome.namespace), &path) {
                Ok(()) => outcome.report_file = Some(path),
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "could not write report")
                }
            }
        }
        outcome
    }
}

fn persist(doc: &Json, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(doc).map_err(io::Error::other)?;
    fs::write(path, body)
}

/// Compose the persisted report document (pure).
pub fn compose_report_json(report: &Report, namespace: &NamespaceInfo) -> Json {
    json!({
        "summary": {
            "total_files_checked": report.files_checked(),
            "total_errors": report.count(Severity::Error),
            "total_warnings": report.count(Severity::Warning),
            "total_info": report.count(Severity::Info),
            "total_possible_issues": report.count(Severity::PossibleIssue),
            "is_valid": report.is_valid(),
        },
        "results": report.findings(),
        "namespace_info": namespace,
        "namespace_usage": report.namespace_usage(),
    })
}
