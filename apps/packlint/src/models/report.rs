//! Aggregatable validation report.
//!
//! Counts are maintained alongside the findings list so that
//! `count(Error)` always equals the number of error findings. Merging
//! appends the other report's findings after this report's own.

use super::{Finding, Severity};
use crate::files;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    files_checked: usize,
    counts: [usize; 4],
    findings: Vec<Finding>,
    namespace_usage: BTreeMap<String, BTreeSet<String>>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report holding exactly one finding.
    pub fn single(finding: Finding) -> Self {
        let mut r = Self::new();
        r.add(finding);
        r
    }

    pub fn add(&mut self, finding: Finding) {
        self.counts[finding.severity.index()] += 1;
        self.findings.push(finding);
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.counts[severity.index()]
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn files_checked(&self) -> usize {
        self.files_checked
    }

    pub fn add_files_checked(&mut self, n: usize) {
        self.files_checked += n;
    }

    pub fn record_namespace(&mut self, namespace: &str, file: &str) {
        self.namespace_usage
            .entry(namespace.to_string())
            .or_default()
            .insert(file.to_string());
    }

    pub fn namespace_usage(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.namespace_usage
    }

    /// Valid when no error was recorded; warnings and possible issues never
    /// affect the outcome.
    pub fn is_valid(&self) -> bool {
        self.count(Severity::Error) == 0
    }

    /// Rewrite finding paths under `root` as `/`-joined relative paths.
    /// Paths outside `root` and already-relative paths are left alone.
    pub fn relativize(&mut self, root: &Path) {
        for f in &mut self.findings {
            let rel = match f.file_path.as_deref().map(Path::new) {
                Some(p) if p.starts_with(root) => files::rel_parts(p, root).join("/"),
                _ => continue,
            };
            if !rel.is_empty() {
                f.file_path = Some(rel);
            }
        }
    }

    /// Append `other` after the findings already held.
    pub fn merge(&mut self, other: Report) {
        self.files_checked += other.files_checked;
        for s in Severity::ALL {
            self.counts[s.index()] += other.counts[s.index()];
        }
        self.findings.extend(other.findings);
        for (ns, files) in other.namespace_usage {
            self.namespace_usage.entry(ns).or_default().extend(files);
        }
    }

    pub fn merged(mut a: Report, b: Report) -> Report {
        a.merge(b);
        a
    }
}

impl FromIterator<Report> for Report {
    fn from_iter<I: IntoIterator<Item = Report>>(iter: I) -> Self {
        let mut out = Report::new();
        for r in iter {
            out.merge(r);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(prefix: &str, levels: &[Severity]) -> Report {
        let mut r = Report::new();
        for (i, s) in levels.iter().enumerate() {
            r.add(Finding::new(*s, format!("{}-{}", prefix, i)));
        }
        r
    }

    fn errors_in(r: &Report) -> usize {
        r.findings()
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    }

    #[test]
    fn test_counts_track_findings() {
        let r = sample(
            "a",
            &[Severity::Error, Severity::Warning, Severity::Error, Severity::Info],
        );
        assert_eq!(r.count(Severity::Error), errors_in(&r));
        assert_eq!(r.count(Severity::Error), 2);
        assert_eq!(r.count(Severity::Warning), 1);
        assert_eq!(r.count(Severity::PossibleIssue), 0);
        assert!(!r.is_valid());
    }

    #[test]
    fn test_validity_ignores_non_errors() {
        let r = sample(
            "a",
            &[Severity::Warning, Severity::PossibleIssue, Severity::PossibleIssue],
        );
        assert!(r.is_valid());
        assert!(Report::new().is_valid());
    }

    #[test]
    fn test_merge_sums_counts_and_keeps_order() {
        let a = sample("a", &[Severity::Error, Severity::PossibleIssue]);
        let b = sample("b", &[Severity::Warning, Severity::Error, Severity::Info]);
        let m = Report::merged(a.clone(), b.clone());
        for s in Severity::ALL {
            assert_eq!(m.count(s), a.count(s) + b.count(s));
        }
        let expected: Vec<&Finding> = a.findings().iter().chain(b.findings()).collect();
        let actual: Vec<&Finding> = m.findings().iter().collect();
        assert_eq!(actual, expected);
        assert_eq!(m.count(Severity::Error), errors_in(&m));

        // Totals do not depend on merge order; findings order does.
        let rev = Report::merged(b, a);
        for s in Severity::ALL {
            assert_eq!(rev.count(s), m.count(s));
        }
        assert_eq!(rev.findings()[0].message, "b-0");
    }

    #[test]
    fn test_merge_unions_namespace_usage() {
        let mut a = Report::new();
        a.record_namespace("ffs_ab", "BP/entities/a.json");
        a.add_files_checked(2);
        let mut b = Report::new();
        b.record_namespace("ffs_ab", "BP/items/b.json");
        b.record_namespace("ffs_ab", "BP/entities/a.json");
        b.add_files_checked(3);
        let m: Report = vec![a, b].into_iter().collect();
        assert_eq!(m.files_checked(), 5);
        assert_eq!(m.namespace_usage()["ffs_ab"].len(), 2);
    }

    #[test]
    fn test_relativize_paths_under_root() {
        let mut r = Report::new();
        r.add(Finding::warning("a").at(Path::new("/p/BP/scripts/main.js")));
        r.add(Finding::warning("b").at(Path::new("/elsewhere/x.json")));
        r.add(Finding::warning("c").at(Path::new("BP/manifest.json")));
        r.add(Finding::warning("d"));
        r.relativize(Path::new("/p"));
        let paths: Vec<Option<&str>> = r.findings().iter().map(|f| f.file_path.as_deref()).collect();
        assert_eq!(
            paths,
            vec![
                Some("BP/scripts/main.js"),
                Some("/elsewhere/x.json"),
                Some("BP/manifest.json"),
                None
            ]
        );
    }
}
