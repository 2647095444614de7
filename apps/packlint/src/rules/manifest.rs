//! Manifest checks for both packs.
//!
//! Optional fields are validated only when present; required ones produce
//! a single error each when missing.

use super::{Rule, RuleContext};
use crate::error::RuleError;
use crate::files;
use crate::models::{Finding, Report};
use crate::packs::{PackKind, PackPaths};
use regex::Regex;
use serde_json::Value as Json;
use std::path::{Path, PathBuf};

const REQUIRED_SECTIONS: &[&str] = &["format_version", "header", "modules"];
const REQUIRED_HEADER: &[&str] = &["name", "description", "uuid", "version", "min_engine_version"];

pub struct ManifestRule;

impl Rule for ManifestRule {
    fn id(&self) -> &'static str {
        "manifest"
    }

    fn name(&self) -> &'static str {
        "Manifest Validation"
    }

    fn description(&self) -> &'static str {
        "Manifest sections, header fields, scope, product type and versions"
    }

    fn validate(&self, ctx: &RuleContext<'_>) -> Result<Report, RuleError> {
        let mut report = Report::new();
        let mod_word = Regex::new(r"(?i)\bmod\b")?;
        for kind in PackKind::BOTH {
            if ctx.packs.get(kind).is_none() {
                continue;
            }
            let searched = search_paths(ctx.packs, kind);
            let Some(path) = searched.iter().find(|p| p.is_file()) else {
                let listed: Vec<String> = searched
                    .iter()
                    .map(|p| p.to_string_lossy().to_string())
                    .collect();
                report.add(
                    Finding::error(format!(
                        "{} manifest.json not found; searched: {}",
                        kind,
                        listed.join(", ")
                    ))
                    .context("pack", kind.label()),
                );
                continue;
            };
            match files::load_json(path) {
                Ok(manifest) => check_manifest(&manifest, path, &mod_word, &mut report),
                Err(e) => report.add(
                    Finding::error(format!("{} manifest is not readable JSON: {}", kind, e)).at(path),
                ),
            }
        }
        Ok(report)
    }
}

/// The resolved tree's manifest first, then every candidate tree.
fn search_paths(packs: &PackPaths, kind: PackKind) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::new();
    if let Some(tree) = packs.get(kind) {
        out.push(tree.join("manifest.json"));
    }
    for dir in packs.searched(kind) {
        let p = dir.join("manifest.json");
        if !out.contains(&p) {
            out.push(p);
        }
    }
    out
}

fn check_manifest(manifest: &Json, path: &Path, mod_word: &Regex, report: &mut Report) {
    for section in REQUIRED_SECTIONS {
        if manifest.get(section).is_none() {
            report.add(
                Finding::error(format!("Manifest missing required section '{}'", section))
                    .at(path)
                    .context("section", *section),
            );
        }
    }

    if let Some(header) = manifest.get("header") {
        for field in REQUIRED_HEADER {
            if header.get(field).is_none() {
                report.add(
                    Finding::error(format!("Manifest header missing required field '{}'", field))
                        .at(path)
                        .context("field", *field),
                );
            }
        }
        match header.get("pack_scope").and_then(|v| v.as_str()) {
            Some("world") => {}
            Some(other) => report.add(
                Finding::error(format!("Manifest header.pack_scope is '{}', must be 'world'", other))
                    .at(path),
            ),
            None => report.add(
                Finding::error("Manifest header.pack_scope is missing; it must be 'world'")
                    .at(path),
            ),
        }
        if let Some(v) = header.get("min_engine_version") {
            if !is_version(v, 2, None) {
                report.add(
                    Finding::error(
                        "Manifest header.min_engine_version must be an array of at least 2 non-negative integers",
                    )
                    .at(path)
                    .context("value", v.clone()),
                );
            }
        }
        if let Some(v) = header.get("version") {
            if !is_version(v, 3, Some(3)) {
                report.add(
                    Finding::error(
                        "Manifest header.version must be [major, minor, patch] of non-negative integers",
                    )
                    .at(path)
                    .context("value", v.clone()),
                );
            }
        }
        if let Some(name) = header.get("name").and_then(|v| v.as_str()) {
            check_title(name, path, mod_word, report);
        }
    }

    let product_type = manifest
        .get("metadata")
        .and_then(|m| m.get("product_type"))
        .and_then(|v| v.as_str());
    if product_type != Some("addon") {
        report.add(
            Finding::error(format!(
                "Manifest metadata.product_type must be 'addon' (found {})",
                product_type.map_or("nothing".to_string(), |p| format!("'{}'", p))
            ))
            .at(path),
        );
    }

    let has_deps = manifest
        .get("dependencies")
        .and_then(|d| d.as_array())
        .is_some_and(|d| !d.is_empty());
    if !has_deps {
        report.add(Finding::error("Manifest dependencies must be a non-empty list").at(path));
    }
}

fn is_version(v: &Json, min_len: usize, max_len: Option<usize>) -> bool {
    let Some(parts) = v.as_array() else {
        return false;
    };
    parts.len() >= min_len
        && max_len.map_or(true, |m| parts.len() <= m)
        && parts.iter().all(|p| p.as_u64().is_some())
}

fn check_title(name: &str, path: &Path, mod_word: &Regex, report: &mut Report) {
    let lower = name.to_lowercase();
    if lower.contains("add-on") || lower.contains("addon") {
        report.add(
            Finding::warning(format!(
                "Pack title '{}' should not contain 'Add-On'; it is appended by the store",
                name
            ))
            .at(path),
        );
    }
    if mod_word.is_match(name) {
        report.add(
            Finding::possible_issue(format!("Pack title '{}' uses the word 'mod'", name)).at(path),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::{NamespaceInfo, Severity};
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn good_manifest() -> Json {
        json!({
            "format_version": 2,
            "header": {
                "name": "Sky Castles",
                "description": "Castles in the sky",
                "uuid": "5d3a2e8c-0000-4000-8000-000000000001",
                "version": [1, 0, 0],
                "min_engine_version": [1, 20, 80],
                "pack_scope": "world"
            },
            "modules": [{"type": "data", "uuid": "5d3a2e8c-0000-4000-8000-000000000002", "version": [1, 0, 0]}],
            "dependencies": [{"uuid": "5d3a2e8c-0000-4000-8000-000000000003", "version": [1, 0, 0]}],
            "metadata": {"product_type": "addon"}
        })
    }

    fn run_with(bp_manifest: Option<Json>) -> Report {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("BP")).unwrap();
        fs::create_dir_all(root.join("RP")).unwrap();
        if let Some(m) = bp_manifest {
            fs::write(root.join("BP/manifest.json"), m.to_string()).unwrap();
        }
        fs::write(root.join("RP/manifest.json"), good_manifest().to_string()).unwrap();
        let settings = Settings::default();
        let packs = PackPaths::resolve(root);
        let ns = NamespaceInfo::default();
        ManifestRule
            .validate(&RuleContext {
                settings: &settings,
                packs: &packs,
                namespace: &ns,
            })
            .unwrap()
    }

    #[test]
    fn test_well_formed_manifest_is_clean() {
        assert!(run_with(Some(good_manifest())).findings().is_empty());
    }

    #[test]
    fn test_missing_pack_scope_is_single_error() {
        let mut m = good_manifest();
        m["header"].as_object_mut().unwrap().remove("pack_scope");
        let r = run_with(Some(m));
        assert_eq!(r.count(Severity::Error), 1);
        assert!(r.findings()[0].message.contains("pack_scope"));
    }

    #[test]
    fn test_version_shapes() {
        let mut m = good_manifest();
        m["header"]["version"] = json!([1, 0]);
        m["header"]["min_engine_version"] = json!([1, -20]);
        let r = run_with(Some(m));
        assert_eq!(r.count(Severity::Error), 2);
        assert!(is_version(&json!([1, 21]), 2, None));
        assert!(is_version(&json!([1, 21, 0, 4]), 2, None));
        assert!(!is_version(&json!([1, 0, 0, 0]), 3, Some(3)));
        assert!(!is_version(&json!("1.0.0"), 3, Some(3)));
    }

    #[test]
    fn test_missing_sections_and_metadata() {
        let r = run_with(Some(json!({"format_version": 2})));
        let msgs: Vec<&str> = r.findings().iter().map(|f| f.message.as_str()).collect();
        assert!(msgs.iter().any(|m| m.contains("'header'")));
        assert!(msgs.iter().any(|m| m.contains("'modules'")));
        assert!(msgs.iter().any(|m| m.contains("product_type")));
        assert!(msgs.iter().any(|m| m.contains("dependencies")));
        assert_eq!(r.count(Severity::Error), 4);
    }

    #[test]
    fn test_missing_manifest_lists_searched_paths() {
        let r = run_with(None);
        assert_eq!(r.count(Severity::Error), 1);
        let msg = &r.findings()[0].message;
        assert!(msg.starts_with("BP manifest.json not found"));
        assert!(msg.contains("packs/BP"));
        assert!(msg.contains("behavior_pack"));
    }

    #[test]
    fn test_title_wording() {
        let mut m = good_manifest();
        m["header"]["name"] = json!("Castle Mod Add-On");
        let r = run_with(Some(m));
        assert_eq!(r.count(Severity::Warning), 1);
        assert_eq!(r.count(Severity::PossibleIssue), 1);
        assert!(r.is_valid());
    }
}
