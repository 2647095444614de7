//! Output rendering for lint results and rule listings.
//!
//! Supports `human` (default) and `json` outputs. The JSON form of a lint
//! run is the same document the validator persists.

use crate::lint::{compose_report_json, Outcome};
use crate::models::{Finding, Severity};
use crate::rules::Registry;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

fn tag(sev: Severity, color: bool) -> (String, String) {
    let (icon, label) = match sev {
        Severity::Error => ("✖", "⟦error⟧"),
        Severity::Warning => ("▲", "⟦warn⟧"),
        Severity::PossibleIssue => ("●", "⟦review⟧"),
        Severity::Info => ("◆", "⟦info⟧"),
    };
    if !color {
        return (icon.to_string(), label.to_string());
    }
    match sev {
        Severity::Error => (icon.red().to_string(), label.red().bold().to_string()),
        Severity::Warning => (icon.yellow().to_string(), label.yellow().bold().to_string()),
        Severity::PossibleIssue => (
            icon.magenta().to_string(),
            label.magenta().bold().to_string(),
        ),
        Severity::Info => (icon.blue().to_string(), label.blue().bold().to_string()),
    }
}

/// One human line for a finding, without trailing newline.
pub fn format_finding(f: &Finding, color: bool) -> String {
    let (icon, label) = tag(f.severity, color);
    let location = match (&f.file_path, f.line_number) {
        (Some(p), Some(l)) => format!("{}:{}", p, l),
        (Some(p), None) => p.clone(),
        (None, _) => "-".to_string(),
    };
    let location = if color {
        location.bold().to_string()
    } else {
        location
    };
    format!("{} {} {} — {}", icon, label, location, f.message)
}

/// Print a lint outcome in the requested format.
pub fn print_lint(outcome: &Outcome, output: &str) {
    match output {
        "json" => {
            let doc = compose_report_json(&outcome.report, &outcome.namespace);
            println!(
                "{}",
                serde_json::to_string_pretty(&doc).unwrap_or_else(|_| doc.to_string())
            );
        }
        _ => {
            let color = use_colors(output);
            for f in outcome.report.findings() {
                println!("{}", format_finding(f, color));
            }
            let summary = summary_line(outcome);
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
            if let Some(path) = &outcome.report_file {
                println!("report: {}", path.display());
            }
        }
    }
}

pub fn summary_line(outcome: &Outcome) -> String {
    let r = &outcome.report;
    format!(
        "— Summary — {} errors={} warnings={} possible_issues={} infos={} files={} namespace={}",
        if r.is_valid() { "PASSED" } else { "FAILED" },
        r.count(Severity::Error),
        r.count(Severity::Warning),
        r.count(Severity::PossibleIssue),
        r.count(Severity::Info),
        r.files_checked(),
        outcome.namespace.namespace().unwrap_or("-")
    )
}

/// Print registered rules (`packlint rules`).
pub fn print_rules(registry: &Registry, output: &str) {
    match output {
        "json" => println!("{}", compose_rules_json(registry)),
        _ => {
            let color = use_colors(output);
            for rule in registry.ordered() {
                let id = if color {
                    rule.id().bold().to_string()
                } else {
                    rule.id().to_string()
                };
                println!("{:<20} {} — {}", id, rule.name(), rule.description());
            }
        }
    }
}

/// Print the execution order (`packlint order`).
pub fn print_order(registry: &Registry, output: &str) {
    match output {
        "json" => println!("{}", json!(registry.execution_order())),
        _ => {
            for (i, name) in registry.execution_order().iter().enumerate() {
                println!("{:>2}. {}", i, name);
            }
        }
    }
}

/// Compose the rule listing JSON (pure).
pub fn compose_rules_json(registry: &Registry) -> JsonVal {
    let rules: Vec<JsonVal> = registry
        .ordered()
        .enumerate()
        .map(|(i, r)| {
            json!({
                "position": i,
                "id": r.id(),
                "name": r.name(),
                "description": r.description(),
            })
        })
        .collect();
    json!({ "rules": rules })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NamespaceInfo, Report};
    use std::path::Path;

    #[test]
    fn test_format_finding_plain() {
        let f = Finding::warning("Debug statement 'console.log' found")
            .at(Path::new("BP/scripts/main.js"))
            .line(7);
        assert_eq!(
            format_finding(&f, false),
            "▲ ⟦warn⟧ BP/scripts/main.js:7 — Debug statement 'console.log' found"
        );
        let g = Finding::error("No namespace detected");
        assert!(format_finding(&g, false).starts_with("✖ ⟦error⟧ - —"));
    }

    #[test]
    fn test_summary_line_counts() {
        let mut report = Report::new();
        report.add(Finding::possible_issue("x"));
        report.add_files_checked(9);
        let outcome = Outcome {
            report,
            namespace: NamespaceInfo::from_namespace("ffs_ab"),
            report_file: None,
        };
        let s = summary_line(&outcome);
        assert!(s.contains("PASSED"));
        assert!(s.contains("possible_issues=1"));
        assert!(s.contains("files=9"));
        assert!(s.ends_with("namespace=ffs_ab"));
    }

    #[test]
    fn test_compose_rules_json_in_execution_order() {
        let out = compose_rules_json(&Registry::with_defaults());
        let rules = out["rules"].as_array().unwrap();
        assert_eq!(rules.len(), 11);
        assert_eq!(rules[0]["id"], "pack-structure");
        assert_eq!(rules[2]["name"], "Namespace Usage");
        assert_eq!(rules[10]["position"], 10);
    }
}
