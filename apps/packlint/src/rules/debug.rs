use super::{scan, Rule, RuleContext};
use crate::error::RuleError;
use crate::files;
use crate::models::{Finding, Report};

pub struct DebugRule;

impl Rule for DebugRule {
    fn id(&self) -> &'static str {
        "debug"
    }

    fn name(&self) -> &'static str {
        "Debug Statements"
    }

    fn description(&self) -> &'static str {
        "Leftover debug statements in scripts, functions and JSON"
    }

    fn validate(&self, ctx: &RuleContext<'_>) -> Result<Report, RuleError> {
        let mut report = Report::new();
        let patterns: Vec<(&str, String)> = ctx
            .settings
            .debug_statement_patterns
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| (p.as_str(), p.to_lowercase()))
            .collect();
        if patterns.is_empty() {
            return Ok(report);
        }
        for (_, file) in scan::package_files(ctx.packs, files::SOURCE_EXT) {
            let Some(text) = files::text_or_skip(&file) else {
                continue;
            };
            for (i, line) in text.lines().enumerate() {
                let lower = line.to_lowercase();
                for (pattern, needle) in &patterns {
                    if lower.contains(needle.as_str()) {
                        report.add(
                            Finding::warning(format!("Debug statement '{}' found", pattern))
                                .at(&file)
                                .line(i + 1)
                                .context("pattern", *pattern)
                                .context("line", line.trim()),
                        );
                    }
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::{NamespaceInfo, Severity};
    use crate::packs::PackPaths;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_each_hit_reports_its_line() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("BP/scripts")).unwrap();
        fs::create_dir_all(root.join("RP")).unwrap();
        fs::write(
            root.join("BP/scripts/main.js"),
            "import { world } from '@minecraft/server';\nConsole.Log('x');\n\ndebugger;\n",
        )
        .unwrap();
        fs::write(root.join("BP/scripts/notes.txt"), "console.log").unwrap();
        let settings = Settings::default();
        let packs = PackPaths::resolve(root);
        let ns = NamespaceInfo::default();
        let r = DebugRule
            .validate(&RuleContext {
                settings: &settings,
                packs: &packs,
                namespace: &ns,
            })
            .unwrap();
        assert_eq!(r.count(Severity::Warning), 2);
        let lines: Vec<Option<usize>> = r.findings().iter().map(|f| f.line_number).collect();
        assert_eq!(lines, vec![Some(2), Some(4)]);
        assert!(r.is_valid());
    }
}
