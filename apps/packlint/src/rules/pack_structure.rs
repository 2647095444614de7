use super::{Rule, RuleContext};
use crate::error::RuleError;
use crate::models::{Finding, Report};
use crate::packs::PackKind;
use serde_json::Value as Json;

pub struct PackStructureRule;

impl Rule for PackStructureRule {
    fn id(&self) -> &'static str {
        "pack-structure"
    }

    fn name(&self) -> &'static str {
        "Pack Structure"
    }

    fn description(&self) -> &'static str {
        "Behavior and resource pack directories exist"
    }

    fn validate(&self, ctx: &RuleContext<'_>) -> Result<Report, RuleError> {
        let mut report = Report::new();
        for kind in PackKind::BOTH {
            if let Some(found) = ctx.packs.get(kind) {
                tracing::debug!(pack = %kind, path = %found.display(), "pack directory found");
                continue;
            }
            let searched: Vec<String> = ctx
                .packs
                .searched(kind)
                .iter()
                .map(|p| p.to_string_lossy().to_string())
                .collect();
            report.add(
                Finding::error(format!(
                    "{} directory not found; checked: {}",
                    kind,
                    searched.join(", ")
                ))
                .context(
                    "searched",
                    Json::Array(searched.into_iter().map(Json::String).collect()),
                ),
            );
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

    fn run(root: &std::path::Path) -> Report {
        let settings = Settings::default();
        let packs = PackPaths::resolve(root);
        let ns = NamespaceInfo::default();
        PackStructureRule
            .validate(&RuleContext {
                settings: &settings,
                packs: &packs,
                namespace: &ns,
            })
            .unwrap()
    }

    #[test]
    fn test_both_trees_present() {
        let tmp = tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("packs/BP/entities")).unwrap();
        fs::create_dir_all(tmp.path().join("RP")).unwrap();
        assert!(run(tmp.path()).findings().is_empty());
    }

    #[test]
    fn test_missing_resource_tree_lists_candidates() {
        let tmp = tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("behavior_pack")).unwrap();
        let r = run(tmp.path());
        assert_eq!(r.count(Severity::Error), 1);
        let f = &r.findings()[0];
        assert!(f.message.starts_with("RP directory not found"));
        assert!(f.message.contains("resource_pack"));
        assert_eq!(f.context["searched"].as_array().unwrap().len(), 6);
    }
}
