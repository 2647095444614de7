use super::{Rule, RuleContext};
use crate::error::RuleError;
use crate::files;
use crate::models::{Finding, Report};
use crate::packs::PackKind;
use serde_json::Value as Json;
use std::path::Path;

pub struct NamingRule;

/// Where identifiers of one asset kind live and how to read them.
struct AssetKind {
    kind: &'static str,
    label: &'static str,
    dir: &'static str,
    resource_only: bool,
    read: fn(&Json) -> Vec<String>,
}

const ASSETS: &[AssetKind] = &[
    AssetKind {
        kind: "geometry",
        label: "Geometry",
        dir: "models/entity",
        resource_only: true,
        read: geometry_ids,
    },
    AssetKind {
        kind: "animation",
        label: "Animation",
        dir: "animations",
        resource_only: false,
        read: animation_ids,
    },
    AssetKind {
        kind: "animation_controller",
        label: "Animation controller",
        dir: "animation_controllers",
        resource_only: false,
        read: animation_controller_ids,
    },
    AssetKind {
        kind: "render_controller",
        label: "Render controller",
        dir: "render_controllers",
        resource_only: true,
        read: render_controller_ids,
    },
];

impl Rule for NamingRule {
    fn id(&self) -> &'static str {
        "naming"
    }

    fn name(&self) -> &'static str {
        "Naming Conventions"
    }

    fn description(&self) -> &'static str {
        "Geometry, animation and render controller identifiers carry the namespace"
    }

    fn uses_namespace(&self) -> bool {
        true
    }

    fn validate(&self, ctx: &RuleContext<'_>) -> Result<Report, RuleError> {
        let mut report = Report::new();
        let Some(ns) = ctx.namespace.namespace() else {
            tracing::debug!("no namespace; naming checks skipped");
            return Ok(report);
        };
        for asset in ASSETS {
            let Some(prefix) = ctx.settings.naming_prefix(asset.kind, ns) else {
                continue;
            };
            let trees = ctx
                .packs
                .trees()
                .filter(|(kind, _)| !asset.resource_only || *kind == PackKind::Resource);
            for (_, tree) in trees {
                for file in files::files_with_ext(&tree.join(asset.dir), files::JSON_EXT) {
                    check_file(&file, asset, &prefix, &mut report);
                }
            }
        }
        Ok(report)
    }
}

fn check_file(file: &Path, asset: &AssetKind, prefix: &str, report: &mut Report) {
    let Some(json) = files::json_or_skip(file) else {
        return;
    };
    for id in (asset.read)(&json) {
        if !id.starts_with(prefix) {
            report.add(
                Finding::warning(format!(
                    "{} '{}' should start with '{}'",
                    asset.label, id, prefix
                ))
                .at(file)
                .context("identifier", id.as_str())
                .context("expected_prefix", prefix),
            );
        }
    }
}

/// `minecraft:geometry[].description.identifier`, plus legacy top-level
/// `geometry.*` keys.
fn geometry_ids(json: &Json) -> Vec<String> {
    let mut out: Vec<String> = json
        .get("minecraft:geometry")
        .and_then(|g| g.as_array())
        .into_iter()
        .flatten()
        .filter_map(|g| g.pointer("/description/identifier"))
        .filter_map(|i| i.as_str())
        .map(|s| s.to_string())
        .collect();
    if let Some(obj) = json.as_object() {
        out.extend(obj.keys().filter(|k| k.starts_with("geometry.")).cloned());
    }
    out
}

fn keys_of(json: &Json, section: &str) -> Vec<String> {
    json.get(section)
        .and_then(|s| s.as_object())
        .map(|m| m.keys().cloned().collect())
        .unwrap_or_default()
}

fn animation_ids(json: &Json) -> Vec<String> {
    keys_of(json, "animations")
}

fn animation_controller_ids(json: &Json) -> Vec<String> {
    keys_of(json, "animation_controllers")
}

fn render_controller_ids(json: &Json) -> Vec<String> {
    keys_of(json, "render_controllers")
}
