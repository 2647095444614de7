//! Namespace inference.
//!
//! Sources are scanned per tree (BP, then RP) in priority order: manifest,
//! entity, item, then block definitions, each searched up to five levels
//! deep. The first source yielding a candidate ends the scan and the
//! longest candidate wins, ties going to the first seen. Unreadable or
//! malformed files contribute nothing.

use crate::config::Settings;
use crate::files;
use crate::json_walk::{namespace_of, walk_strings};
use crate::models::NamespaceInfo;
use crate::packs::PackPaths;
use serde_json::Value as Json;
use std::path::{Path, PathBuf};

const DEFINITION_DIRS: &[&str] = &["entities", "items", "blocks"];
const WRAPPERS: &[&str] = &["minecraft:entity", "minecraft:item", "minecraft:block"];
const ID_KEYS: &[&str] = &["identifier", "name", "id"];
const MAX_DEPTH: usize = 5;

pub fn extract(packs: &PackPaths, settings: &Settings) -> NamespaceInfo {
    for (kind, tree) in packs.trees() {
        for source in sources(tree) {
            let mut candidates: Vec<String> = Vec::new();
            for file in &source {
                if let Some(json) = files::json_or_skip(file) {
                    collect_candidates(&json, settings, &mut candidates);
                }
            }
            if let Some(best) = longest(&candidates) {
                tracing::info!(namespace = best, pack = %kind, "detected namespace");
                return NamespaceInfo::from_namespace(best);
            }
        }
    }
    tracing::warn!("no namespace detected; namespace-dependent checks are limited");
    NamespaceInfo::default()
}

/// File groups for one tree, in priority order.
fn sources(tree: &Path) -> Vec<Vec<PathBuf>> {
    let mut out = vec![vec![tree.join("manifest.json")]];
    for dir in DEFINITION_DIRS {
        out.push(glob_depth(&tree.join(dir), MAX_DEPTH));
    }
    out
}

fn glob_depth(dir: &Path, max_depth: usize) -> Vec<PathBuf> {
    let base = glob::Pattern::escape(&dir.to_string_lossy());
    let mut found = Vec::new();
    for depth in 1..=max_depth {
        let mut pattern = base.clone();
        for _ in 1..depth {
            pattern.push_str("/*");
        }
        pattern.push_str("/*.json");
        match glob::glob(&pattern) {
            Ok(paths) => found.extend(paths.flatten()),
            Err(e) => tracing::debug!(error = %e, pattern = %pattern, "bad glob pattern"),
        }
    }
    found
}

fn collect_candidates(json: &Json, settings: &Settings, out: &mut Vec<String>) {
    let mut push = |value: &str| {
        if let Some(ns) = namespace_of(value) {
            if !settings.is_forbidden_namespace(ns) && !out.iter().any(|c| c == ns) {
                out.push(ns.to_string());
            }
        }
    };
    for wrapper in WRAPPERS {
        if let Some(id) = json
            .get(wrapper)
            .and_then(|w| w.get("description"))
            .and_then(|d| d.get("identifier"))
            .and_then(|i| i.as_str())
        {
            push(id);
        }
    }
    walk_strings(json, &mut |path, s| {
        let key = path.rsplit('.').next().unwrap_or(path);
        if ID_KEYS.contains(&key) {
            push(s);
        }
    });
}

fn longest(candidates: &[String]) -> Option<&str> {
    let mut best: Option<&str> = None;
    for c in candidates {
        if best.map_or(true, |b| c.len() > b.len()) {
            best = Some(c);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn write_json(path: &Path, value: &Json) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    }

    #[test]
    fn test_entity_namespace_and_split() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write_json(
            &root.join("BP/manifest.json"),
            &json!({"header": {"name": "Pack"}}),
        );
        write_json(
            &root.join("BP/entities/ffs/ab/pig.json"),
            &json!({"minecraft:entity": {"description": {"identifier": "ffs_ab:pig"}}}),
        );
        let ns = extract(&PackPaths::resolve(root), &Settings::default());
        assert_eq!(ns.namespace(), Some("ffs_ab"));
        assert_eq!(ns.studio_name.as_deref(), Some("ffs"));
        assert_eq!(ns.pack_name.as_deref(), Some("ab"));
    }

    #[test]
    fn test_manifest_title_with_colon_is_not_a_namespace() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write_json(
            &root.join("BP/manifest.json"),
            &json!({"header": {"name": "Sky Castles: Reborn", "description": "Build: explore"}}),
        );
        write_json(
            &root.join("BP/entities/ffs/ab/pig.json"),
            &json!({"minecraft:entity": {"description": {"identifier": "ffs_ab:pig"}}}),
        );
        let ns = extract(&PackPaths::resolve(root), &Settings::default());
        assert_eq!(ns.namespace(), Some("ffs_ab"));
        assert_eq!(ns.studio_name.as_deref(), Some("ffs"));
    }

    #[test]
    fn test_forbidden_discarded_and_longest_wins() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write_json(
            &root.join("BP/items/a.json"),
            &json!({
                "minecraft:item": {"description": {"identifier": "minecraft:stick"}},
                "events": {"drop": {"name": "ab:x"}, "spawn": {"id": "studio_pack:y"}}
            }),
        );
        let ns = extract(&PackPaths::resolve(root), &Settings::default());
        assert_eq!(ns.namespace(), Some("studio_pack"));
    }

    #[test]
    fn test_earlier_source_stops_scan() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write_json(
            &root.join("BP/entities/e.json"),
            &json!({"minecraft:entity": {"description": {"identifier": "ab_cd:e"}}}),
        );
        write_json(
            &root.join("BP/blocks/b.json"),
            &json!({"minecraft:block": {"description": {"identifier": "much_longer_ns:b"}}}),
        );
        let ns = extract(&PackPaths::resolve(root), &Settings::default());
        assert_eq!(ns.namespace(), Some("ab_cd"));
    }

    #[test]
    fn test_depth_limit_and_malformed_files() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("BP/entities")).unwrap();
        fs::write(root.join("BP/entities/broken.json"), "{").unwrap();
        write_json(
            &root.join("BP/entities/1/2/3/4/5/deep.json"),
            &json!({"minecraft:entity": {"description": {"identifier": "too_deep:e"}}}),
        );
        let ns = extract(&PackPaths::resolve(root), &Settings::default());
        assert_eq!(ns, NamespaceInfo::default());
    }

    #[test]
    fn test_ties_go_to_first_seen() {
        let mut out = Vec::new();
        collect_candidates(
            &json!({"a": {"id": "abc:x"}, "b": {"id": "xyz:y"}}),
            &Settings::default(),
            &mut out,
        );
        assert_eq!(longest(&out), Some("abc"));
    }
}
