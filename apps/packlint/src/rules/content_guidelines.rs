//! Content policy scan over the behavior pack.
//!
//! Keyword hits are possible issues for a reviewer to confirm. Weapon and
//! player-character keywords in JSON only count at definition paths. A
//! forbidden item crafted by a recipe is confirmed structurally and
//! reported as a warning instead.

use super::file_structure::{compressed_size, count_permutations, packaged_files};
use super::{scan, Rule, RuleContext};
use crate::classifier;
use crate::error::RuleError;
use crate::files;
use crate::json_walk::{walk, walk_strings};
use crate::models::{Finding, Report};
use regex::Regex;
use serde_json::Value as Json;
use std::collections::BTreeSet;
use std::path::Path;

const TERMINOLOGY: &[&str] = &["mod", "mods", "modded"];
const CHEATS: &[&str] = &[
    "invincibility",
    "invulnerability",
    "instakill",
    "auto_break",
    "auto_mine",
    "clipping",
    "aura",
    "aimbot",
    "console_command",
    "keep_inventory",
    "fire_tick",
    "grief_mobs",
    "player_locator",
    "inventory_locator",
];
const GENRES: &[&str] = &[
    "one_block",
    "skyblock",
    "lucky_block",
    "random_op",
    "x_ray",
    "xray",
    "dance_creator",
    "skin_generator",
    "resource_generator",
    "cape_generator",
];
const WEAPONS: &[&str] = &[
    "gun",
    "firearm",
    "rifle",
    "pistol",
    "shotgun",
    "sniper",
    "ammo",
    "bullet",
    "projectile_weapon",
];
const PLAYER: &[&str] = &[
    "player_character",
    "player_model",
    "player_skin",
    "player_entity",
    "minecraft:player",
    "player_modification",
];
const EXTERNAL: &[&str] = &[
    "patreon",
    "discord",
    "website",
    "download",
    "external_requirement",
    "external_dependency",
];
const FORBIDDEN_ITEMS: &[&str] = &[
    "horse_armor",
    "ender_pearl",
    "saddle",
    "portal_frame",
    "written_book",
];

const DOC_EXT: &[&str] = &["txt", "md"];
const MIN_FILES: usize = 5;

#[derive(Clone, Copy, PartialEq)]
enum Scope {
    /// Anywhere in the text.
    Lexical,
    /// Definition paths in JSON, anywhere in scripts.
    Definitions,
}

struct Category {
    label: &'static str,
    scope: Scope,
    keywords: Vec<(&'static str, Regex)>,
}

fn category(
    label: &'static str,
    scope: Scope,
    words: &[&'static str],
) -> Result<Category, regex::Error> {
    let keywords = words
        .iter()
        .map(|w| scan::keyword_regex(w).map(|re| (*w, re)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Category {
        label,
        scope,
        keywords,
    })
}

pub struct ContentGuidelinesRule;

impl Rule for ContentGuidelinesRule {
    fn id(&self) -> &'static str {
        "content-guidelines"
    }

    fn name(&self) -> &'static str {
        "Content Guidelines"
    }

    fn description(&self) -> &'static str {
        "Terminology, cheats, genres, weapons, player changes, external dependencies and forbidden items"
    }

    fn validate(&self, ctx: &RuleContext<'_>) -> Result<Report, RuleError> {
        let mut report = Report::new();
        let categories = vec![
            category("terminology", Scope::Lexical, TERMINOLOGY)?,
            category("cheat pattern", Scope::Lexical, CHEATS)?,
            category("disallowed genre", Scope::Lexical, GENRES)?,
            category("weapon", Scope::Definitions, WEAPONS)?,
            category("player character", Scope::Definitions, PLAYER)?,
        ];
        let external = category("external dependency", Scope::Lexical, EXTERNAL)?;
        let items = category("forbidden item", Scope::Lexical, FORBIDDEN_ITEMS)?;

        if let Some(bp) = ctx.packs.bp.as_deref() {
            for file in files::files_with_ext(bp, &["json", "js", "mcfunction", "txt", "md"]) {
                let Some(text) = files::text_or_skip(&file) else {
                    continue;
                };
                if files::has_ext(&file, DOC_EXT) {
                    scan_lexical(&text, &file, &external, &mut report);
                    continue;
                }
                let is_json = files::has_ext(&file, files::JSON_EXT);
                let json = if is_json { files::json_or_skip(&file) } else { None };
                for cat in categories.iter().chain(std::iter::once(&external)) {
                    match (cat.scope, is_json) {
                        (Scope::Definitions, true) => {
                            if let Some(json) = &json {
                                scan_definitions(json, &text, &file, cat, &mut report);
                            }
                        }
                        _ => scan_lexical(&text, &file, cat, &mut report),
                    }
                }
                let crafted = json.as_ref().map(recipe_outputs).unwrap_or_default();
                check_forbidden_items(&text, &file, &crafted, &items, &mut report);
            }
        }

        let packaged = packaged_files(ctx.packs, &ctx.settings.ignored_directories);
        if packaged.len() < MIN_FILES {
            report.add(
                Finding::warning(format!(
                    "Add-On has very few files ({}); make sure it has enough content for approval",
                    packaged.len()
                ))
                .context("total_files", packaged.len()),
            );
        }
        let size = compressed_size(&packaged)?;
        let permutations = count_permutations(ctx.packs);
        report.add(
            Finding::info(format!(
                "Compressed size {:.2} MB of {} MB; block permutations {} of {}",
                size as f64 / (1024.0 * 1024.0),
                ctx.settings.file_size_limit_mb,
                permutations,
                ctx.settings.block_permutation_limit
            ))
            .context("compressed_bytes", size)
            .context("permutations", permutations),
        );
        Ok(report)
    }
}

fn possible_issue(cat: &Category, keyword: &str, file: &Path, line: Option<usize>) -> Finding {
    let mut f = Finding::possible_issue(format!(
        "Possible {} keyword '{}'; review manually",
        cat.label, keyword
    ))
    .at(file)
    .context("category", cat.label)
    .context("keyword", keyword);
    if let Some(line) = line {
        f = f.line(line);
    }
    f
}

fn scan_lexical(text: &str, file: &Path, cat: &Category, report: &mut Report) {
    for (keyword, re) in &cat.keywords {
        if let Some(line) = scan::first_line(text, re) {
            report.add(possible_issue(cat, keyword, file, Some(line)));
        }
    }
}

fn scan_definitions(json: &Json, text: &str, file: &Path, cat: &Category, report: &mut Report) {
    let file_name = files::file_name(file);
    let mut hits: BTreeSet<&'static str> = BTreeSet::new();
    walk_strings(json, &mut |path, s| {
        if !classifier::is_definition(path, &file_name) {
            return;
        }
        for (keyword, re) in &cat.keywords {
            if re.is_match(s) {
                hits.insert(*keyword);
            }
        }
    });
    for (keyword, re) in &cat.keywords {
        if hits.contains(keyword) {
            report.add(possible_issue(cat, keyword, file, scan::first_line(text, re)));
        }
    }
}

/// Item identifiers produced by a recipe's `result` or `output`.
fn recipe_outputs(json: &Json) -> Vec<String> {
    let mut out = Vec::new();
    walk(json, &mut |path, node| {
        let key = path.rsplit('.').next().unwrap_or(path);
        if key != "result" && key != "output" {
            return;
        }
        let entries: Vec<&Json> = match node {
            Json::Array(items) => items.iter().collect(),
            other => vec![other],
        };
        for entry in entries {
            let id = match entry {
                Json::String(s) => Some(s.as_str()),
                Json::Object(_) => entry.get("item").and_then(|i| i.as_str()),
                _ => None,
            };
            if let Some(id) = id {
                out.push(id.to_ascii_lowercase());
            }
        }
    });
    out
}

fn check_forbidden_items(
    text: &str,
    file: &Path,
    crafted: &[String],
    items: &Category,
    report: &mut Report,
) {
    for (item, re) in &items.keywords {
        if let Some(id) = crafted.iter().find(|id| re.is_match(id)) {
            report.add(
                Finding::warning(format!(
                    "Recipe crafts forbidden item '{}'; crafting uncraftable items needs justification",
                    id
                ))
                .at(file)
                .context("item", *item),
            );
        } else if let Some(line) = scan::first_line(text, re) {
            report.add(possible_issue(items, item, file, Some(line)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::{NamespaceInfo, Severity};
    use crate::packs::PackPaths;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn write(path: &Path, body: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn run(root: &Path) -> Report {
        let settings = Settings::default();
        let packs = PackPaths::resolve(root);
        let ns = NamespaceInfo::default();
        ContentGuidelinesRule
            .validate(&RuleContext {
                settings: &settings,
                packs: &packs,
                namespace: &ns,
            })
            .unwrap()
    }

    fn keywords(r: &Report, severity: Severity) -> Vec<String> {
        r.findings()
            .iter()
            .filter(|f| f.severity == severity)
            .filter_map(|f| f.context.get("keyword").and_then(|k| k.as_str()))
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_lexical_hits_are_possible_issues() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write(
            &root.join("BP/scripts/ffs/ab/main.js"),
            "// modules loaded\nconst x = 1;\nif (aimbot) { openSkyblock(); }\nlet skyblock = true;\n",
        );
        write(&root.join("BP/docs/readme.md"), "Join our Discord for updates");
        let r = run(root);
        assert!(r.is_valid());
        let kws = keywords(&r, Severity::PossibleIssue);
        assert!(kws.contains(&"aimbot".to_string()));
        assert!(kws.contains(&"skyblock".to_string()));
        assert!(kws.contains(&"discord".to_string()));
        assert!(!kws.contains(&"mod".to_string()));
        let aimbot = r
            .findings()
            .iter()
            .find(|f| f.context.get("keyword").and_then(|k| k.as_str()) == Some("aimbot"))
            .unwrap();
        assert_eq!(aimbot.line_number, Some(3));
    }

    #[test]
    fn test_docs_scanned_for_external_dependencies_only() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write(&root.join("BP/docs/notes.txt"), "No aimbot here, but see our patreon");
        write(&root.join("BP/scripts/ffs/ab/main.js"), "// patreon supporters\n");
        let r = run(root);
        let kws = keywords(&r, Severity::PossibleIssue);
        assert_eq!(kws.iter().filter(|k| *k == "patreon").count(), 2);
        assert!(!kws.contains(&"aimbot".to_string()));
    }

    #[test]
    fn test_weapon_keywords_only_at_definitions() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write(
            &root.join("BP/items/ffs/ab/rifle.json"),
            &json!({"minecraft:item": {"description": {"identifier": "ffs_ab:rifle"}}}).to_string(),
        );
        write(
            &root.join("BP/loot_tables/ffs/ab/chest.json"),
            &json!({"pools": [{"entries": [{"name": "ffs_ab:pistol"}]}]}).to_string(),
        );
        let r = run(root);
        let kws = keywords(&r, Severity::PossibleIssue);
        assert_eq!(kws, vec!["rifle".to_string()]);
    }

    #[test]
    fn test_recipe_output_confirms_forbidden_item() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write(
            &root.join("BP/recipes/ffs/ab/saddle.json"),
            &json!({"minecraft:recipe_shaped": {
                "description": {"identifier": "ffs_ab:saddle_recipe"},
                "key": {"L": {"item": "minecraft:leather"}},
                "result": {"item": "minecraft:saddle"}
            }})
            .to_string(),
        );
        write(
            &root.join("BP/items/ffs/ab/pearl.json"),
            &json!({"minecraft:item": {"description": {"identifier": "ffs_ab:pearl"},
                "components": {"minecraft:icon": "ender_pearl"}}})
            .to_string(),
        );
        let r = run(root);
        assert_eq!(keywords(&r, Severity::PossibleIssue), vec!["ender_pearl".to_string()]);
        let warned: Vec<&Finding> = r
            .findings()
            .iter()
            .filter(|f| f.severity == Severity::Warning && f.message.contains("forbidden item"))
            .collect();
        assert_eq!(warned.len(), 1);
        assert_eq!(warned[0].context["item"], "saddle");
    }

    #[test]
    fn test_minimum_content_and_summary() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        write(&root.join("BP/manifest.json"), "{}");
        let r = run(root);
        assert!(r
            .findings()
            .iter()
            .any(|f| f.severity == Severity::Warning && f.message.contains("very few files (1)")));
        assert_eq!(r.count(Severity::Info), 1);
        assert_eq!(r.findings().last().unwrap().context["permutations"], 0);
    }

    #[test]
    fn test_recipe_output_shapes() {
        let outs = recipe_outputs(&json!({
            "minecraft:recipe_furnace": {"output": "minecraft:Saddle"},
            "minecraft:recipe_shapeless": {"result": [{"item": "a:b"}, "c:d"]}
        }));
        assert_eq!(outs, vec!["minecraft:saddle", "a:b", "c:d"]);
    }
}
