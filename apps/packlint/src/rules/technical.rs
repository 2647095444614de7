//! Technical restrictions. Every finding here is an error, except the
//! experimental-feature scan which only warns.
//!
//! Identifier hits go through [`classifier::is_definition`] so that
//! references to vanilla content (recipe results, loot entries) are not
//! reported as overrides.

use super::{scan, Rule, RuleContext};
use crate::classifier;
use crate::error::RuleError;
use crate::files;
use crate::json_walk::{namespace_of, walk, walk_strings};
use crate::models::{Finding, Report};
use regex::Regex;
use serde_json::Value as Json;
use std::fs;
use std::path::Path;

const OVERRIDE_DIRS: &[&str] = &["ui", "font"];
const VANILLA_DIMENSIONS: &[&str] = &["overworld", "nether", "the_end"];
const EXPERIMENTAL: &[&str] = &["experimental", "beta", "preview"];

pub struct TechnicalRule;

struct Patterns {
    dimension_api: Regex,
    ticking_area: Regex,
    experimental: Vec<(&'static str, Regex)>,
}

impl Rule for TechnicalRule {
    fn id(&self) -> &'static str {
        "technical"
    }

    fn name(&self) -> &'static str {
        "Technical Restrictions"
    }

    fn description(&self) -> &'static str {
        "Runtime identifiers, UI/font overrides, vanilla overrides, dimensions, restricted APIs, ticking areas"
    }

    fn validate(&self, ctx: &RuleContext<'_>) -> Result<Report, RuleError> {
        let mut report = Report::new();
        let patterns = Patterns {
            dimension_api: Regex::new(
                r"\b(registerDimension|createDimension|addDimension|removeDimension|deleteDimension)\b",
            )?,
            ticking_area: Regex::new(r"(?i)tick(?:ing)?_?area")?,
            experimental: EXPERIMENTAL
                .iter()
                .map(|kw| scan::keyword_regex(kw).map(|re| (*kw, re)))
                .collect::<Result<_, _>>()?,
        };

        if let Some(bp) = ctx.packs.bp.as_deref() {
            for file in files::files_with_ext(&bp.join("entities"), files::JSON_EXT) {
                check_runtime_identifier(&file, &mut report);
            }
        }
        if let Some(rp) = ctx.packs.rp.as_deref() {
            check_override_dirs(rp, &mut report);
        }

        for (_, file) in scan::package_files(ctx.packs, files::JSON_EXT) {
            let Some(json) = files::json_or_skip(&file) else {
                continue;
            };
            check_vanilla_definitions(&json, &file, ctx, &mut report);
        }

        if let Some(bp) = ctx.packs.bp.as_deref() {
            for file in files::files_with_ext(bp, files::JSON_EXT) {
                if let Some(json) = files::json_or_skip(&file) {
                    check_dimension_definition(&json, &file, bp, &mut report);
                }
            }
            for file in files::files_with_ext(bp, files::SOURCE_EXT) {
                let Some(text) = files::text_or_skip(&file) else {
                    continue;
                };
                if files::has_ext(&file, &["js"]) {
                    check_script(&text, &file, ctx, &patterns, &mut report);
                }
                if let Some(line) = scan::first_line(&text, &patterns.ticking_area) {
                    report.add(
                        Finding::error("Ticking areas are not allowed in Add-Ons")
                            .at(&file)
                            .line(line),
                    );
                }
            }
        }

        for (_, file) in scan::package_files(ctx.packs, files::SOURCE_EXT) {
            if let Some(text) = files::text_or_skip(&file) {
                check_experimental(&text, &file, &patterns, &mut report);
            }
        }
        Ok(report)
    }
}

fn check_runtime_identifier(file: &Path, report: &mut Report) {
    let Some(json) = files::json_or_skip(file) else {
        return;
    };
    let mut found = false;
    walk(&json, &mut |path, _| {
        let key = path.rsplit('.').next().unwrap_or(path);
        if key == "runtime_identifier" {
            found = true;
        }
    });
    if found {
        report.add(
            Finding::error("Entity uses forbidden field 'runtime_identifier'").at(file),
        );
    }
}

fn check_override_dirs(rp: &Path, report: &mut Report) {
    let Ok(entries) = fs::read_dir(rp) else {
        return;
    };
    let mut dirs: Vec<_> = entries
        .flatten()
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.path())
        .collect();
    dirs.sort();
    for dir in dirs {
        let name = files::file_name(&dir).to_ascii_lowercase();
        if OVERRIDE_DIRS.contains(&name.as_str()) {
            report.add(
                Finding::error(format!(
                    "RP folder '{}' overrides game {}; Add-Ons may not modify it",
                    files::file_name(&dir),
                    if name == "ui" { "UI" } else { "fonts" }
                ))
                .at(&dir),
            );
        }
    }
}

fn check_vanilla_definitions(json: &Json, file: &Path, ctx: &RuleContext<'_>, report: &mut Report) {
    let file_name = files::file_name(file);
    walk_strings(json, &mut |path, s| {
        let Some(ns) = namespace_of(s) else {
            return;
        };
        if ctx.settings.is_forbidden_namespace(ns) && classifier::is_definition(path, &file_name) {
            report.add(
                Finding::error(format!(
                    "Definition '{}' uses reserved namespace '{}'; vanilla content may not be overridden",
                    s, ns
                ))
                .at(file)
                .context("json_path", path),
            );
        }
    });
}

fn check_dimension_definition(json: &Json, file: &Path, bp: &Path, report: &mut Report) {
    let top_level = json
        .as_object()
        .is_some_and(|m| m.keys().any(|k| k.starts_with("minecraft:dimension")));

    let in_dimensions_dir = files::rel_parts(file, bp)
        .iter()
        .any(|p| p.eq_ignore_ascii_case("dimensions"));
    let file_name = files::file_name(file);
    let mut defines = false;
    let mut vanilla = false;
    walk_strings(json, &mut |path, s| {
        if !classifier::is_definition(path, &file_name) {
            return;
        }
        defines = true;
        let local = s.split_once(':').map_or(s, |(_, rest)| rest);
        if VANILLA_DIMENSIONS.contains(&local) {
            vanilla = true;
        }
    });

    if top_level || vanilla || (in_dimensions_dir && defines) {
        report.add(
            Finding::error("Dimension definition found; Add-Ons may not add or remove dimensions")
                .at(file),
        );
    }
}

fn check_script(
    text: &str,
    file: &Path,
    ctx: &RuleContext<'_>,
    patterns: &Patterns,
    report: &mut Report,
) {
    for (i, line) in text.lines().enumerate() {
        if let Some(m) = patterns.dimension_api.find(line) {
            report.add(
                Finding::error(format!(
                    "Script calls '{}'; dimensions may not be modified",
                    m.as_str()
                ))
                .at(file)
                .line(i + 1),
            );
        }
    }

    let Some(lore_line) = text.lines().position(|l| l.contains("setLore")) else {
        return;
    };
    let lower = text.to_lowercase();
    for item in &ctx.settings.forbidden_text_patterns {
        if lower.contains(&item.to_lowercase()) {
            report.add(
                Finding::error(format!("Script uses setLore on forbidden item '{}'", item))
                    .at(file)
                    .line(lore_line + 1)
                    .context("item", item.as_str()),
            );
        }
    }
}

fn check_experimental(text: &str, file: &Path, patterns: &Patterns, report: &mut Report) {
    for (indicator, re) in &patterns.experimental {
        if let Some(line) = scan::first_line(text, re) {
            report.add(
                Finding::warning(format!(
                    "Potential experimental feature usage detected: '{}'",
                    indicator
                ))
                .at(file)
                .line(line)
                .context("experimental_indicator", *indicator),
            );
        }
    }
}
