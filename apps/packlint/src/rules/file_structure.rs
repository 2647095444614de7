//! Folder layout, package size and capacity limits.
//!
//! Size is measured on a real deflate archive built in memory, since the
//! store limit applies to the uploaded archive rather than to raw bytes.

use super::{scan, Rule, RuleContext};
use crate::config::Settings;
use crate::error::RuleError;
use crate::files;
use crate::models::{Finding, Report};
use crate::packs::PackPaths;
use serde_json::Value as Json;
use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Top-level directories allowed to hold shallow files.
const SHALLOW_ALLOWED: &[&str] = &["texts", "sounds", "textures", "item_catalog"];
const WARN_RATIO: f64 = 0.8;
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

pub struct FileStructureRule;

impl Rule for FileStructureRule {
    fn id(&self) -> &'static str {
        "file-structure"
    }

    fn name(&self) -> &'static str {
        "File Structure"
    }

    fn description(&self) -> &'static str {
        "Studio/pack folders, folder depth, size, file count and block permutations"
    }

    fn uses_namespace(&self) -> bool {
        true
    }

    fn validate(&self, ctx: &RuleContext<'_>) -> Result<Report, RuleError> {
        let mut report = Report::new();
        let settings = ctx.settings;
        self.check_studio_folders(ctx, &mut report);
        self.check_depth(ctx, &mut report);

        let packaged = packaged_files(ctx.packs, &settings.ignored_directories);
        report.add_files_checked(packaged.len());

        let size = compressed_size(&packaged)?;
        check_size(size, settings, &mut report);

        if packaged.len() > settings.file_count_limit {
            report.add(
                Finding::error(format!(
                    "Package holds {} files, over the limit of {}",
                    packaged.len(),
                    settings.file_count_limit
                ))
                .context("file_count", packaged.len())
                .context("limit", settings.file_count_limit),
            );
        }

        let permutations = count_permutations(ctx.packs);
        if permutations > settings.block_permutation_limit {
            report.add(
                Finding::error(format!(
                    "Block permutations exceed limit ({}/{})",
                    permutations, settings.block_permutation_limit
                ))
                .context("permutations", permutations)
                .context("limit", settings.block_permutation_limit),
            );
        }

        if let Some(bp) = ctx.packs.bp.as_deref() {
            let structures = files::files_with_ext(&bp.join("structures"), &["mcstructure"]);
            if structures.is_empty() {
                report.add(Finding::warning(
                    "No guidebook structure (.mcstructure) found under BP/structures",
                ));
            }
        }
        Ok(report)
    }
}

impl FileStructureRule {
    fn check_studio_folders(&self, ctx: &RuleContext<'_>, report: &mut Report) {
        let Some(studio) = ctx.namespace.studio_name.as_deref() else {
            return;
        };
        let pack = ctx.namespace.pack_name.as_deref();
        for (kind, tree) in ctx.packs.trees() {
            for category in &ctx.settings.required_folder_structure {
                let dir = tree.join(category);
                if !has_entries(&dir) {
                    continue;
                }
                let studio_dir = dir.join(studio);
                if !studio_dir.is_dir() {
                    report.add(
                        Finding::error(format!(
                            "{} {}/ is missing studio folder '{}'",
                            kind, category, studio
                        ))
                        .at(&dir)
                        .context("expected", format!("{}/{}", category, studio)),
                    );
                    continue;
                }
                if let Some(pack) = pack {
                    if !studio_dir.join(pack).is_dir() {
                        report.add(
                            Finding::warning(format!(
                                "{} {}/{}/ is missing pack folder '{}'",
                                kind, category, studio, pack
                            ))
                            .at(&studio_dir)
                            .context("expected", format!("{}/{}/{}", category, studio, pack)),
                        );
                    }
                }
            }
        }
    }

    fn check_depth(&self, ctx: &RuleContext<'_>, report: &mut Report) {
        let required = ctx.settings.required_folder_depth;
        let max_dirs = ctx.settings.max_subcategories + 3;
        let ignored = &ctx.settings.ignored_directories;
        for (kind, tree) in ctx.packs.trees() {
            for file in files::files_with_ext(tree, &[]) {
                let parts = files::rel_parts(&file, tree);
                if parts.len() < 2 || shallow_allowed(&parts) || scan::is_ignored(&file, tree, ignored) {
                    continue;
                }
                let depth = parts.len() - 1;
                if depth < required {
                    report.add(
                        Finding::error(format!(
                            "{} file '{}' is {} folder(s) deep; at least {} required",
                            kind,
                            parts.join("/"),
                            depth,
                            required
                        ))
                        .at(&file)
                        .context("depth", depth)
                        .context("required", required),
                    );
                }
            }
            for dir in files::walk_dirs(tree) {
                let parts = files::rel_parts(&dir, tree);
                if parts.len() <= max_dirs
                    || shallow_allowed(&parts)
                    || scan::is_ignored(&dir, tree, ignored)
                {
                    continue;
                }
                report.add(
                    Finding::warning(format!(
                        "{} folder '{}' has more than {} subcategories",
                        kind,
                        parts.join("/"),
                        ctx.settings.max_subcategories
                    ))
                    .at(&dir),
                );
            }
        }
    }
}

fn has_entries(dir: &Path) -> bool {
    fs::read_dir(dir).is_ok_and(|mut entries| entries.next().is_some())
}

fn shallow_allowed(parts: &[String]) -> bool {
    let top = parts.first().map(|s| s.as_str()).unwrap_or_default();
    SHALLOW_ALLOWED.contains(&top)
        || parts
            .last()
            .is_some_and(|name| name.to_ascii_lowercase().ends_with(".lang"))
}

fn check_size(size: u64, settings: &Settings, report: &mut Report) {
    let limit = settings.size_limit_bytes();
    let mb = size as f64 / BYTES_PER_MB;
    if size > limit {
        report.add(
            Finding::error(format!(
                "Compressed package size {:.2} MB exceeds the {} MB limit",
                mb, settings.file_size_limit_mb
            ))
            .context("compressed_bytes", size)
            .context("limit_bytes", limit),
        );
    } else if size as f64 > limit as f64 * WARN_RATIO {
        report.add(
            Finding::warning(format!(
                "Compressed package size {:.2} MB is above 80% of the {} MB limit",
                mb, settings.file_size_limit_mb
            ))
            .context("compressed_bytes", size)
            .context("limit_bytes", limit),
        );
    }
}

/// Files that would be shipped, as `(archive name, path)` in BP, RP order.
pub fn packaged_files(packs: &PackPaths, ignored: &[String]) -> Vec<(String, PathBuf)> {
    let mut out = Vec::new();
    for (kind, tree) in packs.trees() {
        for file in files::files_with_ext(tree, &[]) {
            if scan::is_ignored(&file, tree, ignored) {
                continue;
            }
            let name = format!("{}/{}", kind.label(), files::rel_parts(&file, tree).join("/"));
            out.push((name, file));
        }
    }
    out
}

/// Deflate-compressed size of `entries`, measured by writing them into an
/// in-memory archive and reading the entry sizes back. An entry counts as
/// stored when deflate would grow it, so the total never exceeds the raw
/// byte count. Unreadable files are left out.
pub fn compressed_size(entries: &[(String, PathBuf)]) -> Result<u64, RuleError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, path) in entries {
        let mut file = match fs::File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::debug!(error = %e, path = %path.display(), "skipping file");
                continue;
            }
        };
        writer.start_file(name.clone(), options)?;
        io::copy(&mut file, &mut writer).map_err(|source| RuleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }
    let mut archive = ZipArchive::new(writer.finish()?)?;
    let mut total = 0u64;
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        total += entry.compressed_size().min(entry.size());
    }
    Ok(total)
}

/// Sum of `minecraft:block.permutations` lengths across BP block files.
pub fn count_permutations(packs: &PackPaths) -> usize {
    let Some(bp) = packs.bp.as_deref() else {
        return 0;
    };
    files::files_with_ext(&bp.join("blocks"), files::JSON_EXT)
        .iter()
        .filter_map(|p| files::json_or_skip(p))
        .map(|json| permutations_in(&json))
        .sum()
}

fn permutations_in(json: &Json) -> usize {
    json.get("minecraft:block")
        .and_then(|b| b.get("permutations"))
        .and_then(|p| p.as_array())
        .map_or(0, |p| p.len())
}

/// Raw byte total of `entries`.
pub fn raw_size(entries: &[(String, PathBuf)]) -> u64 {
    entries
        .iter()
        .filter_map(|(_, p)| fs::metadata(p).ok())
        .map(|m| m.len())
        .sum()
}
