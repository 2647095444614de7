//! Read-only access to content-tree files.
//!
//! Loaders return `Result` so that callers decide what a failure means;
//! rules treat `Err` as "no data from this file". Walks are sorted by file
//! name so findings come out in the same order on every run.

use crate::error::LoadError;
use serde_json::Value as Json;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const JSON_EXT: &[&str] = &["json"];
pub const SOURCE_EXT: &[&str] = &["json", "js", "mcfunction"];

pub fn load_json(path: &Path) -> Result<Json, LoadError> {
    let data = read_text(path)?;
    serde_json::from_str(&data).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_text(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load JSON, logging and discarding failures.
pub fn json_or_skip(path: &Path) -> Option<Json> {
    match load_json(path) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!(error = %e, "skipping file");
            None
        }
    }
}

/// Read text, logging and discarding failures.
pub fn text_or_skip(path: &Path) -> Option<String> {
    match read_text(path) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!(error = %e, "skipping file");
            None
        }
    }
}

/// All regular files under `root` with one of `exts` (every file when
/// `exts` is empty).
pub fn files_with_ext(root: &Path, exts: &[&str]) -> Vec<PathBuf> {
    walk_files(root, usize::MAX, exts)
}

/// Like `files_with_ext`, limited to `max_depth` levels below `root`.
pub fn walk_files(root: &Path, max_depth: usize, exts: &[&str]) -> Vec<PathBuf> {
    if !root.is_dir() {
        return Vec::new();
    }
    WalkDir::new(root)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| exts.is_empty() || has_ext(p, exts))
        .collect()
}

/// Directories under `root` (excluding `root` itself).
pub fn walk_dirs(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        return Vec::new();
    }
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.into_path())
        .collect()
}

pub fn has_ext(path: &Path, exts: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| exts.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Path components of `path` relative to `base`, as strings.
pub fn rel_parts(path: &Path, base: &Path) -> Vec<String> {
    pathdiff::diff_paths(path, base)
        .map(|rel| {
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .filter(|c| c != ".")
                .collect()
        })
        .unwrap_or_default()
}
