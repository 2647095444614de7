//! Helpers shared by the lexical rules.

use crate::files;
use crate::packs::{PackKind, PackPaths};
use regex::Regex;
use std::path::{Path, PathBuf};

/// Case-insensitive keyword matcher. A hit must not be glued to other
/// letters or digits, so `mod` matches `mod_pack` but not `model`.
pub fn keyword_regex(keyword: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        "(?i)(?:^|[^a-z0-9]){}(?:[^a-z0-9]|$)",
        regex::escape(keyword)
    ))
}

/// 1-based line of the first line matching `re`.
pub fn first_line(text: &str, re: &Regex) -> Option<usize> {
    text.lines().position(|l| re.is_match(l)).map(|i| i + 1)
}

/// Files of both resolved trees (BP first) carrying one of `exts`.
pub fn package_files(packs: &PackPaths, exts: &[&str]) -> Vec<(PackKind, PathBuf)> {
    packs
        .trees()
        .flat_map(|(kind, tree)| {
            files::files_with_ext(tree, exts)
                .into_iter()
                .map(move |p| (kind, p))
        })
        .collect()
}

/// Whether any component of `path` below `tree` is in `ignored`.
pub fn is_ignored(path: &Path, tree: &Path, ignored: &[String]) -> bool {
    !ignored.is_empty()
        && files::rel_parts(path, tree)
            .iter()
            .any(|part| ignored.iter().any(|i| i == part))
}

/// Path of `path` relative to the project root, with `/` separators.
pub fn display_path(path: &Path, root: &Path) -> String {
    let parts = files::rel_parts(path, root);
    if parts.is_empty() {
        path.to_string_lossy().to_string()
    } else {
        parts.join("/")
    }
}
