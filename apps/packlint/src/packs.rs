//! Content-tree discovery.
//!
//! Each tree is searched across an ordered list of candidate directories:
//! pipeline-style `packs/*` names first, then legacy top-level names. The
//! first existing candidate wins.

use std::fmt;
use std::path::{Path, PathBuf};

pub const BP_CANDIDATES: &[&str] = &[
    "packs/BP",
    "packs/behavior",
    "packs/behavior_pack",
    "BP",
    "behavior",
    "behavior_pack",
];

pub const RP_CANDIDATES: &[&str] = &[
    "packs/RP",
    "packs/resource",
    "packs/resource_pack",
    "RP",
    "resource",
    "resource_pack",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackKind {
    Behavior,
    Resource,
}

impl PackKind {
    pub const BOTH: [PackKind; 2] = [PackKind::Behavior, PackKind::Resource];

    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            PackKind::Behavior => BP_CANDIDATES,
            PackKind::Resource => RP_CANDIDATES,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PackKind::Behavior => "BP",
            PackKind::Resource => "RP",
        }
    }
}

impl fmt::Display for PackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default)]
/// Resolved content-tree roots for one project.
pub struct PackPaths {
    pub root: PathBuf,
    pub bp: Option<PathBuf>,
    pub rp: Option<PathBuf>,
}

impl PackPaths {
    /// Resolve both trees below `root`.
    pub fn resolve(root: &Path) -> Self {
        PackPaths {
            root: root.to_path_buf(),
            bp: first_existing(root, BP_CANDIDATES),
            rp: first_existing(root, RP_CANDIDATES),
        }
    }

    pub fn get(&self, kind: PackKind) -> Option<&Path> {
        match kind {
            PackKind::Behavior => self.bp.as_deref(),
            PackKind::Resource => self.rp.as_deref(),
        }
    }

    /// Resolved trees in BP, RP order.
    pub fn trees(&self) -> impl Iterator<Item = (PackKind, &Path)> {
        PackKind::BOTH
            .into_iter()
            .filter_map(move |k| self.get(k).map(|p| (k, p)))
    }

    /// Every candidate directory for `kind`, joined on the project root.
    pub fn searched(&self, kind: PackKind) -> Vec<PathBuf> {
        kind.candidates().iter().map(|c| self.root.join(c)).collect()
    }
}

fn first_existing(root: &Path, candidates: &[&str]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|c| root.join(c))
        .find(|p| p.is_dir())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_pipeline_paths_win_over_legacy() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("packs/behavior")).unwrap();
        fs::create_dir_all(root.join("BP")).unwrap();
        fs::create_dir_all(root.join("resource_pack")).unwrap();
        let packs = PackPaths::resolve(root);
        assert_eq!(packs.bp, Some(root.join("packs/behavior")));
        assert_eq!(packs.rp, Some(root.join("resource_pack")));
        assert_eq!(packs.trees().count(), 2);
    }

    #[test]
    fn test_missing_tree_is_none() {
        let tmp = tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("BP")).unwrap();
        let packs = PackPaths::resolve(tmp.path());
        assert!(packs.rp.is_none());
        let kinds: Vec<PackKind> = packs.trees().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![PackKind::Behavior]);
        assert_eq!(packs.searched(PackKind::Resource).len(), 6);
    }
}
