//! Configuration discovery and effective settings resolution.
//!
//! Packlint reads `packlint.toml|yaml|yml|json` from the project root (or
//! closest ancestor) and merges it with CLI flags to produce an
//! `Effective` config. Settings may also arrive inline as a JSON object,
//! which is how build-pipeline filters hand them over.
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILES: [&str; 4] = [
    "packlint.toml",
    "packlint.yaml",
    "packlint.yml",
    "packlint.json",
];

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
/// Rulebook settings. Every key is optional; see `Default` for values.
pub struct Settings {
    pub forbidden_namespaces: Vec<String>,
    pub required_namespace_prefix: Option<String>,
    pub required_folder_depth: usize,
    pub max_subcategories: usize,
    pub file_count_limit: usize,
    pub file_size_limit_mb: f64,
    pub block_permutation_limit: usize,
    pub debug_statement_patterns: Vec<String>,
    /// Items that restricted APIs (setLore) must not target.
    pub forbidden_text_patterns: Vec<String>,
    /// Prefix templates keyed by asset kind; `{namespace}` is substituted.
    pub naming_patterns: BTreeMap<String, String>,
    /// Categories that must hold `<studio>/<pack>` sub-folders.
    pub required_folder_structure: Vec<String>,
    pub ignored_directories: Vec<String>,
    pub minecraft_creator_tools: CreatorToolsCfg,
    pub generate_report: bool,
    pub report_path: String,
    pub exit_on_error: bool,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        let naming_patterns = [
            ("geometry", "geometry.{namespace}."),
            ("animation", "animation.{namespace}."),
            ("animation_controller", "controller.animation.{namespace}."),
            ("render_controller", "controller.render.{namespace}."),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Settings {
            forbidden_namespaces: vec!["minecraft".to_string()],
            required_namespace_prefix: None,
            required_folder_depth: 3,
            max_subcategories: 2,
            file_count_limit: 3500,
            file_size_limit_mb: 25.0,
            block_permutation_limit: 10000,
            debug_statement_patterns: ["console.log", "console.warn", "console.error", "debugger"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            forbidden_text_patterns: Vec::new(),
            naming_patterns,
            required_folder_structure: [
                "entities",
                "items",
                "blocks",
                "loot_tables",
                "recipes",
                "spawn_rules",
                "trading",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            ignored_directories: Vec::new(),
            minecraft_creator_tools: CreatorToolsCfg::default(),
            generate_report: true,
            report_path: "data/packlint_report.json".to_string(),
            exit_on_error: true,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Resolve a naming template for `kind`, substituting the namespace.
    pub fn naming_prefix(&self, kind: &str, namespace: &str) -> Option<String> {
        self.naming_patterns
            .get(kind)
            .map(|t| t.replace("{namespace}", namespace))
    }

    pub fn is_forbidden_namespace(&self, namespace: &str) -> bool {
        self.forbidden_namespaces.iter().any(|n| n == namespace)
    }

    pub fn size_limit_bytes(&self) -> u64 {
        (self.file_size_limit_mb * 1024.0 * 1024.0) as u64
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
/// External validator bridge section under `[minecraft_creator_tools]`.
pub struct CreatorToolsCfg {
    pub enabled: bool,
    pub validation_suite: String,
    pub timeout_seconds: u64,
    pub log_verbose: bool,
    pub command: String,
    pub args: Vec<String>,
}

impl Default for CreatorToolsCfg {
    fn default() -> Self {
        CreatorToolsCfg {
            enabled: false,
            validation_suite: "addon".to_string(),
            timeout_seconds: 300,
            log_verbose: true,
            command: "npx".to_string(),
            args: vec!["mct".to_string()],
        }
    }
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub project_root: PathBuf,
    pub config_file: Option<PathBuf>,
    pub settings: Settings,
    pub output: String,
    pub verbose: bool,
}

/// Walk upward from `start` to detect the project root.
///
/// Stops when a packlint config file or a `.git` directory is found.
pub fn detect_project_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Locate the first config file present in `root`.
pub fn find_config(root: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|f| root.join(f))
        .find(|p| p.is_file())
}

/// Load `Settings` from a config file, choosing the parser by extension.
pub fn load_config(path: &Path) -> Result<Settings, ConfigError> {
    let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&s).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        }),
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&s).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => parse_settings_json(&s, &path.to_string_lossy()),
    }
}

/// Parse a settings JSON object. A pipeline filter document with a nested
/// `settings` object is accepted as well.
pub fn parse_settings_json(s: &str, origin: &str) -> Result<Settings, ConfigError> {
    let to_err = |source| ConfigError::Json {
        origin: origin.to_string(),
        source,
    };
    let mut value: serde_json::Value = serde_json::from_str(s).map_err(to_err)?;
    if let Some(inner) = value.get_mut("settings").filter(|v| v.is_object()) {
        value = inner.take();
    }
    serde_json::from_value(value).map_err(to_err)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
///
/// Inline JSON settings replace the file settings wholesale; keys they do
/// not mention fall back to defaults.
pub fn resolve_effective(
    cli_root: Option<&str>,
    cli_settings: Option<&str>,
    cli_output: Option<&str>,
    cli_verbose: bool,
) -> Result<Effective, ConfigError> {
    let start = PathBuf::from(cli_root.unwrap_or("."));
    let project_root = if cli_root.is_some() {
        start
    } else {
        detect_project_root(&start)
    };
    let config_file = find_config(&project_root);
    let settings = match (cli_settings, config_file.as_ref()) {
        (Some(inline), _) => parse_settings_json(inline, "--settings")?,
        (None, Some(path)) => load_config(path)?,
        (None, None) => Settings::default(),
    };
    let output = cli_output
        .map(|s| s.to_string())
        .unwrap_or_else(|| "human".to_string());
    Ok(Effective {
        project_root,
        config_file,
        settings,
        output,
        verbose: cli_verbose,
    })
}
