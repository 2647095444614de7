//! Packlint core library.
//!
//! Validates a Minecraft Add-On (a behavior pack plus a resource pack)
//! against Marketplace rules and produces a mergeable report.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective settings resolution.
//! - `packs`: Content-tree discovery across candidate directory names.
//! - `files`, `json_walk`: Read-only file access and the shared JSON walker.
//! - `classifier`: Identifier definition vs reference decisions.
//! - `namespace`: Namespace inference from pack content.
//! - `rules`: The rule contract, registry and built-in catalog.
//! - `lint`: The validator that runs rules and persists the report.
//! - `models`: Findings, reports and namespace facts.
//! - `output`: Human/JSON printers.
//! - `error`, `utils`: Error types and console helpers.
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod files;
pub mod json_walk;
pub mod lint;
pub mod models;
pub mod namespace;
pub mod output;
pub mod packs;
pub mod rules;
pub mod utils;
