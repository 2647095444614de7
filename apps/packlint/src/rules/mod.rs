//! Rule contract and the built-in rule catalog.
//!
//! A rule reads the content trees, never writes them, and learns about other
//! rules only through the facts in [`RuleContext`]. Rules are registered in
//! a [`Registry`](registry::Registry) whose order encodes dependencies.

pub mod content_guidelines;
pub mod debug;
pub mod external_tool;
pub mod file_structure;
pub mod manifest;
pub mod namespace;
pub mod naming;
pub mod organization;
pub mod pack_structure;
pub mod registry;
pub mod scan;
pub mod technical;
pub mod translatable;

pub use registry::Registry;

use crate::config::Settings;
use crate::error::RuleError;
use crate::models::{NamespaceInfo, Report};
use crate::packs::PackPaths;

/// Facts threaded into every rule invocation.
pub struct RuleContext<'a> {
    pub settings: &'a Settings,
    pub packs: &'a PackPaths,
    pub namespace: &'a NamespaceInfo,
}

pub trait Rule: Send + Sync {
    /// Stable identifier used on the command line, e.g. `pack-structure`.
    fn id(&self) -> &'static str;
    /// Human-readable name, e.g. `Pack Structure`.
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// Whether the rule reads `RuleContext::namespace`.
    fn uses_namespace(&self) -> bool {
        false
    }
    fn validate(&self, ctx: &RuleContext<'_>) -> Result<Report, RuleError>;
}
