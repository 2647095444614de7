//! Ordered rule registry.
//!
//! Execution order is explicit: rules are inserted at a position, and later
//! positions may consume facts that earlier ones depend on. Rules run in
//! parallel once the namespace is known, and their reports are collected
//! back in execution order, so output never depends on scheduling.

use super::{
    content_guidelines::ContentGuidelinesRule, debug::DebugRule,
    external_tool::ExternalToolRule, file_structure::FileStructureRule,
    manifest::ManifestRule, namespace::NamespaceRule, naming::NamingRule,
    organization::OrganizationRule, pack_structure::PackStructureRule,
    technical::TechnicalRule, translatable::TranslatableRule, Rule, RuleContext,
};
use crate::config::Settings;
use crate::models::{Finding, NamespaceInfo, Report};
use crate::packs::PackPaths;
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};

pub struct Registry {
    rules: Vec<Box<dyn Rule>>,
    order: Vec<usize>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Registry {
            rules: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Registry holding the built-in catalog in dependency order.
    pub fn with_defaults() -> Self {
        let mut r = Self::new();
        r.register(Box::new(PackStructureRule), Some(0));
        r.register(Box::new(ManifestRule), Some(1));
        r.register(Box::new(NamespaceRule), Some(2));
        r.register(Box::new(FileStructureRule), Some(3));
        r.register(Box::new(NamingRule), Some(4));
        r.register(Box::new(TechnicalRule), Some(5));
        r.register(Box::new(DebugRule), Some(6));
        r.register(Box::new(TranslatableRule), Some(7));
        r.register(Box::new(OrganizationRule), Some(8));
        r.register(Box::new(ContentGuidelinesRule), Some(9));
        r.register(Box::new(ExternalToolRule), Some(10));
        r
    }

    /// Register `rule` at `position` in the execution order (appended when
    /// absent or past the end). A rule with the same id is replaced.
    pub fn register(&mut self, rule: Box<dyn Rule>, position: Option<usize>) {
        let slot = match self.rules.iter().position(|r| r.id() == rule.id()) {
            Some(i) => {
                self.rules[i] = rule;
                self.order.retain(|&o| o != i);
                i
            }
            None => {
                self.rules.push(rule);
                self.rules.len() - 1
            }
        };
        match position {
            Some(p) if p < self.order.len() => self.order.insert(p, slot),
            _ => self.order.push(slot),
        }
    }

    /// Look a rule up by id or display name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| r.id().eq_ignore_ascii_case(name) || r.name().eq_ignore_ascii_case(name))
            .map(|r| r.as_ref())
    }

    /// Display names in registration order.
    pub fn list_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Display names in execution order.
    pub fn execution_order(&self) -> Vec<&'static str> {
        self.ordered().map(|r| r.name()).collect()
    }

    pub fn ordered(&self) -> impl Iterator<Item = &dyn Rule> {
        self.order.iter().map(move |&i| self.rules[i].as_ref())
    }

    /// Run every rule; one report per rule, in execution order.
    pub fn run_all(
        &self,
        settings: &Settings,
        packs: &PackPaths,
        namespace: &NamespaceInfo,
    ) -> Vec<Report> {
        let ctx = RuleContext {
            settings,
            packs,
            namespace,
        };
        let rules: Vec<&dyn Rule> = self.ordered().collect();
        rules.par_iter().map(|rule| run_rule(*rule, &ctx)).collect()
    }
}

/// Run one rule, converting an error or a panic into a single error
/// finding attributed to the rule.
pub fn run_rule(rule: &dyn Rule, ctx: &RuleContext<'_>) -> Report {
    tracing::info!(rule = rule.name(), "validating");
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| rule.validate(ctx)));
    let report = match outcome {
        Ok(Ok(report)) => report,
        Ok(Err(e)) => internal_failure(rule, &e.to_string()),
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic".to_string());
            internal_failure(rule, &msg)
        }
    };
    tracing::info!(
        rule = rule.name(),
        findings = report.findings().len(),
        "finished"
    );
    report
}

fn internal_failure(rule: &dyn Rule, msg: &str) -> Report {
    tracing::error!(rule = rule.name(), error = msg, "rule failed");
    Report::single(
        Finding::error(format!("Rule '{}' failed internally: {}", rule.name(), msg))
            .context("rule", rule.id()),
    )
}
