use super::{Rule, RuleContext};
use crate::error::RuleError;
use crate::models::{Finding, Report};

pub struct OrganizationRule;

impl Rule for OrganizationRule {
    fn id(&self) -> &'static str {
        "organization"
    }

    fn name(&self) -> &'static str {
        "Organization Requirements"
    }

    fn description(&self) -> &'static str {
        "Namespace starts with the organization prefix"
    }

    fn uses_namespace(&self) -> bool {
        true
    }

    fn validate(&self, ctx: &RuleContext<'_>) -> Result<Report, RuleError> {
        let mut report = Report::new();
        let (Some(prefix), Some(ns)) = (
            ctx.settings.required_namespace_prefix.as_deref(),
            ctx.namespace.namespace(),
        ) else {
            return Ok(report);
        };
        let expected = format!("{}_", prefix);
        if !ns.starts_with(&expected) {
            report.add(
                Finding::error(format!(
                    "Namespace '{}' must start with organization prefix '{}'",
                    ns, expected
                ))
                .context("namespace", ns)
                .context("required_prefix", prefix),
            );
        }
        Ok(report)
    }
}
