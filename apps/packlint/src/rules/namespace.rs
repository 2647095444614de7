use super::{scan, Rule, RuleContext};
use crate::error::RuleError;
use crate::files;
use crate::json_walk::{namespace_of, walk_strings};
use crate::models::{Finding, Report};
use regex::Regex;

const MAX_LEN: usize = 50;

pub struct NamespaceRule;

/// `^PREFIX_[A-Z]{2}$`, the studio-prefix pattern organizations require.
pub fn matches_required_prefix(namespace: &str, prefix: &str) -> Result<bool, regex::Error> {
    let re = Regex::new(&format!("^{}_[A-Z]{{2}}$", regex::escape(prefix)))?;
    Ok(re.is_match(namespace))
}

impl Rule for NamespaceRule {
    fn id(&self) -> &'static str {
        "namespace"
    }

    fn name(&self) -> &'static str {
        "Namespace Usage"
    }

    fn description(&self) -> &'static str {
        "Detected namespace format, length and required prefix"
    }

    fn uses_namespace(&self) -> bool {
        true
    }

    fn validate(&self, ctx: &RuleContext<'_>) -> Result<Report, RuleError> {
        let mut report = Report::new();
        let Some(ns) = ctx.namespace.namespace() else {
            report.add(Finding::error(
                "No namespace detected; custom identifiers must use a studio_pack namespace",
            ));
            return Ok(report);
        };

        let format = Regex::new(r"^[A-Za-z0-9_]+$")?;
        if !format.is_match(ns) {
            report.add(
                Finding::error(format!(
                    "Namespace '{}' may only contain letters, digits and underscores",
                    ns
                ))
                .context("namespace", ns),
            );
        }
        if ns.len() > MAX_LEN {
            report.add(
                Finding::warning(format!(
                    "Namespace '{}' is {} characters long (maximum {})",
                    ns,
                    ns.len(),
                    MAX_LEN
                ))
                .context("namespace", ns),
            );
        }
        if let Some(prefix) = ctx.settings.required_namespace_prefix.as_deref() {
            if !matches_required_prefix(ns, prefix)? {
                report.add(
                    Finding::error(format!(
                        "Namespace '{}' does not match required pattern '{}_XX'",
                        ns, prefix
                    ))
                    .context("namespace", ns)
                    .context("required_prefix", prefix),
                );
            }
        }

        for (_, path) in scan::package_files(ctx.packs, files::JSON_EXT) {
            let Some(json) = files::json_or_skip(&path) else {
                continue;
            };
            let rel = scan::display_path(&path, &ctx.packs.root);
            walk_strings(&json, &mut |_, s| {
                if let Some(used) = namespace_of(s) {
                    report.record_namespace(used, &rel);
                }
            });
        }
        tracing::debug!(
            namespaces = report.namespace_usage().len(),
            "namespace usage recorded"
        );
        Ok(report)
    }
}
