//! Heuristic for user-facing text that bypasses translation keys.
//! Intentionally noisy; every finding is a warning.

use super::{scan, Rule, RuleContext};
use crate::error::RuleError;
use crate::files;
use crate::json_walk::walk_strings;
use crate::models::{Finding, Report};
use regex::Regex;

pub struct TranslatableRule;

impl Rule for TranslatableRule {
    fn id(&self) -> &'static str {
        "translatable"
    }

    fn name(&self) -> &'static str {
        "Translatable Text"
    }

    fn description(&self) -> &'static str {
        "Hardcoded user-facing text that should use translation keys"
    }

    fn uses_namespace(&self) -> bool {
        true
    }

    fn validate(&self, ctx: &RuleContext<'_>) -> Result<Report, RuleError> {
        let mut report = Report::new();
        let phrase = Regex::new(r"(?i)\b(welcome|hello|goodbye|error|success|failed)\b")?;
        let message_call = Regex::new(
            r#"\b(sendMessage|setActionBar|setTitle)\s*\(\s*(?:"((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)'|`([^`]*)`)"#,
        )?;
        let own_prefix = ctx.namespace.namespace().map(|ns| format!("{}:", ns));

        for (_, file) in scan::package_files(ctx.packs, files::JSON_EXT) {
            let Some(json) = files::json_or_skip(&file) else {
                continue;
            };
            walk_strings(&json, &mut |path, s| {
                if is_hardcoded(s, own_prefix.as_deref(), &phrase) {
                    report.add(
                        Finding::warning(format!(
                            "Text '{}' looks user-facing; use a translation key",
                            s
                        ))
                        .at(&file)
                        .context("json_path", path),
                    );
                }
            });
        }

        for (_, file) in scan::package_files(ctx.packs, &["js"]) {
            let Some(text) = files::text_or_skip(&file) else {
                continue;
            };
            for (i, line) in text.lines().enumerate() {
                for caps in message_call.captures_iter(line) {
                    let literal = caps
                        .get(2)
                        .or_else(|| caps.get(3))
                        .or_else(|| caps.get(4))
                        .map(|m| m.as_str())
                        .unwrap_or_default();
                    if literal.trim().is_empty() {
                        continue;
                    }
                    let call = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                    report.add(
                        Finding::warning(format!(
                            "{} is passed literal text '{}'; use rawtext with a translate key",
                            call, literal
                        ))
                        .at(&file)
                        .line(i + 1),
                    );
                }
            }
        }
        Ok(report)
    }
}

fn is_hardcoded(s: &str, own_prefix: Option<&str>, phrase: &Regex) -> bool {
    s.len() > 3
        && !s.starts_with("minecraft:")
        && !own_prefix.is_some_and(|p| s.starts_with(p))
        && phrase.is_match(s)
}
