//! Recursive-descent JSON walker shared by every rule.
//!
//! Paths are rendered as `a.b[0].c`. The visitor sees every node, including
//! containers, and rules pick the shapes they care about.

use serde_json::Value as Json;

/// Visit every node of `value` with its dotted path. The root has path "".
pub fn walk<'a, F>(value: &'a Json, visit: &mut F)
where
    F: FnMut(&str, &'a Json),
{
    let mut path = String::new();
    walk_inner(value, &mut path, visit);
}

fn walk_inner<'a, F>(value: &'a Json, path: &mut String, visit: &mut F)
where
    F: FnMut(&str, &'a Json),
{
    visit(path.as_str(), value);
    match value {
        Json::Object(map) => {
            for (k, v) in map {
                let len = path.len();
                if !path.is_empty() {
                    path.push('.');
                }
                path.push_str(k);
                walk_inner(v, path, visit);
                path.truncate(len);
            }
        }
        Json::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                let len = path.len();
                path.push('[');
                path.push_str(&i.to_string());
                path.push(']');
                walk_inner(v, path, visit);
                path.truncate(len);
            }
        }
        Json::String(_) | Json::Number(_) | Json::Bool(_) | Json::Null => {}
    }
}

/// Visit string leaves only.
pub fn walk_strings<'a, F>(value: &'a Json, visit: &mut F)
where
    F: FnMut(&str, &'a str),
{
    walk(value, &mut |path, node| {
        if let Json::String(s) = node {
            visit(path, s.as_str());
        }
    });
}

/// Namespace part of a colon-qualified identifier. Prose such as
/// `"Sky Castles: Reborn"` is not an identifier; the namespace may only hold
/// ASCII letters, digits, `_`, `-` and `.`.
pub fn namespace_of(value: &str) -> Option<&str> {
    match value.split_once(':') {
        Some((ns, rest)) if !ns.is_empty() && !rest.is_empty() && is_identifier_part(ns) => {
            Some(ns)
        }
        _ => None,
    }
}

fn is_identifier_part(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
