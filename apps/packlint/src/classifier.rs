//! Identifier definition-vs-reference classifier.
//!
//! Decides whether a colon-qualified string found at `json_path` inside
//! `file_name` introduces a new identifier (and so must obey namespace
//! policy) or merely references an existing one, which may legitimately be
//! vanilla. Unknown contexts are classified as references.
//!
//! Context entries are matched against the path as whole segments: array
//! indices are dropped, the path is lower-cased and split on `.`, and an
//! entry matches when its segments occur contiguously. `item` therefore
//! matches `result.item` but not `minecraft:item.description.identifier`.

/// Paths that hold references to existing assets.
pub const REFERENCE_CONTEXTS: &[&str] = &[
    "result.item",
    "key.item",
    "tags.item",
    "item",
    "input",
    "output",
    "ingredient",
    "materials",
    "drops",
    "pools.entries.name",
    "give",
    "item_name",
    "spawn_item",
];

/// Files made almost entirely of references.
pub const REFERENCE_FILES: &[&str] = &[
    "recipe.json",
    "loot_table.json",
    "trade.json",
    "crafting_item_catalog.json",
    "trading.json",
];

/// Paths that introduce identifiers.
pub const DEFINITION_CONTEXTS: &[&str] = &[
    "minecraft:entity.description.identifier",
    "minecraft:block.description.identifier",
    "minecraft:item.description.identifier",
    "description.identifier",
    "identifier",
];

pub fn is_definition(json_path: &str, file_name: &str) -> bool {
    let segments = path_segments(json_path);
    if REFERENCE_CONTEXTS
        .iter()
        .any(|ctx| contains_segments(&segments, ctx))
    {
        return false;
    }
    let file = file_name.to_ascii_lowercase();
    if REFERENCE_FILES.iter().any(|f| file.ends_with(f)) {
        return false;
    }
    DEFINITION_CONTEXTS
        .iter()
        .any(|ctx| contains_segments(&segments, ctx))
}

fn path_segments(json_path: &str) -> Vec<String> {
    let mut out = String::with_capacity(json_path.len());
    let mut depth = 0usize;
    for ch in json_path.chars() {
        match ch {
            '[' => {
                depth += 1;
                out.push('.');
            }
            ']' => depth = depth.saturating_sub(1),
            _ if depth > 0 => {}
            _ => out.extend(ch.to_lowercase()),
        }
    }
    out.split('.')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn contains_segments(segments: &[String], ctx: &str) -> bool {
    let needle: Vec<&str> = ctx.split('.').collect();
    if needle.len() > segments.len() {
        return false;
    }
    segments
        .windows(needle.len())
        .any(|w| w.iter().zip(&needle).all(|(a, b)| a == b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_result_is_reference() {
        assert!(!is_definition("result.item", "stone_axe.recipe.json"));
        assert!(!is_definition(
            "minecraft:recipe_shaped.result.item",
            "stone_axe.json"
        ));
    }

    #[test]
    fn test_entity_identifier_is_definition() {
        assert!(is_definition(
            "minecraft:entity.description.identifier",
            "pig_variant.entity.json"
        ));
        assert!(is_definition(
            "minecraft:item.description.identifier",
            "sword.item.json"
        ));
    }

    #[test]
    fn test_reference_file_wins_over_identifier_path() {
        assert!(!is_definition(
            "minecraft:recipe_shaped.description.identifier",
            "custom.recipe.json"
        ));
        assert!(!is_definition("identifier", "Trading.json"));
    }

    #[test]
    fn test_array_indices_and_case_are_ignored() {
        assert!(!is_definition("pools[0].entries[2].name", "chest.json"));
        assert!(!is_definition("Minecraft:Recipe_Shapeless.Ingredients[0].Item", "a.json"));
        assert!(is_definition("Minecraft:Entity.Description.Identifier", "a.json"));
    }

    #[test]
    fn test_unknown_context_is_not_definition() {
        assert!(!is_definition(
            "minecraft:entity.components.minecraft:type_family.family[0]",
            "pig.json"
        ));
        assert!(!is_definition("", "pig.json"));
    }
}
