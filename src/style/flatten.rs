//! Flattening of nested selector syntax.
//!
//! Nested blocks extend the selector of their parent. A key starting with `&`
//! is concatenated onto the parent (`"&:hover"` under `a` gives `a:hover`);
//! any other key becomes a descendant (`span` under `a` gives `a span`).

use indexmap::IndexMap;

use super::map::{StyleMap, StyleValue};

/// Marker that concatenates a nested key onto its parent selector.
pub const CONCAT_MARKER: char = '&';

/// Property name to rendered value, in insertion order.
pub type Declarations = IndexMap<String, String>;

/// A flat mapping from a single CSS selector to its declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FlatStyle {
    rules: IndexMap<String, Declarations>,
}

impl FlatStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one declaration to `selector`, creating the rule on first use.
    pub fn declare(
        &mut self,
        selector: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.rules
            .entry(selector.into())
            .or_default()
            .insert(property.into(), value.into());
    }

    pub fn get(&self, selector: &str) -> Option<&Declarations> {
        self.rules.get(selector)
    }

    pub fn contains(&self, selector: &str) -> bool {
        self.rules.contains_key(selector)
    }

    /// Number of selectors.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over `(selector, declarations)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Declarations)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}

/// Flatten a nested style mapping starting from the empty root selector.
pub fn flatten(nested: &StyleMap) -> FlatStyle {
    flatten_under(nested, "")
}

/// Flatten a nested style mapping below `root`.
///
/// Leaf properties found directly in `nested` are collected under `root`
/// itself. Selectors are trimmed; two paths that trim to the same selector
/// share one rule.
pub fn flatten_under(nested: &StyleMap, root: &str) -> FlatStyle {
    let mut flat = FlatStyle::new();
    walk(nested, root, &mut flat);
    flat
}

fn walk(map: &StyleMap, path: &str, out: &mut FlatStyle) {
    for (key, value) in map.iter() {
        match value {
            StyleValue::Block(inner) => walk(inner, &child_selector(path, key), out),
            leaf => out.declare(path.trim(), key, leaf.to_string()),
        }
    }
}

/// Join a nested key onto its parent selector.
pub fn child_selector(parent: &str, key: &str) -> String {
    match key.strip_prefix(CONCAT_MARKER) {
        Some(rest) => format!("{parent}{rest}"),
        None => format!("{parent} {key}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style_map;
    use proptest::prelude::*;

    #[test]
    fn test_flatten_concat_and_descendant() {
        let style = style_map! {
            "&:hover" => { "color" => "red" },
            "span" => { "fontSize" => "12px" },
        };
        let flat = flatten(&style);

        let selectors: Vec<_> = flat.selectors().collect();
        assert_eq!(selectors, vec![":hover", "span"]);
        assert_eq!(flat.get(":hover").unwrap()["color"], "red");
        assert_eq!(flat.get("span").unwrap()["fontSize"], "12px");
    }

    #[test]
    fn test_flatten_deep_nesting() {
        let style = style_map! {
            ".card" => {
                "padding" => "4px",
                "&.active" => {
                    "borderColor" => "blue",
                    "a" => { "&:focus" => { "outline" => "none" } },
                },
                "header h1" => { "margin" => 0 },
            },
        };
        let flat = flatten(&style);

        let selectors: Vec<_> = flat.selectors().collect();
        assert_eq!(
            selectors,
            vec![".card", ".card.active", ".card.active a:focus", ".card header h1"]
        );
        assert_eq!(flat.get(".card header h1").unwrap()["margin"], "0");
    }

    #[test]
    fn test_flatten_under_scope_root() {
        let style = style_map! {
            "color" => "black",
            "&:hover" => { "color" => "red" },
            "span" => { "fontSize" => "12px" },
        };
        let flat = flatten_under(&style, ".ds-x");

        let selectors: Vec<_> = flat.selectors().collect();
        assert_eq!(selectors, vec![".ds-x", ".ds-x:hover", ".ds-x span"]);
    }

    #[test]
    fn test_flatten_merges_repeated_selector() {
        let style = style_map! {
            "p" => { "color" => "red" },
            "&p" => { "margin" => 0, "color" => "blue" },
        };
        let flat = flatten(&style);

        assert_eq!(flat.len(), 1);
        let p = flat.get("p").unwrap();
        assert_eq!(p["color"], "blue");
        assert_eq!(p["margin"], "0");
    }

    #[test]
    fn test_flatten_later_declaration_wins_across_paths() {
        // " p", "p", then " p" again: document order decides
        let style = style_map! {
            "p" => { "color" => "red" },
            "&p" => { "color" => "blue" },
            "&" => { "p" => { "color" => "green" } },
        };
        let flat = flatten(&style);

        assert_eq!(flat.len(), 1);
        assert_eq!(flat.get("p").unwrap()["color"], "green");
    }

    #[test]
    fn test_flatten_skips_empty_blocks() {
        let style = style_map! { "div" => {} };
        assert!(flatten(&style).is_empty());
    }

    /// Reference walk: declare every leaf in document order.
    fn manual_walk(map: &StyleMap, path: String, out: &mut FlatStyle) {
        for (key, value) in map.iter() {
            match value {
                StyleValue::Block(inner) => {
                    let next = if let Some(rest) = key.strip_prefix('&') {
                        path.clone() + rest
                    } else {
                        path.clone() + " " + key
                    };
                    manual_walk(inner, next, out);
                }
                leaf => out.declare(path.trim(), key, leaf.to_string()),
            }
        }
    }

    fn arb_style() -> impl Strategy<Value = StyleMap> {
        let leaf = prop::collection::vec(("[a-z]{1,6}", "[a-z0-9]{1,4}"), 1..3)
            .prop_map(|pairs| pairs.into_iter().collect::<StyleMap>());
        leaf.prop_recursive(3, 24, 3, |inner| {
            prop::collection::vec(("&?[a-z:.]{1,5}", inner), 1..3).prop_map(|blocks| {
                blocks
                    .into_iter()
                    .map(|(k, v)| (k, StyleValue::Block(v)))
                    .collect::<StyleMap>()
            })
        })
    }

    proptest! {
        #[test]
        fn prop_flatten_matches_manual_walk(style in arb_style()) {
            let mut expected = FlatStyle::new();
            manual_walk(&style, String::new(), &mut expected);
            prop_assert_eq!(flatten(&style), expected);
        }

        #[test]
        fn prop_concat_only_children_have_no_dangling_space(
            parts in prop::collection::vec("[a-z:]{1,5}", 1..4)
        ) {
            let mut style = style_map! { "color" => "red" };
            for part in parts.iter().rev() {
                style = StyleMap::new().with(format!("&{part}"), style);
            }
            let flat = flatten_under(&style, "a");
            let selector = flat.selectors().next().unwrap().to_string();
            prop_assert!(!selector.contains(' '));
            prop_assert_eq!(selector, format!("a{}", parts.concat()));
        }
    }
}
