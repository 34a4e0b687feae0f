//! Nested style mappings and deep merge.

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;

/// A value in a [`StyleMap`]: either a leaf CSS value or a nested selector block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum StyleValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Block(StyleMap),
}

impl StyleValue {
    /// Returns the nested block, if this value is one.
    pub fn as_block(&self) -> Option<&StyleMap> {
        match self {
            StyleValue::Block(map) => Some(map),
            _ => None,
        }
    }

    /// Check if this value is a nested selector block.
    pub fn is_block(&self) -> bool {
        matches!(self, StyleValue::Block(_))
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Bool(b) => write!(f, "{b}"),
            StyleValue::Number(n) => write!(f, "{n}"),
            StyleValue::Text(s) => f.write_str(s),
            StyleValue::Block(_) => f.write_str("[block]"),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Text(value)
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        StyleValue::Bool(value)
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        StyleValue::Number(value.into())
    }
}

impl From<u32> for StyleValue {
    fn from(value: u32) -> Self {
        StyleValue::Number(value.into())
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

impl From<StyleMap> for StyleValue {
    fn from(value: StyleMap) -> Self {
        StyleValue::Block(value)
    }
}

/// An insertion-ordered mapping from selector or property names to values.
///
/// Keys whose value is a [`StyleValue::Block`] are selectors; every other key
/// is a CSS property in camelCase (or already kebab-case).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StyleMap {
    entries: IndexMap<String, StyleValue>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, keeping the position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Builder form of [`StyleMap::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.entries.get(key)
    }

    /// Remove a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<StyleValue> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Deep-merge `other` into `self`.
    ///
    /// Blocks present on both sides merge recursively. Any other collision is
    /// resolved in favor of `other`. Existing keys keep their position and new
    /// keys are appended.
    pub fn merge(&mut self, other: &StyleMap) {
        for (key, incoming) in &other.entries {
            match self.entries.entry(key.clone()) {
                Entry::Occupied(mut slot) => match (slot.get_mut(), incoming) {
                    (StyleValue::Block(existing), StyleValue::Block(patch)) => {
                        existing.merge(patch);
                    }
                    (current, _) => *current = incoming.clone(),
                },
                Entry::Vacant(slot) => {
                    slot.insert(incoming.clone());
                }
            }
        }
    }

    /// Parse a JSON object, keeping key order.
    #[cfg(feature = "serde")]
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Return a new map with `other` deep-merged on top of `self`.
    pub fn merged(&self, other: &StyleMap) -> StyleMap {
        let mut out = self.clone();
        out.merge(other);
        out
    }
}

impl<K: Into<String>, V: Into<StyleValue>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = StyleMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Build a [`StyleMap`] from nested `key => value` pairs.
///
/// Braced values become nested selector blocks; anything else goes through
/// `StyleValue::from`.
///
/// ```
/// use dynstyle::style_map;
///
/// let style = style_map! {
///     "&:hover" => { "color" => "red" },
///     "span" => { "fontSize" => "12px", "zIndex" => 2 },
/// };
/// assert_eq!(style.len(), 2);
/// ```
#[macro_export]
macro_rules! style_map {
    (@munch $map:ident) => {};
    (@munch $map:ident $key:expr => { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $map.insert($key, $crate::StyleValue::Block($crate::style_map!($($inner)*)));
        $crate::style_map!(@munch $map $($($rest)*)?);
    };
    (@munch $map:ident $key:expr => $value:expr $(, $($rest:tt)*)?) => {
        $map.insert($key, $crate::StyleValue::from($value));
        $crate::style_map!(@munch $map $($($rest)*)?);
    };
    ($($body:tt)*) => {{
        #[allow(unused_mut)]
        let mut map = $crate::StyleMap::new();
        $crate::style_map!(@munch map $($body)*);
        map
    }};
}
