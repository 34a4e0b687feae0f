//! Plugin-wide configuration shared by every style manager.

use std::fmt;

use crate::style::{self, FlatStyle, StyleMap};

/// Default prefix for generated scoping classes.
pub const DEFAULT_PREFIX: &str = "ds-";

/// Turns a flat style into CSS text.
pub type Stringifier = fn(&FlatStyle) -> String;

/// Flattens a nested mapping below a root selector (`""` when unscoped).
pub type Flattener = fn(&StyleMap, &str) -> FlatStyle;

/// Configuration captured by the registry at install time.
#[derive(Clone)]
pub struct Config {
    /// Prefix for scoping class names.
    pub prefix: String,
    /// Whether styles are scoped unless they say otherwise.
    pub scoped: bool,
    pub stringifier: Stringifier,
    pub flattener: Flattener,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            scoped: false,
            stringifier: style::stringify,
            flattener: style::flatten_under,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_scoped(mut self, scoped: bool) -> Self {
        self.scoped = scoped;
        self
    }

    pub fn with_stringifier(mut self, stringifier: Stringifier) -> Self {
        self.stringifier = stringifier;
        self
    }

    pub fn with_flattener(mut self, flattener: Flattener) -> Self {
        self.flattener = flattener;
        self
    }

    /// Apply the values set in a [`ConfigFile`], leaving the rest untouched.
    #[cfg(feature = "serde")]
    pub fn apply(mut self, file: &ConfigFile) -> Self {
        if let Some(ref prefix) = file.prefix {
            self.prefix = prefix.clone();
        }
        if let Some(scoped) = file.scoped {
            self.scoped = scoped;
        }
        self
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("prefix", &self.prefix)
            .field("scoped", &self.scoped)
            .finish_non_exhaustive()
    }
}

/// The serializable subset of [`Config`].
///
/// ```
/// # #[cfg(feature = "serde")] {
/// use dynstyle::{Config, ConfigFile};
///
/// let file: ConfigFile = serde_json::from_str(r#"{ "prefix": "app-" }"#).unwrap();
/// let config = Config::default().apply(&file);
/// assert_eq!(config.prefix, "app-");
/// assert!(!config.scoped);
/// # }
/// ```
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub prefix: Option<String>,
    pub scoped: Option<bool>,
}

#[cfg(feature = "serde")]
impl ConfigFile {
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
