//! Per-component style lifecycle.
//!
//! A [`StyleManager`] turns a component's [`StyleSpec`] plus accumulated
//! overrides into CSS text and keeps the document in sync with it:
//!
//! 1. Evaluate the style source (calling the producer if it is computed)
//! 2. Deep-merge the custom overrides on top
//! 3. Decide scoping (a boolean `scoped` key overrides the configured default)
//! 4. Flatten, below `.<class>` when scoped
//! 5. Stringify
//! 6. Render into its own node, or stay covered when another unscoped manager
//!    already renders identical text
//!
//! Managers live in a [`Registry`]; the handle returned by
//! [`Registry::create_manager`] only refers to that state.

mod class_name;
mod registry;

use std::fmt;

pub use class_name::{ClassAllocator, base36};
pub use registry::Registry;

use registry::Pending;

use crate::config::{Flattener, Stringifier};
use crate::error::{Error, Result};
use crate::style::{StyleMap, StyleSpec, StyleValue};

/// Style key that overrides the configured scoping default.
pub const SCOPED_KEY: &str = "scoped";

/// Identifies a manager within its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ManagerId(pub(crate) u64);

impl fmt::Display for ManagerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Output of one style generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Generated {
    pub(crate) text: String,
    pub(crate) scoped: bool,
}

/// Merge, scope, flatten and stringify a style.
///
/// Pure: touches neither the registry nor the document.
pub(crate) fn generate(
    base: &StyleMap,
    custom: &StyleMap,
    scoped_default: bool,
    class_name: &str,
    flattener: Flattener,
    stringifier: Stringifier,
) -> Result<Generated> {
    let mut merged = base.merged(custom);

    let scoped = match merged.remove(SCOPED_KEY) {
        None => scoped_default,
        Some(StyleValue::Bool(scoped)) => scoped,
        Some(other) => return Err(Error::InvalidScopedFlag(other.to_string())),
    };

    let flat = if scoped {
        flattener(&merged, &format!(".{class_name}"))
    } else {
        flattener(&merged, "")
    };

    if !scoped
        && let Some(property) = flat.get("").and_then(|decls| decls.keys().next())
    {
        return Err(Error::RootProperty(property.clone()));
    }

    Ok(Generated {
        text: stringifier(&flat),
        scoped,
    })
}

/// Handle to one component's style state.
///
/// Not `Clone`: a component owns exactly one manager, and [`destroy`]
/// consumes it.
///
/// [`destroy`]: StyleManager::destroy
pub struct StyleManager {
    id: ManagerId,
    class_name: String,
    registry: Registry,
}

impl StyleManager {
    pub fn id(&self) -> ManagerId {
        self.id
    }

    /// The scoping class assigned at construction.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Set the style source and generate its CSS.
    ///
    /// On error the previous source stays in effect.
    pub fn set_style(&self, spec: impl Into<StyleSpec>) -> Result<()> {
        let pending = Pending {
            spec: Some(spec.into()),
            ..Pending::default()
        };
        self.registry.recompute_with(self.id, pending, false)
    }

    /// Deep-merge `partial` into the custom overrides and regenerate.
    ///
    /// Overrides accumulate across calls and are never reset.
    /// A rejected patch is not kept.
    pub fn update(&self, partial: &StyleMap) -> Result<()> {
        let pending = Pending {
            partial: Some(partial.clone()),
            ..Pending::default()
        };
        self.registry.recompute_with(self.id, pending, false)
    }

    /// Re-evaluate the current style source and sync the document.
    pub fn recompute(&self) -> Result<()> {
        self.registry.recompute(self.id)
    }

    /// Like [`recompute`](Self::recompute), but render into this manager's
    /// own node even when another manager already renders the same text.
    /// That other manager becomes covered.
    pub fn force_recompute(&self) -> Result<()> {
        self.registry.recompute_with(self.id, Pending::default(), true)
    }

    /// Attach the node and apply the scoping class. Idempotent.
    pub fn launch(&self) -> Result<()> {
        self.registry.launch(self.id)
    }

    /// Remove this manager from the registry and the document.
    ///
    /// If it was rendering CSS that other managers share, one of them takes
    /// over before this node is detached, so the text never leaves the
    /// document while someone still needs it.
    pub fn destroy(self) -> Result<()> {
        self.registry.destroy(self.id)
    }

    /// The last generated CSS text.
    pub fn css_text(&self) -> Result<Option<String>> {
        self.registry.with_slot(self.id, |slot| slot.css_text.clone())
    }

    pub fn custom_style(&self) -> Result<StyleMap> {
        self.registry.with_slot(self.id, |slot| slot.custom.clone())
    }

    pub fn is_launched(&self) -> Result<bool> {
        self.registry.with_slot(self.id, |slot| slot.launched)
    }

    /// Whether this manager's own node holds its CSS (it is not covered).
    pub fn is_rendering(&self) -> Result<bool> {
        self.registry.with_slot(self.id, |slot| slot.rendering)
    }

    pub fn is_scoped(&self) -> Result<bool> {
        self.registry.with_slot(self.id, |slot| slot.scoped)
    }
}

impl fmt::Debug for StyleManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleManager")
            .field("id", &self.id)
            .field("class_name", &self.class_name)
            .finish()
    }
}
