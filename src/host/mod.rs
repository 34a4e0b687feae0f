//! The document a registry injects into, and the glue to a component framework.
//!
//! The core never touches a concrete DOM. It asks a [`Document`] for style
//! nodes, writes text into them, and attaches or detaches them. Scoping classes
//! go onto the owning element through [`ClassTarget`].

pub mod adapter;
pub mod memory;
pub mod observable;

use crate::error::Result;

/// A document able to create `<style>` nodes.
pub trait Document {
    /// Create a detached, empty style node.
    fn create_style_node(&self) -> Result<Box<dyn StyleNode>>;
}

/// One `<style>` node owned by a single style manager.
pub trait StyleNode {
    /// Replace the node's text content.
    fn set_text(&mut self, text: &str) -> Result<()>;

    fn text(&self) -> String;

    /// Insert the node into the document. Callers only attach detached nodes.
    fn attach(&mut self) -> Result<()>;

    /// Remove the node from the document. Callers only detach attached nodes.
    fn detach(&mut self) -> Result<()>;

    fn is_attached(&self) -> bool;
}

/// The element a component renders into.
pub trait ClassTarget {
    fn add_class(&self, class: &str) -> Result<()>;

    fn remove_class(&self, class: &str) -> Result<()>;

    fn has_class(&self, class: &str) -> bool;
}

pub use adapter::{MountedStyles, StylePlugin};
pub use memory::{MemoryDocument, MemoryElement};
pub use observable::{Observable, Subscription};
