//! An in-memory document for tests, benchmarks and the CLI.
//!
//! Attached nodes are kept in insertion order, the same way appending to
//! `document.body` would order them. Attaching an attached node or detaching a
//! detached one is reported as a host error so lifecycle bugs surface.

use std::cell::RefCell;
use std::rc::Rc;

use super::{ClassTarget, Document, StyleNode};
use crate::error::{Error, Result};

#[derive(Debug, Default)]
struct NodeState {
    text: String,
    attached: bool,
}

#[derive(Debug, Default)]
struct DocState {
    nodes: Vec<NodeState>,
    /// Attached node indices, in body order.
    body: Vec<usize>,
}

/// A shared, cloneable in-memory document.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    state: Rc<RefCell<DocState>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of style nodes ever created.
    pub fn node_count(&self) -> usize {
        self.state.borrow().nodes.len()
    }

    /// Number of nodes currently in the body.
    pub fn attached_count(&self) -> usize {
        self.state.borrow().body.len()
    }

    /// Text of every attached node, in body order (empty nodes included).
    pub fn attached_texts(&self) -> Vec<String> {
        let state = self.state.borrow();
        state
            .body
            .iter()
            .map(|&i| state.nodes[i].text.clone())
            .collect()
    }

    /// How many attached nodes carry exactly `text`.
    pub fn count_text(&self, text: &str) -> usize {
        let state = self.state.borrow();
        state
            .body
            .iter()
            .filter(|&&i| state.nodes[i].text == text)
            .count()
    }

    /// The effective stylesheet: attached, non-empty node texts joined by newlines.
    pub fn stylesheet(&self) -> String {
        self.attached_texts()
            .into_iter()
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Document for MemoryDocument {
    fn create_style_node(&self) -> Result<Box<dyn StyleNode>> {
        let mut state = self.state.borrow_mut();
        let index = state.nodes.len();
        state.nodes.push(NodeState::default());
        Ok(Box::new(MemoryStyleNode {
            index,
            state: Rc::clone(&self.state),
        }))
    }
}

/// A style node living in a [`MemoryDocument`].
#[derive(Debug)]
pub struct MemoryStyleNode {
    index: usize,
    state: Rc<RefCell<DocState>>,
}

impl StyleNode for MemoryStyleNode {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.nodes[self.index].text = text.to_string();
        Ok(())
    }

    fn text(&self) -> String {
        self.state.borrow().nodes[self.index].text.clone()
    }

    fn attach(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.nodes[self.index].attached {
            return Err(Error::Host(format!("style node {} is already attached", self.index)));
        }
        state.nodes[self.index].attached = true;
        state.body.push(self.index);
        Ok(())
    }

    fn detach(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.nodes[self.index].attached {
            return Err(Error::Host(format!("style node {} is not attached", self.index)));
        }
        state.nodes[self.index].attached = false;
        let index = self.index;
        state.body.retain(|&i| i != index);
        Ok(())
    }

    fn is_attached(&self) -> bool {
        self.state.borrow().nodes[self.index].attached
    }
}

/// An element with a class list.
#[derive(Debug, Clone, Default)]
pub struct MemoryElement {
    classes: Rc<RefCell<Vec<String>>>,
}

impl MemoryElement {
    pub fn new() -> Self {
        Self::default()
    }

    /// An element that already carries some classes.
    pub fn with_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: Rc::new(RefCell::new(classes.into_iter().map(Into::into).collect())),
        }
    }

    pub fn classes(&self) -> Vec<String> {
        self.classes.borrow().clone()
    }
}

impl ClassTarget for MemoryElement {
    fn add_class(&self, class: &str) -> Result<()> {
        let mut classes = self.classes.borrow_mut();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
        Ok(())
    }

    fn remove_class(&self, class: &str) -> Result<()> {
        self.classes.borrow_mut().retain(|c| c != class);
        Ok(())
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().iter().any(|c| c == class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_detach_order() {
        let doc = MemoryDocument::new();
        let mut a = doc.create_style_node().unwrap();
        let mut b = doc.create_style_node().unwrap();
        a.set_text("a { color: red; }").unwrap();
        b.set_text("b { color: blue; }").unwrap();

        b.attach().unwrap();
        a.attach().unwrap();
        assert_eq!(doc.stylesheet(), "b { color: blue; }\na { color: red; }");

        b.detach().unwrap();
        assert_eq!(doc.attached_texts(), vec!["a { color: red; }".to_string()]);
        assert_eq!(doc.node_count(), 2);
        assert!(!b.is_attached());
    }

    #[test]
    fn test_double_attach_is_rejected() {
        let doc = MemoryDocument::new();
        let mut node = doc.create_style_node().unwrap();
        node.attach().unwrap();
        assert!(matches!(node.attach(), Err(Error::Host(_))));
        node.detach().unwrap();
        assert!(matches!(node.detach(), Err(Error::Host(_))));
    }

    #[test]
    fn test_stylesheet_skips_blank_nodes() {
        let doc = MemoryDocument::new();
        let mut blank = doc.create_style_node().unwrap();
        blank.attach().unwrap();
        assert_eq!(doc.attached_count(), 1);
        assert_eq!(doc.stylesheet(), "");
        assert_eq!(doc.count_text(""), 1);
    }

    #[test]
    fn test_element_classes() {
        let el = MemoryElement::with_classes(["card"]);
        el.add_class("ds-1").unwrap();
        el.add_class("ds-1").unwrap();
        assert_eq!(el.classes(), vec!["card", "ds-1"]);
        el.remove_class("ds-1").unwrap();
        assert!(!el.has_class("ds-1"));
        assert!(el.has_class("card"));
    }
}
