//! The collection of live style managers.
//!
//! The registry owns every manager's state. Handles ([`StyleManager`]) only
//! carry an id, so dedup lookups, hand-offs between managers and teardown all
//! happen here under a single mutable borrow.
//!
//! User style producers are evaluated before that borrow is taken; nothing in
//! this module calls back into user code.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::class_name::ClassAllocator;
use super::{Generated, ManagerId, StyleManager, generate};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::host::{ClassTarget, Document, StyleNode};
use crate::style::{StyleMap, StyleSpec};

/// Per-manager state.
pub(crate) struct Slot {
    pub(crate) class_name: String,
    pub(crate) element: Rc<dyn ClassTarget>,
    pub(crate) node: Box<dyn StyleNode>,
    pub(crate) spec: Option<StyleSpec>,
    pub(crate) custom: StyleMap,
    /// Last generated CSS text.
    pub(crate) css_text: Option<String>,
    pub(crate) scoped: bool,
    /// Node attached and class applied.
    pub(crate) launched: bool,
    /// Node currently holds `css_text`.
    pub(crate) rendering: bool,
}

/// Inputs a recompute should adopt if, and only if, it succeeds.
#[derive(Default)]
pub(crate) struct Pending {
    pub(crate) spec: Option<StyleSpec>,
    /// Merged into the custom overrides.
    pub(crate) partial: Option<StyleMap>,
}

pub(crate) struct RegistryState {
    pub(crate) config: Config,
    document: Box<dyn Document>,
    classes: ClassAllocator,
    next_id: u64,
    pub(crate) slots: IndexMap<ManagerId, Slot>,
    /// Unscoped managers by generated text, in the order they joined.
    by_text: HashMap<String, Vec<ManagerId>>,
}

/// Shared handle to the set of live style managers.
///
/// Cloning is cheap; every clone refers to the same registry.
#[derive(Clone)]
pub struct Registry {
    state: Rc<RefCell<RegistryState>>,
}

impl Registry {
    /// Create a registry injecting into `document`.
    pub fn new(config: Config, document: impl Document + 'static) -> Self {
        let classes = ClassAllocator::new(config.prefix.clone());
        Self::with_allocator(config, document, classes)
    }

    /// Create a registry with a caller-provided class allocator.
    pub fn with_allocator(
        config: Config,
        document: impl Document + 'static,
        classes: ClassAllocator,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(RegistryState {
                config,
                document: Box::new(document),
                classes,
                next_id: 0,
                slots: IndexMap::new(),
                by_text: HashMap::new(),
            })),
        }
    }

    pub fn config(&self) -> Config {
        self.state.borrow().config.clone()
    }

    /// Create a manager bound to `element` and register it.
    pub fn create_manager(&self, element: Rc<dyn ClassTarget>) -> Result<StyleManager> {
        let mut state = self.state.borrow_mut();
        let node = state.document.create_style_node()?;
        let class_name = state.classes.allocate();
        let id = ManagerId(state.next_id);
        let scoped = state.config.scoped;
        state.next_id += 1;

        state.slots.insert(
            id,
            Slot {
                class_name: class_name.clone(),
                element,
                node,
                spec: None,
                custom: StyleMap::new(),
                css_text: None,
                scoped,
                launched: false,
                rendering: false,
            },
        );
        log::trace!("created style manager {id} ({class_name})");

        Ok(StyleManager {
            id,
            class_name,
            registry: self.clone(),
        })
    }

    /// Number of live managers.
    pub fn len(&self) -> usize {
        self.state.borrow().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().slots.is_empty()
    }

    pub fn contains(&self, id: ManagerId) -> bool {
        self.state.borrow().slots.contains_key(&id)
    }

    /// Unscoped managers whose generated text is `text`, in registry order.
    pub fn managers_with_text(&self, text: &str) -> Vec<ManagerId> {
        self.state.borrow().candidates(text)
    }

    /// The manager currently rendering `text`, if any.
    pub fn active_renderer(&self, text: &str) -> Option<ManagerId> {
        self.state.borrow().renderer_of(text)
    }

    /// Destroy every live manager.
    ///
    /// Nodes are detached and scoping classes removed. Every manager is
    /// released even when one fails; the first failure is returned. Handles
    /// that outlive the teardown report [`Error::Destroyed`].
    pub fn teardown(&self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.by_text.clear();
        let slots = std::mem::take(&mut state.slots);
        drop(state);

        log::debug!("tearing down {} style managers", slots.len());
        let mut first_err = None;
        for (id, slot) in slots {
            if let Err(err) = release(slot) {
                log::warn!("failed to release style manager {id}: {err}");
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Re-evaluate a manager's style source and sync the document.
    ///
    /// Equivalent to [`StyleManager::recompute`]; hosts use this from change
    /// callbacks that only hold an id.
    pub fn recompute(&self, id: ManagerId) -> Result<()> {
        self.recompute_with(id, Pending::default(), false)
    }

    /// Generate CSS from the slot's inputs with `pending` applied on top.
    ///
    /// Pending inputs are stored only once generation succeeds; a rejected
    /// spec or override leaves the slot and the document as they were.
    pub(crate) fn recompute_with(
        &self,
        id: ManagerId,
        pending: Pending,
        force: bool,
    ) -> Result<()> {
        let (spec, custom, class_name, config) = {
            let state = self.state.borrow();
            let slot = state.slots.get(&id).ok_or(Error::Destroyed(id))?;
            let spec = match pending.spec {
                Some(ref spec) => Some(spec.clone()),
                None => slot.spec.clone(),
            };
            let custom = match pending.partial {
                Some(ref partial) => slot.custom.merged(partial),
                None => slot.custom.clone(),
            };
            (spec, custom, slot.class_name.clone(), state.config.clone())
        };

        // The producer runs with no registry borrow held.
        let base = match spec {
            Some(ref spec) => spec.evaluate()?,
            None => StyleMap::new(),
        };

        let generated = generate(
            &base,
            &custom,
            config.scoped,
            &class_name,
            config.flattener,
            config.stringifier,
        )?;

        let mut state = self.state.borrow_mut();
        let slot = state.slot_mut(id)?;
        if pending.spec.is_some() {
            slot.spec = spec;
        }
        if pending.partial.is_some() {
            slot.custom = custom;
        }
        state.apply(id, generated, force)
    }

    pub(crate) fn with_slot<T>(&self, id: ManagerId, f: impl FnOnce(&Slot) -> T) -> Result<T> {
        let state = self.state.borrow();
        state.slots.get(&id).map(f).ok_or(Error::Destroyed(id))
    }

    pub(crate) fn launch(&self, id: ManagerId) -> Result<()> {
        self.state.borrow_mut().launch(id)
    }

    pub(crate) fn destroy(&self, id: ManagerId) -> Result<()> {
        self.state.borrow_mut().destroy(id)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Registry")
            .field("managers", &state.slots.len())
            .field("texts", &state.by_text.len())
            .finish()
    }
}

impl RegistryState {
    fn slot_mut(&mut self, id: ManagerId) -> Result<&mut Slot> {
        self.slots.get_mut(&id).ok_or(Error::Destroyed(id))
    }

    fn candidates(&self, text: &str) -> Vec<ManagerId> {
        let mut ids = self.by_text.get(text).cloned().unwrap_or_default();
        ids.sort_by_key(|id| self.slots.get_index_of(id));
        ids
    }

    fn renderer_of(&self, text: &str) -> Option<ManagerId> {
        self.by_text
            .get(text)?
            .iter()
            .copied()
            .find(|id| self.slots.get(id).is_some_and(|slot| slot.rendering))
    }

    fn index_insert(&mut self, text: &str, id: ManagerId) {
        let ids = self.by_text.entry(text.to_string()).or_default();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    fn index_remove(&mut self, text: &str, id: ManagerId) {
        if let Some(ids) = self.by_text.get_mut(text) {
            ids.retain(|&other| other != id);
            if ids.is_empty() {
                self.by_text.remove(text);
            }
        }
    }

    fn launch(&mut self, id: ManagerId) -> Result<()> {
        let slot = self.slot_mut(id)?;
        if slot.launched {
            return Ok(());
        }
        slot.element.add_class(&slot.class_name)?;
        if !slot.node.is_attached() {
            slot.node.attach()?;
        }
        slot.launched = true;
        log::debug!("launched style manager {id} with class {}", slot.class_name);
        Ok(())
    }

    /// Write `text` into the manager's own node and make sure it is in the document.
    fn render(&mut self, id: ManagerId, text: &str) -> Result<()> {
        let slot = self.slot_mut(id)?;
        slot.node.set_text(text)?;
        slot.rendering = true;
        self.launch(id)
    }

    /// Stop rendering: the node stays in place but holds no text.
    fn blank(&mut self, id: ManagerId) -> Result<()> {
        let slot = self.slot_mut(id)?;
        if slot.rendering {
            slot.node.set_text("")?;
            slot.rendering = false;
        }
        Ok(())
    }

    /// Give `text` to the first manager that still needs it, unless one
    /// already renders it. `from` must already be out of the index.
    fn hand_off(&mut self, text: &str, from: ManagerId) -> Result<Option<ManagerId>> {
        if self.renderer_of(text).is_some() {
            return Ok(None);
        }
        let Some(&heir) = self.candidates(text).first() else {
            return Ok(None);
        };
        self.render(heir, text)?;
        log::debug!("style manager {heir} took over shared css from {from}");
        Ok(Some(heir))
    }

    fn apply(&mut self, id: ManagerId, generated: Generated, force: bool) -> Result<()> {
        let slot = self.slot_mut(id)?;
        let previous = slot.css_text.take();
        let was_scoped = slot.scoped;
        let was_rendering = slot.rendering;
        slot.css_text = Some(generated.text.clone());
        slot.scoped = generated.scoped;

        if let Some(ref old) = previous
            && !was_scoped
        {
            self.index_remove(old, id);
            if was_rendering && *old != generated.text {
                self.hand_off(old, id)?;
            }
        }

        let text = generated.text.as_str();
        if text.is_empty() {
            return self.blank(id);
        }
        if generated.scoped {
            return self.render(id, text);
        }

        self.index_insert(text, id);
        match self.renderer_of(text) {
            Some(other) if other != id && !force => {
                log::trace!("style manager {id} is covered by {other}");
                self.blank(id)
            }
            Some(other) if other != id => {
                self.render(id, text)?;
                log::debug!("style manager {id} forced over {other}");
                self.blank(other)
            }
            _ => self.render(id, text),
        }
    }

    fn destroy(&mut self, id: ManagerId) -> Result<()> {
        let slot = self.slots.shift_remove(&id).ok_or(Error::Destroyed(id))?;

        if let Some(ref text) = slot.css_text
            && !slot.scoped
        {
            self.index_remove(text, id);
            if slot.rendering {
                self.hand_off(text, id)?;
            }
        }

        log::debug!("destroyed style manager {id}");
        release(slot)
    }
}

/// Detach a removed manager's node and take its class off the element.
fn release(mut slot: Slot) -> Result<()> {
    if slot.node.is_attached() {
        slot.node.detach()?;
    }
    if slot.launched && slot.element.has_class(&slot.class_name) {
        slot.element.remove_class(&slot.class_name)?;
    }
    Ok(())
}
