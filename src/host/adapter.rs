//! Glue between a component framework and the style registry.
//!
//! A framework calls [`StylePlugin::mount`] when a component instance mounts,
//! keeps the returned [`MountedStyles`] with the instance, and calls
//! [`MountedStyles::unmount`] when it goes away.
//!
//! ```
//! use std::rc::Rc;
//! use dynstyle::{Config, MemoryDocument, MemoryElement, Observable, StylePlugin, StyleSpec, style_map};
//!
//! let doc = MemoryDocument::new();
//! let plugin = StylePlugin::install(Config::default(), doc.clone());
//!
//! let color = Observable::new("red".to_string());
//! let source = color.clone();
//! let spec = StyleSpec::computed(move || style_map! { "p" => { "color" => source.get() } });
//!
//! let mut styles = plugin.mount(Rc::new(MemoryElement::new()), Some(spec)).unwrap();
//! styles.watch(&color);
//! assert_eq!(doc.stylesheet(), "p { color: red; }");
//!
//! color.set("blue".to_string());
//! assert_eq!(doc.stylesheet(), "p { color: blue; }");
//!
//! styles.unmount().unwrap();
//! assert_eq!(doc.stylesheet(), "");
//! ```

use std::rc::Rc;

use super::observable::{Observable, Subscription};
use super::{ClassTarget, Document};
use crate::config::Config;
use crate::error::Result;
use crate::manager::{Registry, StyleManager};
use crate::style::{StyleMap, StyleSpec};

/// One plugin installation: a configuration and the registry it owns.
#[derive(Debug)]
pub struct StylePlugin {
    registry: Registry,
}

impl StylePlugin {
    /// Install the plugin against a document.
    pub fn install(config: Config, document: impl Document + 'static) -> Self {
        log::debug!("installing style plugin: {config:?}");
        Self {
            registry: Registry::new(config, document),
        }
    }

    /// Install with an existing registry.
    pub fn with_registry(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Create the style manager for a freshly mounted component.
    ///
    /// When the component declares a style source it is set right away.
    pub fn mount(
        &self,
        element: Rc<dyn ClassTarget>,
        styles: Option<StyleSpec>,
    ) -> Result<MountedStyles> {
        let manager = self.registry.create_manager(element)?;
        if let Some(spec) = styles {
            manager.set_style(spec)?;
        }
        Ok(MountedStyles {
            manager,
            subscriptions: Vec::new(),
        })
    }

    /// Tear down every manager still alive.
    pub fn uninstall(self) -> Result<()> {
        self.registry.teardown()
    }
}

/// The style state a mounted component holds on to.
#[derive(Debug)]
pub struct MountedStyles {
    manager: StyleManager,
    subscriptions: Vec<Subscription>,
}

impl MountedStyles {
    pub fn manager(&self) -> &StyleManager {
        &self.manager
    }

    /// The class applied to the component's element.
    pub fn class_name(&self) -> &str {
        self.manager.class_name()
    }

    /// Recompute the style whenever `source` changes.
    ///
    /// The style source is re-evaluated as is; custom overrides are not touched.
    /// Failures inside the callback are logged, since there is no caller to
    /// return them to.
    pub fn watch<T: Clone + PartialEq + 'static>(&mut self, source: &Observable<T>) {
        let registry = self.manager.registry().clone();
        let id = self.manager.id();
        let subscription = source.subscribe(move |_| {
            if let Err(err) = registry.recompute(id) {
                log::error!("failed to recompute styles for manager {id}: {err}");
            }
        });
        self.subscriptions.push(subscription);
    }

    /// Patch the component's style with a partial mapping.
    pub fn patch(&self, partial: &StyleMap) -> Result<()> {
        self.manager.update(partial)
    }

    /// Recompute now, as a change notification would.
    pub fn notify(&self) -> Result<()> {
        self.manager.recompute()
    }

    /// Stop watching and destroy the manager.
    pub fn unmount(mut self) -> Result<()> {
        self.subscriptions.clear();
        self.manager.destroy()
    }
}
