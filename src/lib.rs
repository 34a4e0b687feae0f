//! # dynstyle
//!
//! Runtime style injection for component frameworks: nested style mappings in,
//! deduplicated and optionally component-scoped CSS out.
//!
//! ## Features
//!
//! - Nested selectors with `&` concatenation (`"&:hover"`) and descendant
//!   nesting (`"span"`)
//! - camelCase property names rendered as kebab-case CSS
//! - Per-component scoping classes
//! - One `<style>` node per distinct CSS text, however many components share it
//! - Static styles or computed styles re-evaluated on change
//!
//! ## Quick Start
//!
//! ```
//! use std::rc::Rc;
//! use dynstyle::{Config, MemoryDocument, MemoryElement, StylePlugin, StyleSpec, style_map};
//!
//! let doc = MemoryDocument::new();
//! let plugin = StylePlugin::install(Config::default(), doc.clone());
//!
//! let style = style_map! {
//!     "&:hover" => { "color" => "red" },
//!     "span" => { "fontSize" => "12px" },
//! };
//!
//! // Two components with the same style share one node
//! let a = plugin.mount(Rc::new(MemoryElement::new()), Some(StyleSpec::from(style.clone()))).unwrap();
//! let b = plugin.mount(Rc::new(MemoryElement::new()), Some(StyleSpec::from(style))).unwrap();
//! assert_eq!(doc.stylesheet(), ":hover { color: red; }\nspan { font-size: 12px; }");
//!
//! // Unmounting the active one hands the CSS to the other
//! a.unmount().unwrap();
//! assert_eq!(doc.stylesheet(), ":hover { color: red; }\nspan { font-size: 12px; }");
//! b.unmount().unwrap();
//! assert!(doc.stylesheet().is_empty());
//! ```
//!
//! ## Pipeline
//!
//! The pure half lives in [`style`]: [`StyleMap::merge`], [`flatten`],
//! [`stringify`]. The stateful half lives in [`manager`]: a [`Registry`] of
//! [`StyleManager`]s writing into a [`host::Document`].

pub mod config;
pub mod error;
pub mod host;
pub mod manager;
pub mod style;
pub(crate) mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{Config, DEFAULT_PREFIX};
#[cfg(feature = "serde")]
pub use config::ConfigFile;
pub use error::{Error, Result};
pub use host::{MemoryDocument, MemoryElement, MountedStyles, Observable, StylePlugin};
pub use manager::{ClassAllocator, ManagerId, Registry, StyleManager};
pub use style::{FlatStyle, StyleMap, StyleSpec, StyleValue, ToCss, flatten, stringify};
