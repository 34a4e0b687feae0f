//! Style data and the pure CSS pipeline.
//!
//! This module contains:
//! - StyleMap and StyleValue, the nested style description with deep merge
//! - StyleSpec, a static or computed style source
//! - The flattener (nested selectors to a flat selector map)
//! - The stringifier (flat selector map to CSS text)

mod flatten;
mod map;
mod spec;
mod to_css;

pub trait ToCss {
    /// Write this value as CSS to the buffer.
    fn to_css(&self, buf: &mut String);

    /// Convert to a CSS string (convenience method).
    fn to_css_string(&self) -> String {
        let mut buf = String::new();
        self.to_css(&mut buf);
        buf
    }
}

pub use flatten::{CONCAT_MARKER, Declarations, FlatStyle, child_selector, flatten, flatten_under};
pub use map::{StyleMap, StyleValue};
pub use spec::StyleSpec;
pub use to_css::{kebab_case, stringify};
