//! ToCss implementation for flattened styles.

use std::borrow::Cow;

use super::ToCss;
use super::flatten::{Declarations, FlatStyle};

/// Convert a camelCase property name to kebab-case.
///
/// Each ASCII uppercase letter becomes `-` followed by its lowercase form, so
/// `backgroundColor` becomes `background-color` and `WebkitTransition` becomes
/// `-webkit-transition`. Names without uppercase letters are borrowed as-is.
pub fn kebab_case(name: &str) -> Cow<'_, str> {
    if !name.bytes().any(|b| b.is_ascii_uppercase()) {
        return Cow::Borrowed(name);
    }

    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

/// Write one rule: `selector { prop: value; ... }`.
fn write_rule(selector: &str, declarations: &Declarations, buf: &mut String) {
    buf.push_str(selector);
    buf.push_str(" {");
    for (property, value) in declarations {
        buf.push(' ');
        buf.push_str(&kebab_case(property));
        buf.push_str(": ");
        buf.push_str(value);
        buf.push(';');
    }
    buf.push_str(" }");
}

impl ToCss for FlatStyle {
    fn to_css(&self, buf: &mut String) {
        let mut first = true;
        for (selector, declarations) in self.iter() {
            if declarations.is_empty() {
                continue;
            }
            if !first {
                buf.push('\n');
            }
            first = false;
            write_rule(selector, declarations, buf);
        }
    }
}

/// Render a flat style as CSS text.
///
/// This is the default stringifier used by [`Config`](crate::Config).
pub fn stringify(flat: &FlatStyle) -> String {
    flat.to_css_string()
}
