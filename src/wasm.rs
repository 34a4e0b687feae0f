//! WASM bindings for injecting styles into a browser document.
//!
//! [`WebDocument`] appends `<style>` elements to `document.body`, and
//! [`WebElement`] applies scoping classes through the element's class list.
//! The exported functions expose the pure pipeline to JavaScript.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, HtmlStyleElement};

use crate::error::{Error, Result};
use crate::host::{ClassTarget, Document, StyleNode};
use crate::manager::{ClassAllocator, generate};
use crate::style::{StyleMap, flatten_under, stringify};

fn host_err(context: &str, err: JsValue) -> Error {
    Error::Host(format!("{context}: {err:?}"))
}

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Style nodes go into the body of the window's document.
#[derive(Debug, Clone)]
pub struct WebDocument {
    document: web_sys::Document,
    body: HtmlElement,
}

impl WebDocument {
    /// Bind to the current window's document.
    pub fn current() -> Result<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| Error::Host("no document available".into()))?;
        let body = document
            .body()
            .ok_or_else(|| Error::Host("document has no body".into()))?;
        Ok(Self { document, body })
    }
}

impl Document for WebDocument {
    fn create_style_node(&self) -> Result<Box<dyn StyleNode>> {
        let element = self
            .document
            .create_element("style")
            .map_err(|e| host_err("create style element", e))?
            .dyn_into::<HtmlStyleElement>()
            .map_err(|_| Error::Host("created element is not a <style>".into()))?;
        Ok(Box::new(WebStyleNode {
            element,
            body: self.body.clone(),
        }))
    }
}

/// A `<style>` element owned by one manager.
#[derive(Debug)]
pub struct WebStyleNode {
    element: HtmlStyleElement,
    body: HtmlElement,
}

impl StyleNode for WebStyleNode {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.element.set_text_content(Some(text));
        Ok(())
    }

    fn text(&self) -> String {
        self.element.text_content().unwrap_or_default()
    }

    fn attach(&mut self) -> Result<()> {
        self.body
            .append_child(&self.element)
            .map_err(|e| host_err("append style element", e))?;
        Ok(())
    }

    fn detach(&mut self) -> Result<()> {
        self.element.remove();
        Ok(())
    }

    fn is_attached(&self) -> bool {
        self.element.parent_node().is_some()
    }
}

/// A component's root element.
#[derive(Debug, Clone)]
pub struct WebElement(pub Element);

impl ClassTarget for WebElement {
    fn add_class(&self, class: &str) -> Result<()> {
        self.0
            .class_list()
            .add_1(class)
            .map_err(|e| host_err("add class", e))
    }

    fn remove_class(&self, class: &str) -> Result<()> {
        self.0
            .class_list()
            .remove_1(class)
            .map_err(|e| host_err("remove class", e))
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }
}

/// Render a JSON style mapping to CSS text.
///
/// When the style ends up scoped, its rules are bound to a fresh class using
/// `prefix`, and the class name is returned on the first line as a CSS comment.
#[wasm_bindgen]
pub fn render_css(json: &str, scoped: bool, prefix: &str) -> std::result::Result<String, JsValue> {
    let to_js = |e: Error| JsValue::from_str(&e.to_string());

    let style = StyleMap::from_json(json).map_err(to_js)?;
    let class = ClassAllocator::new(prefix).allocate();
    let generated = generate(&style, &StyleMap::new(), scoped, &class, flatten_under, stringify)
        .map_err(to_js)?;

    if generated.scoped {
        Ok(format!("/* {class} */\n{}", generated.text))
    } else {
        Ok(generated.text)
    }
}
