//! Style sources: a fixed mapping or a producer evaluated on every update.

use std::fmt;
use std::rc::Rc;

use super::map::StyleMap;
use crate::error::{BoxError, Error, Result};

type Producer = Rc<dyn Fn() -> std::result::Result<StyleMap, BoxError>>;

/// The style a component declares.
#[derive(Clone)]
pub enum StyleSpec {
    /// A mapping that never changes.
    Static(StyleMap),
    /// A producer re-evaluated at the start of every recompute.
    Computed(Producer),
}

impl StyleSpec {
    /// Wrap an infallible producer.
    pub fn computed(f: impl Fn() -> StyleMap + 'static) -> Self {
        StyleSpec::Computed(Rc::new(move || Ok(f())))
    }

    /// Wrap a fallible producer; its errors surface as [`Error::Producer`].
    pub fn try_computed(
        f: impl Fn() -> std::result::Result<StyleMap, BoxError> + 'static,
    ) -> Self {
        StyleSpec::Computed(Rc::new(f))
    }

    /// Evaluate into a concrete mapping.
    pub fn evaluate(&self) -> Result<StyleMap> {
        match self {
            StyleSpec::Static(map) => Ok(map.clone()),
            StyleSpec::Computed(produce) => produce().map_err(Error::Producer),
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, StyleSpec::Computed(_))
    }
}

impl From<StyleMap> for StyleSpec {
    fn from(map: StyleMap) -> Self {
        StyleSpec::Static(map)
    }
}

impl fmt::Debug for StyleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleSpec::Static(map) => f.debug_tuple("Static").field(map).finish(),
            StyleSpec::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::style_map;

    #[test]
    fn test_computed_is_reevaluated() {
        let width = Rc::new(Cell::new(10));
        let source = Rc::clone(&width);
        let spec = StyleSpec::computed(move || style_map! { "div" => { "width" => source.get() } });

        let first = spec.evaluate().unwrap();
        width.set(20);
        let second = spec.evaluate().unwrap();

        assert_ne!(first, second);
        assert!(spec.is_computed());
    }

    #[test]
    fn test_producer_error_propagates() {
        let spec = StyleSpec::try_computed(|| Err("theme not loaded".into()));
        let err = spec.evaluate().unwrap_err();
        assert!(matches!(err, Error::Producer(_)));
        assert!(err.to_string().contains("theme not loaded"));
    }
}
