//! Deduplication of identical CSS across style managers.
//!
//! These tests mount several managers against one in-memory document and
//! check that each distinct CSS text is present exactly once, including
//! across destroys and style changes.

use std::rc::Rc;

use dynstyle::{
    ClassAllocator, Config, MemoryDocument, MemoryElement, Registry, StyleManager, StyleMap,
    StyleSpec, style_map,
};

fn registry(config: Config) -> (Registry, MemoryDocument) {
    let doc = MemoryDocument::new();
    let registry = Registry::with_allocator(config, doc.clone(), ClassAllocator::with_seed("ds-", 1));
    (registry, doc)
}

fn button() -> StyleMap {
    style_map! {
        "&:hover" => { "color" => "red" },
        "span" => { "fontSize" => "12px" },
    }
}

const BUTTON_CSS: &str = ":hover { color: red; }\nspan { font-size: 12px; }";

fn mount(registry: &Registry, style: StyleMap) -> StyleManager {
    let manager = registry
        .create_manager(Rc::new(MemoryElement::new()))
        .expect("create manager");
    manager.set_style(style).expect("set style");
    manager
}

fn rendering_count(managers: &[StyleManager]) -> usize {
    managers
        .iter()
        .filter(|m| m.is_rendering().unwrap())
        .count()
}

// ============================================================================
// Dedup invariant
// ============================================================================

#[test]
fn test_identical_styles_share_one_node() {
    let (registry, doc) = registry(Config::default());
    let managers: Vec<_> = (0..5).map(|_| mount(&registry, button())).collect();

    assert_eq!(doc.count_text(BUTTON_CSS), 1);
    assert_eq!(doc.stylesheet(), BUTTON_CSS);
    assert_eq!(rendering_count(&managers), 1);
    assert!(managers[0].is_rendering().unwrap());
    assert!(managers[1..].iter().all(|m| !m.is_launched().unwrap()));

    let text = managers[0].css_text().unwrap().unwrap();
    assert_eq!(registry.managers_with_text(&text).len(), 5);
    assert_eq!(registry.active_renderer(&text), Some(managers[0].id()));
}

#[test]
fn test_different_styles_render_separately() {
    let (registry, doc) = registry(Config::default());
    let _a = mount(&registry, button());
    let _b = mount(&registry, style_map! { "p" => { "margin" => 0 } });

    assert_eq!(doc.attached_count(), 2);
    assert_eq!(doc.stylesheet(), format!("{BUTTON_CSS}\np {{ margin: 0; }}"));
}

#[test]
fn test_computed_and_static_with_same_output_dedup() {
    let (registry, doc) = registry(Config::default());
    let _a = mount(&registry, button());
    let b = registry
        .create_manager(Rc::new(MemoryElement::new()))
        .unwrap();
    b.set_style(StyleSpec::computed(button)).unwrap();

    assert_eq!(doc.count_text(BUTTON_CSS), 1);
    assert!(!b.is_rendering().unwrap());
}

// ============================================================================
// Destroy reassignment
// ============================================================================

#[test]
fn test_destroying_renderer_hands_css_to_survivor() {
    let (registry, doc) = registry(Config::default());
    let a = mount(&registry, button());
    let b = mount(&registry, button());
    assert!(a.is_rendering().unwrap());

    a.destroy().unwrap();

    assert_eq!(doc.count_text(BUTTON_CSS), 1);
    assert!(b.is_rendering().unwrap());
    assert!(b.is_launched().unwrap());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_destroying_covered_manager_changes_nothing() {
    let (registry, doc) = registry(Config::default());
    let a = mount(&registry, button());
    let b = mount(&registry, button());

    b.destroy().unwrap();

    assert_eq!(doc.count_text(BUTTON_CSS), 1);
    assert!(a.is_rendering().unwrap());
    assert_eq!(doc.node_count(), 2);
}

#[test]
fn test_reassignment_follows_registry_order() {
    let (registry, _doc) = registry(Config::default());
    let a = mount(&registry, button());
    let b = mount(&registry, button());
    let c = mount(&registry, button());

    a.destroy().unwrap();
    assert!(b.is_rendering().unwrap());
    assert!(!c.is_rendering().unwrap());

    b.destroy().unwrap();
    assert!(c.is_rendering().unwrap());
}

#[test]
fn test_destroying_last_manager_removes_css() {
    let (registry, doc) = registry(Config::default());
    let a = mount(&registry, button());
    let b = mount(&registry, button());

    a.destroy().unwrap();
    b.destroy().unwrap();

    assert_eq!(doc.stylesheet(), "");
    assert_eq!(doc.attached_count(), 0);
    assert!(registry.is_empty());
    assert!(registry.managers_with_text(BUTTON_CSS).is_empty());
}

// ============================================================================
// Style changes
// ============================================================================

#[test]
fn test_renderer_changing_style_hands_off_old_css() {
    let (registry, doc) = registry(Config::default());
    let a = mount(&registry, button());
    let b = mount(&registry, button());

    a.update(&style_map! { "span" => { "fontSize" => "14px" } })
        .unwrap();

    assert_eq!(doc.count_text(BUTTON_CSS), 1);
    assert!(b.is_rendering().unwrap());
    assert!(a.is_rendering().unwrap());
    assert_eq!(doc.attached_count(), 2);
}

#[test]
fn test_covered_manager_diverging_renders_its_own_css() {
    let (registry, doc) = registry(Config::default());
    let a = mount(&registry, button());
    let b = mount(&registry, button());

    b.update(&style_map! { "span" => { "color" => "blue" } })
        .unwrap();

    assert!(a.is_rendering().unwrap());
    assert!(b.is_rendering().unwrap());
    assert!(b.is_launched().unwrap());
    assert_eq!(doc.count_text(BUTTON_CSS), 1);
}

#[test]
fn test_converging_manager_becomes_covered() {
    let (registry, doc) = registry(Config::default());
    let a = mount(&registry, button());
    let b = mount(&registry, style_map! { "p" => { "margin" => 0 } });
    assert!(b.is_rendering().unwrap());

    b.set_style(button()).unwrap();

    assert!(a.is_rendering().unwrap());
    assert!(!b.is_rendering().unwrap());
    // b stays launched but blank
    assert_eq!(doc.count_text(BUTTON_CSS), 1);
    assert_eq!(doc.count_text(""), 1);
    assert_eq!(doc.stylesheet(), BUTTON_CSS);
}

#[test]
fn test_force_recompute_takes_over_rendering() {
    let (registry, doc) = registry(Config::default());
    let a = mount(&registry, button());
    let b = mount(&registry, button());

    b.force_recompute().unwrap();

    assert!(b.is_rendering().unwrap());
    assert!(!a.is_rendering().unwrap());
    assert_eq!(doc.count_text(BUTTON_CSS), 1);
}

// ============================================================================
// Scoped isolation
// ============================================================================

#[test]
fn test_scoped_managers_never_dedup() {
    let (registry, doc) = registry(Config::default().with_scoped(true));
    let a = mount(&registry, button());
    let b = mount(&registry, button());

    let text_a = a.css_text().unwrap().unwrap();
    let text_b = b.css_text().unwrap().unwrap();
    assert_ne!(text_a, text_b);
    assert!(text_a.contains(&format!(".{}:hover {{ color: red; }}", a.class_name())));
    assert!(text_b.contains(&format!(".{} span {{ font-size: 12px; }}", b.class_name())));

    assert!(a.is_rendering().unwrap() && b.is_rendering().unwrap());
    assert_eq!(doc.attached_count(), 2);
    assert!(registry.managers_with_text(&text_a).is_empty());
}

#[test]
fn test_scoped_and_unscoped_do_not_share() {
    let (registry, doc) = registry(Config::default());
    let _plain = mount(&registry, button());
    let mut scoped_style = button();
    scoped_style.insert("scoped", true);
    let scoped = mount(&registry, scoped_style);

    assert!(scoped.is_scoped().unwrap());
    assert!(scoped.is_rendering().unwrap());
    assert_eq!(doc.attached_count(), 2);
    assert_eq!(doc.count_text(BUTTON_CSS), 1);
}

#[test]
fn test_scoped_destroy_removes_class() {
    let (registry, doc) = registry(Config::default().with_scoped(true));
    let el = MemoryElement::with_classes(["card"]);
    let manager = registry.create_manager(Rc::new(el.clone())).unwrap();
    manager.set_style(button()).unwrap();
    let class = manager.class_name().to_string();
    assert_eq!(el.classes(), vec!["card".to_string(), class.clone()]);

    manager.destroy().unwrap();

    assert_eq!(el.classes(), vec!["card".to_string()]);
    assert_eq!(doc.attached_count(), 0);
}
