//! Tests for rendering documents into live trees and serializing them back.

use voxel_editor::{Document, EditorConfig, LiveTree};

fn render(html: &str) -> LiveTree {
    LiveTree::render(&Document::load(html), &EditorConfig::default())
}

#[test]
fn test_render_injects_style_block_into_head() {
    let live = render("<html><head><title>T</title></head><body><p>x</p></body></html>");
    let tree = live.tree();
    let style = tree.element_by_id("voxel-editor-styles").unwrap();
    assert!(tree.is_element_named(style, "style"));
    assert_eq!(tree.parent(style), tree.head());
    assert!(tree.text_content(style).contains("data-voxel-selected"));
}

#[test]
fn test_render_creates_head_when_missing() {
    let live = render("<p>bare</p>");
    assert!(live.tree().head().is_some());
    assert!(live.markup().contains(r#"<style id="voxel-editor-styles">"#));
}

#[test]
fn test_serialize_round_trips_clean_document() {
    let html = "<!DOCTYPE html><html><head></head><body><h1>Hi</h1></body></html>";
    assert_eq!(render(html).serialize(), html);
}

#[test]
fn test_serialize_never_contains_style_block() {
    let live = render("<html><head></head><body></body></html>");
    assert!(live.markup().contains("voxel-editor-styles"));
    assert!(!live.serialize().contains("voxel-editor-styles"));
}

#[test]
fn test_stale_saved_block_is_replaced_not_duplicated() {
    let live = render(
        r#"<html><head><style id="voxel-editor-styles">old</style></head><body></body></html>"#,
    );
    assert_eq!(live.markup().matches("voxel-editor-styles").count(), 1);
    assert!(!live.markup().contains(">old<"));
    assert_eq!(live.serialize(), "<html><head></head><body></body></html>");
}

#[test]
fn test_serialize_twice_is_stable() {
    let live = render(r#"<html><head><style>p{}</style></head><body><p class="a">x</p></body></html>"#);
    let once = live.serialize();
    let again = LiveTree::render(&Document::load(once.clone()), &EditorConfig::default()).serialize();
    assert_eq!(once, again);
}

#[test]
fn test_root_containers() {
    let live = render("<html><head></head><body><div>x</div></body></html>");
    let tree = live.tree();
    let html = tree.document_element().unwrap();
    let body = tree.body().unwrap();
    let div = tree.find_element(tree.root(), "div").unwrap();
    assert!(live.is_root_container(tree.root()));
    assert!(live.is_root_container(html));
    assert!(live.is_root_container(body));
    assert!(!live.is_root_container(div));
    assert_eq!(live.root_container(), Some(body));
}

#[test]
fn test_only_body_descendants_are_selectable() {
    let live = render("<html><head><title>T</title></head><body><div>x</div></body></html>");
    let tree = live.tree();
    let title = tree.find_element(tree.root(), "title").unwrap();
    let div = tree.find_element(tree.root(), "div").unwrap();
    let text = tree.first_child(div).unwrap();
    assert!(live.is_selectable(div));
    assert!(!live.is_selectable(title));
    assert!(!live.is_selectable(text));
    assert!(!live.is_selectable(tree.body().unwrap()));
}

#[test]
fn test_injected_editable_flag_is_not_serialized() {
    let mut live = render("<html><head></head><body><p>x</p></body></html>");
    let p = live.tree().find_element(live.tree().root(), "p").unwrap();
    live.set_editable(p);
    assert!(live.markup().contains(r#"<p contenteditable="true">x</p>"#));
    assert_eq!(live.serialize(), "<html><head></head><body><p>x</p></body></html>");
    live.clear_editable();
    assert_eq!(live.editable(), None);
    assert!(!live.markup().contains("contenteditable"));
}

#[test]
fn test_authored_editable_value_survives_editing() {
    let html = r#"<html><head></head><body><p contenteditable="false">x</p></body></html>"#;
    let mut live = render(html);
    let p = live.tree().find_element(live.tree().root(), "p").unwrap();
    live.set_editable(p);
    assert_eq!(live.serialize(), html);
    live.clear_editable();
    assert_eq!(live.serialize(), html);
}

#[test]
fn test_custom_style_id_is_used() {
    let config = EditorConfig {
        style_id: "my-editor".to_string(),
        ..EditorConfig::default()
    };
    let live = LiveTree::render(&Document::load("<p>x</p>"), &config);
    assert!(live.tree().element_by_id("my-editor").is_some());
    assert!(!live.serialize().contains("my-editor"));
}

#[test]
fn test_element_count_includes_scaffolding() {
    let live = render("<html><head></head><body><p>a</p><p>b</p></body></html>");
    // html, head, style, body, p, p
    assert_eq!(live.element_count(), 6);
}
