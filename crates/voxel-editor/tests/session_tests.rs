//! End-to-end tests for the editor session: selection, text editing,
//! debounced commits, structural mutations, toolbar and persistence.

use std::time::Duration;

use voxel_common::notice::NoticeLevel;
use voxel_dom::NodeId;
use voxel_editor::{
    CommitReason, DataUrlImageStore, Document, EditorConfig, EditorError, EditorEvent,
    EditorSession, EditorState, ElementProperties, FragmentOrigin, ImageStore, ManualClock,
    MemoryStore, ScreenStore, SharedDocument, StoreError, ToolbarAction, Version, VersionMeta,
    Viewport,
};

const SELECTED: &str = "data-voxel-selected";

struct Harness {
    session: EditorSession,
    sink: SharedDocument,
    clock: ManualClock,
}

fn open(html: &str) -> Harness {
    open_with(html, EditorConfig::default())
}

fn open_with(html: &str, config: EditorConfig) -> Harness {
    let sink = SharedDocument::new();
    let clock = ManualClock::new();
    let session = EditorSession::new(Document::load(html), config, Box::new(sink.clone()))
        .with_clock(Box::new(clock.clone()));
    Harness {
        session,
        sink,
        clock,
    }
}

fn find(session: &EditorSession, tag: &str) -> NodeId {
    let tree = session.live_tree().tree();
    tree.find_element(tree.root(), tag).unwrap()
}

fn viewport() -> Viewport {
    Viewport {
        width: 800.0,
        height: 600.0,
    }
}

#[test]
fn test_round_trip_text_edit() {
    let mut h = open("<html><head></head><body><h1>Hi</h1></body></html>");
    let h1 = find(&h.session, "h1");

    h.session.dispatch(EditorEvent::Click(h1));
    assert_eq!(h.session.state(), EditorState::Selected);
    assert!(h.session.begin_text_edit());
    assert_eq!(h.session.state(), EditorState::EditingText);
    h.session.dispatch(EditorEvent::Input {
        html: "Hello".to_string(),
    });
    h.session.dispatch(EditorEvent::Blur);

    let html = h.sink.current().unwrap();
    assert_eq!(html, "<html><head></head><body><h1>Hello</h1></body></html>");
    assert!(!html.contains("voxel-editor-styles"));
    assert_eq!(h.session.document().raw, html);
    assert_eq!(h.session.state(), EditorState::Selected);
}

#[test]
fn test_text_edit_keeps_inline_markup() {
    let mut h = open("<html><head></head><body><p>Hi <b>there</b></p></body></html>");
    let p = find(&h.session, "p");

    h.session.dispatch(EditorEvent::Click(p));
    assert!(h.session.begin_text_edit());
    h.session.dispatch(EditorEvent::Input {
        html: "Hi <b>there</b>!".to_string(),
    });
    h.session.dispatch(EditorEvent::Blur);

    assert_eq!(
        h.sink.current().unwrap(),
        "<html><head></head><body><p>Hi <b>there</b>!</p></body></html>"
    );
}

#[test]
fn test_text_edit_keeps_nested_list() {
    let mut h = open(
        "<html><head></head><body><ul><li>One<ul><li>Sub</li></ul></li></ul></body></html>",
    );
    let li = find(&h.session, "li");
    let _ = h.session.select(Some(li));
    assert!(h.session.begin_text_edit());
    assert!(h.session.input("One more<ul><li>Sub</li></ul>"));
    h.session.blur();

    let html = h.sink.current().unwrap();
    assert_eq!(
        html,
        "<html><head></head><body><ul><li>One more<ul><li>Sub</li></ul></li></ul></body></html>"
    );
    assert!(!html.contains("contenteditable"));
}

#[test]
fn test_debounce_collapses_burst_into_last_state() {
    let mut h = open("<html><head></head><body><p>x</p></body></html>");
    let p = find(&h.session, "p");
    let _ = h.session.select(Some(p));
    assert!(h.session.begin_text_edit());

    for text in ["H", "He", "Hel", "Hell", "Hello"] {
        assert!(h.session.input(text));
        h.clock.advance(Duration::from_millis(100));
        assert!(!h.session.tick());
    }
    assert_eq!(h.sink.commit_count(), 0);
    assert!(h.session.has_pending_commit());

    h.clock.advance(Duration::from_millis(800));
    assert!(h.session.tick());
    let commits = h.sink.commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].reason, CommitReason::Debounce);
    assert!(commits[0].html.contains("<p>Hello</p>"));

    h.clock.advance(Duration::from_secs(5));
    assert!(!h.session.tick());
    assert_eq!(h.sink.commit_count(), 1);
}

#[test]
fn test_debounced_commit_carries_no_editor_artifacts() {
    let mut h = open("<html><head></head><body><p>x</p></body></html>");
    let p = find(&h.session, "p");
    let _ = h.session.select(Some(p));
    let _ = h.session.hover(Some(p));
    assert!(h.session.begin_text_edit());
    let _ = h.session.input("typed");
    h.clock.advance(Duration::from_millis(800));
    assert!(h.session.tick());

    let html = h.sink.current().unwrap();
    assert_eq!(html, "<html><head></head><body><p>typed</p></body></html>");
}

#[test]
fn test_blur_flushes_before_window_elapses() {
    let mut h = open("<html><head></head><body><p>x</p></body></html>");
    let p = find(&h.session, "p");
    let _ = h.session.select(Some(p));
    assert!(h.session.begin_text_edit());
    let _ = h.session.input("final");
    h.clock.advance(Duration::from_millis(10));
    h.session.blur();

    let commits = h.sink.commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].reason, CommitReason::Blur);
    assert!(commits[0].html.contains("<p>final</p>"));

    // The cancelled timer must not fire a stale commit later.
    h.clock.advance(Duration::from_secs(2));
    assert!(!h.session.tick());
    assert_eq!(h.sink.commit_count(), 1);
}

#[test]
fn test_selecting_elsewhere_ends_text_edit_with_commit() {
    let mut h = open("<html><head></head><body><h1>a</h1><p>b</p></body></html>");
    let h1 = find(&h.session, "h1");
    let p = find(&h.session, "p");
    let _ = h.session.select(Some(h1));
    assert!(h.session.begin_text_edit());
    let _ = h.session.input("edited");
    h.session.dispatch(EditorEvent::Click(p));

    assert_eq!(h.session.selected(), Some(p));
    assert_eq!(h.session.state(), EditorState::Selected);
    assert_eq!(h.sink.commits()[0].reason, CommitReason::Blur);
    assert!(h.sink.current().unwrap().contains("<h1>edited</h1>"));
}

#[test]
fn test_click_inside_editable_keeps_editing() {
    let mut h = open("<html><head></head><body><p>a <b>b</b></p></body></html>");
    let p = find(&h.session, "p");
    let b = find(&h.session, "b");
    let _ = h.session.select(Some(p));
    assert!(h.session.begin_text_edit());
    h.session.dispatch(EditorEvent::Click(b));
    assert_eq!(h.session.state(), EditorState::EditingText);
    assert_eq!(h.session.selected(), Some(p));
}

#[test]
fn test_text_edit_requires_text_bearing_selection() {
    let mut h = open("<html><head></head><body><div><img src=\"a.png\"></div></body></html>");
    assert!(!h.session.begin_text_edit());
    let div = find(&h.session, "div");
    let _ = h.session.select(Some(div));
    assert!(!h.session.begin_text_edit());
    assert_eq!(h.session.state(), EditorState::Selected);
}

#[test]
fn test_delete_clears_selection_and_second_delete_is_noop() {
    let mut h = open("<html><head></head><body><h1>a</h1><p>b</p></body></html>");
    let p = find(&h.session, "p");
    let _ = h.session.select(Some(p));

    assert!(h.session.delete_selected());
    assert_eq!(h.session.selected(), None);
    assert_eq!(h.session.state(), EditorState::Idle);
    assert!(h.session.properties().is_none());
    assert_eq!(
        h.sink.current().unwrap(),
        "<html><head></head><body><h1>a</h1></body></html>"
    );

    assert!(!h.session.delete_selected());
    assert_eq!(h.sink.commit_count(), 1);
}

#[test]
fn test_delete_refused_while_editing_text() {
    let mut h = open("<html><head></head><body><p>b</p></body></html>");
    let p = find(&h.session, "p");
    let _ = h.session.select(Some(p));
    assert!(h.session.begin_text_edit());
    assert!(!h.session.delete_selected());
    assert!(h.session.live_tree().is_connected(p));
    assert_eq!(h.sink.commit_count(), 0);
}

#[test]
fn test_duplicate_keeps_original_selected() {
    let mut h = open("<html><head></head><body><ul><li class=\"item\">One</li></ul></body></html>");
    let li = find(&h.session, "li");
    let _ = h.session.select(Some(li));
    let _ = h.session.hover(Some(li));

    let copy = h.session.duplicate_selected().unwrap();
    let tree = h.session.live_tree().tree();
    assert_eq!(h.session.selected(), Some(li));
    assert_eq!(tree.next_sibling(li), Some(copy));
    assert!(tree.as_element(li).unwrap().attrs.contains(SELECTED));
    assert!(!tree.as_element(copy).unwrap().attrs.contains(SELECTED));
    assert_eq!(tree.elements_with_attribute(SELECTED), [li]);

    let commit = h.sink.commits().pop().unwrap();
    assert_eq!(commit.reason, CommitReason::Duplicate);
    assert!(commit.html.contains(r#"<li class="item">One</li><li class="item">One</li>"#));
}

#[test]
fn test_duplicate_without_selection_is_noop() {
    let mut h = open("<html><head></head><body><p>x</p></body></html>");
    assert!(h.session.duplicate_selected().is_none());
    assert_eq!(h.sink.commit_count(), 0);
}

#[test]
fn test_replace_image_requires_image_target() {
    let mut h = open("<html><head></head><body><div>text</div><img src=\"a.png\"></body></html>");
    let div = find(&h.session, "div");
    let _ = h.session.select(Some(div));
    let before = h.session.live_tree().markup();

    assert!(!h.session.replace_image("https://example.com/b.png"));
    assert_eq!(h.session.live_tree().markup(), before);
    assert_eq!(h.sink.commit_count(), 0);

    let mut images = DataUrlImageStore::default();
    assert!(!h
        .session
        .replace_image_from_upload(&mut images, "b.png", b"\x89PNG")
        .unwrap());
    assert!(images.list_user_images().is_empty());
    assert_eq!(h.sink.commit_count(), 0);
}

#[test]
fn test_replace_image_updates_src_and_properties() {
    let mut h = open("<html><head></head><body><img src=\"a.png\" alt=\"A\"></body></html>");
    let img = find(&h.session, "img");
    let _ = h.session.select(Some(img));

    assert!(h.session.replace_image("b.png"));
    assert_eq!(h.sink.commits()[0].reason, CommitReason::ReplaceImage);
    assert!(h.sink.current().unwrap().contains(r#"<img src="b.png" alt="A">"#));
    match h.session.properties() {
        Some(ElementProperties::Image { src, .. }) => assert_eq!(src, "b.png"),
        other => panic!("expected image properties, got {other:?}"),
    }
}

#[test]
fn test_replace_image_from_upload_uses_data_url() {
    let mut h = open("<html><head></head><body><img src=\"a.png\"></body></html>");
    let img = find(&h.session, "img");
    let _ = h.session.select(Some(img));
    let mut images = DataUrlImageStore::default();

    assert!(h
        .session
        .replace_image_from_upload(&mut images, "pic.png", b"png-bytes")
        .unwrap());
    let src = h
        .session
        .live_tree()
        .tree()
        .as_element(img)
        .unwrap()
        .attrs
        .get("src")
        .unwrap()
        .to_string();
    assert!(src.starts_with("data:image/png;base64,"));
    assert_eq!(images.list_user_images(), [src]);
}

#[test]
fn test_failed_upload_surfaces_error_and_keeps_document() {
    let mut h = open("<html><head></head><body><img src=\"a.png\"></body></html>");
    let img = find(&h.session, "img");
    let _ = h.session.select(Some(img));
    let mut images = DataUrlImageStore::default();

    let result = h.session.replace_image_from_upload(&mut images, "empty.png", b"");
    assert!(matches!(result, Err(EditorError::Image(_))));
    assert_eq!(h.sink.commit_count(), 0);
    assert_eq!(h.session.take_notices()[0].level, NoticeLevel::Error);
}

#[test]
fn test_style_and_attribute_patches_commit_individually() {
    let mut h = open("<html><head></head><body><p>x</p></body></html>");
    let p = find(&h.session, "p");
    let _ = h.session.select(Some(p));

    assert!(h.session.set_style("color", "#ff0000"));
    assert!(h.session.set_style("font-size", "20px"));
    assert!(h.session.set_attribute("title", "Tip"));
    let reasons: Vec<_> = h.sink.commits().iter().map(|c| c.reason).collect();
    assert_eq!(
        reasons,
        [CommitReason::Style, CommitReason::Style, CommitReason::Attribute]
    );
    assert!(h
        .sink
        .current()
        .unwrap()
        .contains(r#"<p style="color: #ff0000; font-size: 20px;" title="Tip">x</p>"#));
    let style = h.session.properties().unwrap().style();
    assert_eq!(style.color, "rgb(255, 0, 0)");
    assert_eq!(style.font_size, "20px");
}

#[test]
fn test_marker_attributes_cannot_be_set_directly() {
    let mut h = open("<html><head></head><body><p>x</p></body></html>");
    let p = find(&h.session, "p");
    let _ = h.session.select(Some(p));
    assert!(!h.session.set_attribute("data-voxel-hover", "true"));
    assert!(!h.session.set_attribute("bad name", "x"));
    assert_eq!(h.sink.commit_count(), 0);
}

#[test]
fn test_generated_fragment_is_wrapped_and_appended() {
    let mut h = open("<html><head></head><body><p>x</p></body></html>");
    let wrapper = h
        .session
        .insert_fragment("<button>Go</button>", FragmentOrigin::Generated)
        .unwrap();
    assert_eq!(h.session.live_tree().tree().parent(wrapper), h.session.live_tree().root_container());
    assert_eq!(
        h.sink.current().unwrap(),
        r#"<html><head></head><body><p>x</p><div data-voxel-inserted="generated"><button>Go</button></div></body></html>"#
    );
    assert_eq!(h.sink.commits()[0].reason, CommitReason::InsertFragment);
}

#[test]
fn test_library_fragment_wrapping_follows_config() {
    let config = EditorConfig {
        wrap_library_fragments: false,
        ..EditorConfig::default()
    };
    let mut h = open_with("<html><head></head><body></body></html>", config);
    let _ = h.session.insert_fragment("<hr><p>lib</p>", FragmentOrigin::Library);
    assert_eq!(
        h.sink.current().unwrap(),
        "<html><head></head><body><hr><p>lib</p></body></html>"
    );

    let mut wrapped = open("<html><head></head><body></body></html>");
    let _ = wrapped.session.insert_fragment("<p>lib</p>", FragmentOrigin::Library);
    assert!(wrapped
        .sink
        .current()
        .unwrap()
        .contains(r#"<div data-voxel-inserted="library"><p>lib</p></div>"#));
}

#[test]
fn test_blank_fragment_is_ignored() {
    let mut h = open("<html><head></head><body></body></html>");
    assert!(h.session.insert_fragment("   ", FragmentOrigin::Generated).is_none());
    assert_eq!(h.sink.commit_count(), 0);
}

#[test]
fn test_toolbar_hidden_by_new_selection() {
    let mut h = open("<html><head></head><body><h1>A</h1><p>B</p></body></html>");
    let a = find(&h.session, "h1");
    let b = find(&h.session, "p");

    h.session.dispatch(EditorEvent::SecondaryClick {
        target: a,
        x: 100.0,
        y: 200.0,
        viewport: viewport(),
    });
    assert!(h.session.toolbar().visible);
    assert_eq!(h.session.toolbar().target, Some(a));

    h.session.dispatch(EditorEvent::Click(b));
    assert!(!h.session.toolbar().visible);
    assert_eq!(h.session.toolbar().target, None);
    assert_eq!(h.session.selected(), Some(b));
}

#[test]
fn test_toolbar_hidden_by_outside_click_and_actions() {
    let mut h = open("<html><head></head><body><p>A</p></body></html>");
    let p = find(&h.session, "p");
    let open_toolbar = |session: &mut EditorSession| {
        session.dispatch(EditorEvent::SecondaryClick {
            target: p,
            x: 10.0,
            y: 10.0,
            viewport: viewport(),
        });
    };

    open_toolbar(&mut h.session);
    h.session.dispatch(EditorEvent::OutsideClick);
    assert!(!h.session.toolbar().visible);

    open_toolbar(&mut h.session);
    h.session.dispatch(EditorEvent::Toolbar(ToolbarAction::Duplicate));
    assert!(!h.session.toolbar().visible);
    assert_eq!(h.sink.commits()[0].reason, CommitReason::Duplicate);
}

#[test]
fn test_toolbar_edit_text_action_enters_editing() {
    let mut h = open("<html><head></head><body><p>A</p></body></html>");
    let p = find(&h.session, "p");
    h.session.dispatch(EditorEvent::SecondaryClick {
        target: p,
        x: 0.0,
        y: 0.0,
        viewport: viewport(),
    });
    h.session.dispatch(EditorEvent::Toolbar(ToolbarAction::EditText));
    assert_eq!(h.session.state(), EditorState::EditingText);
    assert_eq!(h.session.live_tree().editable(), Some(p));
}

#[test]
fn test_toolbar_delete_action() {
    let mut h = open("<html><head></head><body><p>A</p><p>B</p></body></html>");
    let p = find(&h.session, "p");
    h.session.dispatch(EditorEvent::SecondaryClick {
        target: p,
        x: 0.0,
        y: 0.0,
        viewport: viewport(),
    });
    h.session.dispatch(EditorEvent::Toolbar(ToolbarAction::Delete));
    assert_eq!(h.session.selected(), None);
    assert_eq!(
        h.sink.current().unwrap(),
        "<html><head></head><body><p>B</p></body></html>"
    );
}

#[test]
fn test_secondary_click_on_image_opens_replace_flow() {
    let mut h = open("<html><head></head><body><img src=\"a.png\"></body></html>");
    let img = find(&h.session, "img");
    h.session.dispatch(EditorEvent::SecondaryClick {
        target: img,
        x: 790.0,
        y: 5.0,
        viewport: viewport(),
    });
    let toolbar = h.session.toolbar();
    assert!(toolbar.visible);
    assert!(toolbar.is_image);
    assert!(toolbar.actions().contains(&ToolbarAction::ChangeImage));
    assert!((toolbar.x - 600.0).abs() < f32::EPSILON);
    assert!((toolbar.y - 10.0).abs() < f32::EPSILON);
    assert_eq!(h.session.image_replace_target(), Some(img));

    assert!(h.session.replace_image("c.png"));
    assert_eq!(h.session.image_replace_target(), None);
}

#[test]
fn test_background_click_and_escape_return_to_idle() {
    let mut h = open("<html><head></head><body><p>A</p></body></html>");
    let p = find(&h.session, "p");
    h.session.dispatch(EditorEvent::Click(p));
    h.session.dispatch(EditorEvent::BackgroundClick);
    assert_eq!(h.session.state(), EditorState::Idle);

    h.session.dispatch(EditorEvent::Click(p));
    assert!(h.session.begin_text_edit());
    h.session.dispatch(EditorEvent::Escape);
    assert_eq!(h.session.state(), EditorState::Idle);
    assert_eq!(h.sink.commits()[0].reason, CommitReason::Blur);
}

#[test]
fn test_click_on_body_selects_nothing() {
    let mut h = open("<html><head></head><body><p>A</p></body></html>");
    let p = find(&h.session, "p");
    let body = h.session.live_tree().root_container().unwrap();
    h.session.dispatch(EditorEvent::Click(p));
    h.session.dispatch(EditorEvent::Click(body));
    assert_eq!(h.session.selected(), None);
    assert_eq!(h.session.state(), EditorState::Idle);
}

#[test]
fn test_pointer_events_move_hover() {
    let mut h = open("<html><head></head><body><h1>A</h1><p>B</p></body></html>");
    let a = find(&h.session, "h1");
    let b = find(&h.session, "p");
    h.session.dispatch(EditorEvent::PointerEnter(a));
    h.session.dispatch(EditorEvent::PointerEnter(b));
    assert_eq!(h.session.hovered(), Some(b));
    h.session.dispatch(EditorEvent::PointerLeave(a));
    assert_eq!(h.session.hovered(), Some(b));
    h.session.dispatch(EditorEvent::PointerLeave(b));
    assert_eq!(h.session.hovered(), None);
    assert_eq!(h.sink.commit_count(), 0);
}

#[test]
fn test_selection_path_and_properties_follow_selection() {
    let mut h = open(r#"<html><head></head><body><main id="app"><h2 class="title">T</h2></main></body></html>"#);
    let h2 = find(&h.session, "h2");
    let _ = h.session.select(Some(h2));
    assert_eq!(h.session.selection_path(), "html > body > main#app > h2.title");
    match h.session.properties() {
        Some(ElementProperties::Text { tag, text, style }) => {
            assert_eq!(tag, "h2");
            assert_eq!(text, "T");
            assert_eq!(style.font_size, "24px");
        }
        other => panic!("expected text properties, got {other:?}"),
    }
}

#[test]
fn test_drop_flushes_pending_edit() {
    let sink = SharedDocument::new();
    {
        let mut session = EditorSession::new(
            Document::load("<html><head></head><body><p>x</p></body></html>"),
            EditorConfig::default(),
            Box::new(sink.clone()),
        )
        .with_clock(Box::new(ManualClock::new()));
        let tree = session.live_tree().tree();
        let p = tree.find_element(tree.root(), "p").unwrap();
        let _ = session.select(Some(p));
        assert!(session.begin_text_edit());
        let _ = session.input("unsaved");
    }
    let commits = sink.commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].reason, CommitReason::Teardown);
    assert!(commits[0].html.contains("<p>unsaved</p>"));
    assert!(!commits[0].html.contains("contenteditable"));
}

#[test]
fn test_close_without_pending_edit_commits_nothing() {
    let mut h = open("<html><head></head><body><p>x</p></body></html>");
    h.session.close();
    h.session.close();
    assert_eq!(h.sink.commit_count(), 0);
}

#[test]
fn test_open_screen_flushes_and_resets() {
    let mut h = open("<html><head></head><body><p>x</p></body></html>");
    let p = find(&h.session, "p");
    let _ = h.session.select(Some(p));
    assert!(h.session.begin_text_edit());
    let _ = h.session.input("old screen");

    h.session
        .open_screen(Document::load("<html><head></head><body><h1>New</h1></body></html>"));
    assert_eq!(h.sink.commits()[0].reason, CommitReason::Teardown);
    assert!(h.sink.commits()[0].html.contains("old screen"));
    assert_eq!(h.session.selected(), None);
    assert_eq!(h.session.state(), EditorState::Idle);
    assert!(!h.session.has_pending_commit());
    assert!(h.session.live_tree().markup().contains("<h1>New</h1>"));
}

#[test]
fn test_open_source_falls_back_to_placeholder() {
    let mut h = open("<html><head></head><body></body></html>");
    h.session.open_source("/definitely/not/here.html", "Checkout");
    assert!(h.session.document().raw.contains("Checkout"));
    let notices = h.session.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
}

#[test]
fn test_save_version_appends_to_store() {
    let mut store = MemoryStore::new();
    let id = store
        .create_screen("Landing", "<html><head></head><body><p>x</p></body></html>")
        .unwrap();
    let mut h = open("<p>unused</p>");
    h.session.open_from_store(&store, &id).unwrap();
    let p = find(&h.session, "p");
    let _ = h.session.select(Some(p));
    assert!(h.session.set_style("margin", "4px"));

    let version = h
        .session
        .save_version(&mut store, VersionMeta::described("Tweak margin"))
        .unwrap();
    assert_eq!(version.number, 2);
    let versions = store.list_versions(&id).unwrap();
    assert_eq!(versions.len(), 2);
    assert!(versions[1].html.contains(r#"<p style="margin: 4px;">x</p>"#));
    assert_eq!(versions[1].description.as_deref(), Some("Tweak margin"));
}

#[test]
fn test_save_commits_pending_debounced_edit_first() {
    let mut store = MemoryStore::new();
    let id = store
        .create_screen("S", "<html><head></head><body><p>x</p></body></html>")
        .unwrap();
    let mut h = open("");
    h.session.open_from_store(&store, &id).unwrap();
    let p = find(&h.session, "p");
    let _ = h.session.select(Some(p));
    assert!(h.session.begin_text_edit());
    let _ = h.session.input("typed");

    let version = h.session.save_version(&mut store, VersionMeta::default()).unwrap();
    assert!(version.html.contains("<p>typed</p>"));
    assert_eq!(h.sink.commits()[0].reason, CommitReason::Debounce);
}

#[test]
fn test_save_without_screen_is_an_error() {
    let mut h = open("<p>x</p>");
    let mut store = MemoryStore::new();
    assert!(matches!(
        h.session.save_version(&mut store, VersionMeta::default()),
        Err(EditorError::NoScreen)
    ));
}

/// A backend that refuses every write.
struct ReadOnlyStore(MemoryStore);

impl ScreenStore for ReadOnlyStore {
    fn create_screen(&mut self, name: &str, html: &str) -> Result<String, StoreError> {
        self.0.create_screen(name, html)
    }
    fn load_screen(&self, id: &str) -> Result<voxel_editor::store::LoadedScreen, StoreError> {
        self.0.load_screen(id)
    }
    fn list_screens(&self) -> Result<Vec<voxel_editor::store::ScreenSummary>, StoreError> {
        self.0.list_screens()
    }
    fn delete_screen(&mut self, id: &str) -> Result<(), StoreError> {
        self.0.delete_screen(id)
    }
    fn save_version(&mut self, _: &str, _: &str, _: VersionMeta) -> Result<Version, StoreError> {
        Err(StoreError::Rejected("read-only replica".to_string()))
    }
    fn list_versions(&self, id: &str) -> Result<Vec<Version>, StoreError> {
        self.0.list_versions(id)
    }
}

#[test]
fn test_failed_save_keeps_local_edits() {
    let mut store = ReadOnlyStore(MemoryStore::new());
    let id = store
        .create_screen("S", "<html><head></head><body><p>x</p></body></html>")
        .unwrap();
    let mut h = open("");
    h.session.open_from_store(&store, &id).unwrap();
    let p = find(&h.session, "p");
    let _ = h.session.select(Some(p));
    assert!(h.session.set_attribute("class", "kept"));
    let before = h.session.document().raw.clone();

    let err = h
        .session
        .save_version(&mut store, VersionMeta::default())
        .unwrap_err();
    assert!(matches!(err, EditorError::Persistence(StoreError::Rejected(_))));
    assert!(err.to_string().contains("read-only replica"));
    assert_eq!(h.session.document().raw, before);
    assert!(before.contains(r#"class="kept""#));
    let notices = h.session.take_notices();
    assert_eq!(notices.last().unwrap().level, NoticeLevel::Error);
    assert_eq!(store.list_versions(&id).unwrap().len(), 1);
}

#[test]
fn test_open_missing_screen_is_not_found() {
    let store = MemoryStore::new();
    let mut h = open("<p>x</p>");
    assert!(matches!(
        h.session.open_from_store(&store, "nope"),
        Err(EditorError::Persistence(StoreError::NotFound(_)))
    ));
}
