//! Tests for the selection and hover markers.

use voxel_dom::NodeId;
use voxel_editor::{Document, EditorConfig, LiveTree, SelectionTracker};

const SELECTED: &str = "data-voxel-selected";
const HOVER: &str = "data-voxel-hover";

fn setup(html: &str) -> (LiveTree, SelectionTracker) {
    let config = EditorConfig::default();
    let live = LiveTree::render(&Document::load(html), &config);
    let tracker = SelectionTracker::new(
        &config.selection_attribute,
        &config.hover_attribute,
        &config.path_separator,
    );
    (live, tracker)
}

fn find(live: &LiveTree, tag: &str) -> NodeId {
    live.tree().find_element(live.tree().root(), tag).unwrap()
}

fn holders(live: &LiveTree, attribute: &str) -> Vec<NodeId> {
    live.tree().elements_with_attribute(attribute)
}

#[test]
fn test_select_marks_one_element() {
    let (mut live, mut tracker) = setup("<body><h1>a</h1><p>b</p></body>");
    let h1 = find(&live, "h1");
    assert_eq!(tracker.select(&mut live, Some(h1)), Some(h1));
    assert_eq!(holders(&live, SELECTED), [h1]);
    assert_eq!(live.tree().as_element(h1).unwrap().attrs.get(SELECTED), Some("true"));
}

#[test]
fn test_new_selection_clears_previous_holder() {
    let (mut live, mut tracker) = setup("<body><h1>a</h1><p>b</p></body>");
    let h1 = find(&live, "h1");
    let p = find(&live, "p");
    let _ = tracker.select(&mut live, Some(h1));
    let _ = tracker.select(&mut live, Some(p));
    assert_eq!(holders(&live, SELECTED), [p]);
    assert_eq!(tracker.selected(), Some(p));
}

#[test]
fn test_single_holder_invariant_over_sequences() {
    let (mut live, mut tracker) =
        setup("<body><div><h1>a</h1><p>b <em>c</em></p></div><ul><li>d</li></ul></body>");
    let targets: Vec<NodeId> = ["h1", "p", "em", "li", "div", "ul"]
        .iter()
        .map(|t| find(&live, t))
        .collect();
    for (i, &target) in targets.iter().enumerate() {
        let _ = tracker.select(&mut live, Some(target));
        let _ = tracker.hover(&mut live, Some(targets[(i + 2) % targets.len()]));
        assert!(holders(&live, SELECTED).len() <= 1);
        assert!(holders(&live, HOVER).len() <= 1);
        if i % 3 == 2 {
            let _ = tracker.select(&mut live, None);
            assert!(holders(&live, SELECTED).is_empty());
        }
    }
}

#[test]
fn test_hover_and_selection_can_share_an_element() {
    let (mut live, mut tracker) = setup("<body><p>x</p></body>");
    let p = find(&live, "p");
    let _ = tracker.select(&mut live, Some(p));
    let _ = tracker.hover(&mut live, Some(p));
    let attrs = &live.tree().as_element(p).unwrap().attrs;
    assert!(attrs.contains(SELECTED));
    assert!(attrs.contains(HOVER));
}

#[test]
fn test_root_container_selects_nothing() {
    let (mut live, mut tracker) = setup("<body><p>x</p></body>");
    let p = find(&live, "p");
    let body = live.tree().body().unwrap();
    let _ = tracker.select(&mut live, Some(p));
    assert_eq!(tracker.select(&mut live, Some(body)), None);
    assert!(holders(&live, SELECTED).is_empty());
    assert_eq!(tracker.path(), "");
}

#[test]
fn test_stray_marker_is_cleared() {
    let (mut live, mut tracker) =
        setup(r#"<body><p data-voxel-selected="true">x</p><h2>y</h2></body>"#);
    let h2 = find(&live, "h2");
    let _ = tracker.select(&mut live, Some(h2));
    assert_eq!(holders(&live, SELECTED), [h2]);
}

#[test]
fn test_path_uses_id_then_first_class() {
    let (mut live, mut tracker) = setup(
        r#"<body><div id="main" class="wrap"><section><p class="lead intro">x</p></section></div></body>"#,
    );
    let p = find(&live, "p");
    let _ = tracker.select(&mut live, Some(p));
    assert_eq!(tracker.path(), "html > body > div#main > section > p.lead");
}

#[test]
fn test_forget_detached_drops_removed_holder() {
    let (mut live, mut tracker) = setup("<body><p>x</p></body>");
    let p = find(&live, "p");
    let _ = tracker.select(&mut live, Some(p));
    let _ = voxel_editor::mutation::delete(&mut live, p);
    tracker.forget_detached(&live);
    assert_eq!(tracker.selected(), None);
    assert_eq!(tracker.path(), "");
}
