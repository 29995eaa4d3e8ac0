//! Property tests for the marker and strip invariants.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use voxel_dom::NodeId;
use voxel_editor::{Document, EditorConfig, LiveTree, SelectionTracker, strip_editor_styles};

const PAGE: &str = r#"<html><head><title>t</title></head><body>
<header id="top"><nav><a href="/">Home</a><a href="/about">About</a></nav></header>
<main><h1>Title</h1><p class="lead">Intro <b>bold</b></p><img src="a.png">
<ul><li>one</li><li>two</li><li>three</li></ul></main>
<footer><p>bye</p></footer>
</body></html>"#;

const STYLE_ID: &str = "voxel-editor-styles";

#[derive(Debug, Clone)]
enum Op {
    Select(usize),
    Hover(usize),
    Unselect,
    Unhover,
    Clear,
}

impl Arbitrary for Op {
    fn arbitrary(g: &mut Gen) -> Self {
        match u8::arbitrary(g) % 5 {
            0 => Self::Select(usize::arbitrary(g)),
            1 => Self::Hover(usize::arbitrary(g)),
            2 => Self::Unselect,
            3 => Self::Unhover,
            _ => Self::Clear,
        }
    }
}

fn holders(live: &LiveTree, attribute: &str) -> usize {
    let tree = live.tree();
    tree.iter_all()
        .filter(|&id| {
            tree.as_element(id)
                .is_some_and(|e| e.attrs.get(attribute).is_some())
        })
        .count()
}

#[quickcheck]
fn prop_at_most_one_marker_holder(ops: Vec<Op>) -> bool {
    let config = EditorConfig::default();
    let mut live = LiveTree::render(&Document::load(PAGE), &config);
    let mut tracker = SelectionTracker::new(
        &config.selection_attribute,
        &config.hover_attribute,
        &config.path_separator,
    );
    // Every node, including the document and root containers.
    let nodes: Vec<NodeId> = live.tree().iter_all().collect();

    ops.into_iter().all(|op| {
        match op {
            Op::Select(i) => {
                let _ = tracker.select(&mut live, Some(nodes[i % nodes.len()]));
            }
            Op::Hover(i) => {
                let _ = tracker.hover(&mut live, Some(nodes[i % nodes.len()]));
            }
            Op::Unselect => {
                let _ = tracker.select(&mut live, None);
            }
            Op::Unhover => {
                let _ = tracker.hover(&mut live, None);
            }
            Op::Clear => tracker.clear(&mut live),
        }
        let selected = holders(&live, &config.selection_attribute);
        let hovered = holders(&live, &config.hover_attribute);
        selected <= 1
            && hovered <= 1
            && (selected == 1) == tracker.selected().is_some()
            && (hovered == 1) == tracker.hovered().is_some()
    })
}

#[quickcheck]
fn prop_strip_is_idempotent(markup: String) -> bool {
    let once = strip_editor_styles(&markup, STYLE_ID);
    strip_editor_styles(&once, STYLE_ID) == once
}

#[quickcheck]
fn prop_strip_removes_block_with_any_content(before: String, inner: String, after: String) -> bool {
    // Content that itself closes the element is a different document.
    if inner.to_ascii_lowercase().contains("</style") {
        return true;
    }
    let before = before.replace('<', "");
    let after = after.replace('<', "");
    let markup = format!(r#"{before}<style id="{STYLE_ID}">{inner}</style>{after}"#);
    strip_editor_styles(&markup, STYLE_ID) == format!("{before}{after}")
}

#[quickcheck]
fn prop_serialize_is_stable(texts: Vec<String>) -> bool {
    let body: String = texts
        .iter()
        .map(|t| {
            let mut escaped = String::new();
            voxel_html::serializer::escape_text(&t.replace(['\0', '\r'], ""), &mut escaped);
            format!("<p>{escaped}</p>")
        })
        .collect();
    let config = EditorConfig::default();
    let first = LiveTree::render(
        &Document::load(format!("<html><head></head><body>{body}</body></html>")),
        &config,
    )
    .serialize();
    let second = LiveTree::render(&Document::load(first.clone()), &config).serialize();
    first == second && !first.contains(STYLE_ID)
}
