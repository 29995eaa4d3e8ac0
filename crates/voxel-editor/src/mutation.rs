//! Structural and attribute mutations of the live tree.
//!
//! Each function checks its own precondition and returns whether the tree
//! changed. A failed precondition is a silent no-op; committing the result
//! is the session's job.

use voxel_dom::{ElementData, NodeId, NodeType};
use voxel_html::{HtmlSerializer, parse_fragment};

use crate::live_tree::LiveTree;
use crate::properties::set_inline_declaration;

/// Remove `id` and its subtree from the document.
pub fn delete(live: &mut LiveTree, id: NodeId) -> bool {
    if !live.is_selectable(id) {
        return false;
    }
    live.tree_mut().detach(id);
    tracing::debug!(node = id.0, "deleted element");
    true
}

/// Deep-clone `id` and insert the copy right after it.
///
/// `strip` names attributes removed from every element of the copy (the
/// selection and hover markers). The editor's editable flag never travels
/// with the copy. Returns the copy.
pub fn duplicate(live: &mut LiveTree, id: NodeId, strip: &[&str]) -> Option<NodeId> {
    if !live.is_selectable(id) {
        return None;
    }
    let editing = live.editable();
    live.clear_editable();

    let tree = live.tree_mut();
    let copy = tree.deep_clone(id);
    let nodes: Vec<NodeId> = tree.descendants(copy).collect();
    for node in nodes {
        if let Some(element) = tree.as_element_mut(node) {
            for name in strip {
                let _ = element.attrs.remove(name);
            }
        }
    }
    tree.insert_after(id, copy);

    if let Some(editing) = editing {
        live.set_editable(editing);
    }
    tracing::debug!(original = id.0, copy = copy.0, "duplicated element");
    Some(copy)
}

/// Point an `<img>` at a new source. Anything else is left alone.
pub fn replace_image_src(live: &mut LiveTree, id: NodeId, url: &str) -> bool {
    if !live.is_selectable(id) || !live.tree().is_element_named(id, "img") {
        return false;
    }
    match live.tree_mut().as_element_mut(id) {
        Some(element) => {
            let _ = element.attrs.set("src", url);
            true
        }
        None => false,
    }
}

/// Set one inline style property; an empty `value` removes it.
pub fn set_style_property(live: &mut LiveTree, id: NodeId, property: &str, value: &str) -> bool {
    if !live.is_selectable(id) || property.trim().is_empty() {
        return false;
    }
    let Some(element) = live.tree_mut().as_element_mut(id) else {
        return false;
    };
    let style = set_inline_declaration(element.attrs.get("style").unwrap_or(""), property, value);
    let _ = if style.is_empty() {
        element.attrs.remove("style")
    } else {
        element.attrs.set("style", &style)
    };
    true
}

/// Set one attribute. Names that are not valid attribute names, and the
/// names in `reserved`, are refused.
pub fn set_attribute(
    live: &mut LiveTree,
    id: NodeId,
    name: &str,
    value: &str,
    reserved: &[&str],
) -> bool {
    let name = name.trim().to_ascii_lowercase();
    if !live.is_selectable(id) || !is_valid_attribute_name(&name) || reserved.contains(&name.as_str()) {
        return false;
    }
    match live.tree_mut().as_element_mut(id) {
        Some(element) => {
            let _ = element.attrs.set(&name, value);
            true
        }
        None => false,
    }
}

/// Replace the children of `id` with `markup` parsed in body context.
///
/// This is the editable element's inner markup after a keystroke, so inline
/// and nested elements survive the edit. Returns `false` when the parsed
/// markup serializes the same as the current children.
pub fn set_inner_html(live: &mut LiveTree, id: NodeId, markup: &str) -> bool {
    if !live.is_selectable(id) {
        return false;
    }
    let (fragment, container) = parse_fragment(markup);
    if HtmlSerializer::new(&fragment).inner_html(container)
        == HtmlSerializer::new(live.tree()).inner_html(id)
    {
        return false;
    }
    let tree = live.tree_mut();
    let imported = tree.import(&fragment, container);
    tree.set_text_content(id, "");
    tree.move_children(imported, id);
    true
}

/// Parse `markup` in body context and append it to the end of `<body>`.
///
/// With a `wrapper` `(attribute, value)` the nodes go into a new `<div>`
/// carrying that attribute. Returns the wrapper, or the first inserted node.
pub fn insert_fragment(
    live: &mut LiveTree,
    markup: &str,
    wrapper: Option<(&str, &str)>,
) -> Option<NodeId> {
    let body = live.root_container()?;
    let (fragment, container) = parse_fragment(markup);
    let tree = live.tree_mut();

    let parent = match wrapper {
        Some((attribute, value)) => {
            let mut div = ElementData::new("div");
            let _ = div.attrs.set(attribute, value);
            let div = tree.alloc(NodeType::Element(div));
            tree.append_child(body, div);
            div
        }
        None => body,
    };

    let mut first = None;
    for &child in fragment.children(container) {
        let imported = tree.import(&fragment, child);
        tree.append_child(parent, imported);
        let _ = first.get_or_insert(imported);
    }

    if parent == body {
        first
    } else {
        Some(parent)
    }
}

/// [§ 13.1.2.3 Attributes](https://html.spec.whatwg.org/multipage/syntax.html#attributes-2)
///
/// "Attribute names must consist of one or more characters other than
/// controls, U+0020 SPACE, U+0022 ("), U+0027 ('), U+003E (>), U+002F (/),
/// U+003D (=), and noncharacters."
#[must_use]
pub fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| !c.is_control() && !matches!(c, ' ' | '"' | '\'' | '>' | '/' | '=' | '<'))
}
