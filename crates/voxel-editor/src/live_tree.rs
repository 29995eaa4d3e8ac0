//! The mutable, rendered representation of a [`Document`].
//!
//! A `LiveTree` plays the part of an isolated frame: the document is parsed
//! into its own arena, the editor's style block is injected into `<head>`,
//! and interaction state lives on the tree as marker attributes. Rendering a
//! new document always builds a fresh tree; interactive edits mutate it in
//! place.

use voxel_dom::{DomTree, ElementData, NodeId, NodeType};
use voxel_html::{HtmlSerializer, parse_document, serialize_document};

use crate::config::EditorConfig;
use crate::document::Document;
use crate::scaffold::strip_editor_styles;

/// Attribute the editor sets on the element being text-edited.
pub const EDITABLE_ATTRIBUTE: &str = "contenteditable";

/// A parsed, decorated document owned by one editor session.
#[derive(Debug, Clone)]
pub struct LiveTree {
    tree: DomTree,
    style_id: String,
    selection_attribute: String,
    hover_attribute: String,
    /// Element the editor made editable, with the authored value it replaced.
    editable: Option<(NodeId, Option<String>)>,
}

impl LiveTree {
    /// Parse `document` and inject the editor style block.
    ///
    /// Any element already carrying the reserved style id (a block saved by
    /// accident, or a leftover from a previous render) is removed first, so
    /// exactly one block exists afterwards.
    #[must_use]
    pub fn render(document: &Document, config: &EditorConfig) -> Self {
        let mut tree = parse_document(&document.raw);

        let stale: Vec<NodeId> = tree
            .iter_all()
            .filter(|&id| tree.as_element(id).and_then(ElementData::id) == Some(config.style_id.as_str()))
            .collect();
        for id in stale {
            tree.detach(id);
        }

        let head = match tree.head() {
            Some(head) => head,
            None => {
                let head = tree.alloc(NodeType::Element(ElementData::new("head")));
                let html = tree.document_element().unwrap_or(NodeId::ROOT);
                match tree.first_child(html) {
                    Some(first) => tree.insert_before(html, head, first),
                    None => tree.append_child(html, head),
                }
                head
            }
        };

        let mut style = ElementData::new("style");
        let _ = style.attrs.set("id", &config.style_id);
        let style = tree.alloc(NodeType::Element(style));
        let css = tree.alloc(NodeType::Text(editor_css(config)));
        tree.append_child(style, css);
        tree.append_child(head, style);

        tracing::debug!(nodes = tree.len(), "rendered live tree");

        Self {
            tree,
            style_id: config.style_id.clone(),
            selection_attribute: config.selection_attribute.clone(),
            hover_attribute: config.hover_attribute.clone(),
            editable: None,
        }
    }

    /// Read access to the underlying tree.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub(crate) const fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Full markup as the frame shows it, scaffolding included.
    #[must_use]
    pub fn markup(&self) -> String {
        serialize_document(&self.tree)
    }

    /// Canonical markup: the tree with every editor artifact removed.
    ///
    /// Marker attributes, the injected editable flag and the style block are
    /// skipped during serialization, and the result is passed through
    /// [`strip_editor_styles`] as a final textual guard.
    #[must_use]
    pub fn serialize(&self) -> String {
        let restored;
        let tree = match &self.editable {
            Some((id, Some(authored))) => {
                let mut copy = self.tree.clone();
                if let Some(element) = copy.as_element_mut(*id) {
                    let _ = element.attrs.set(EDITABLE_ATTRIBUTE, authored);
                }
                restored = copy;
                &restored
            }
            _ => &self.tree,
        };
        let injected_editable = match self.editable {
            Some((id, None)) => Some(id),
            _ => None,
        };

        let style_id = self.style_id.as_str();
        let markup = HtmlSerializer::new(tree)
            .skip_nodes(move |tree, id| {
                tree.as_element(id)
                    .is_some_and(|e| e.tag_name == "style" && e.id() == Some(style_id))
            })
            .skip_attributes(|id, name, _| {
                name == self.selection_attribute
                    || name == self.hover_attribute
                    || (name == EDITABLE_ATTRIBUTE && Some(id) == injected_editable)
            })
            .document();
        strip_editor_styles(&markup, &self.style_id)
    }

    /// The body element: the container clicks on "nothing" land on.
    #[must_use]
    pub fn root_container(&self) -> Option<NodeId> {
        self.tree.body()
    }

    /// Whether `id` is the document, `<html>` or `<body>`.
    #[must_use]
    pub fn is_root_container(&self, id: NodeId) -> bool {
        id == NodeId::ROOT
            || Some(id) == self.tree.document_element()
            || Some(id) == self.tree.body()
    }

    /// Whether `id` is still attached to the document.
    #[must_use]
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.tree.is_connected(id)
    }

    /// Whether `id` is an authored element the user can act on.
    #[must_use]
    pub fn is_selectable(&self, id: NodeId) -> bool {
        self.tree.as_element(id).is_some()
            && !self.is_root_container(id)
            && self
                .root_container()
                .is_some_and(|body| self.tree.is_descendant_of(id, body))
    }

    /// Make `id` directly editable, remembering any authored flag.
    pub fn set_editable(&mut self, id: NodeId) {
        self.clear_editable();
        if let Some(element) = self.tree.as_element_mut(id) {
            let authored = element.attrs.set(EDITABLE_ATTRIBUTE, "true");
            self.editable = Some((id, authored));
        }
    }

    /// Remove the editable flag, restoring an authored value if there was one.
    pub fn clear_editable(&mut self) {
        let Some((id, authored)) = self.editable.take() else {
            return;
        };
        if let Some(element) = self.tree.as_element_mut(id) {
            let _ = match authored {
                Some(value) => element.attrs.set(EDITABLE_ATTRIBUTE, &value),
                None => element.attrs.remove(EDITABLE_ATTRIBUTE),
            };
        }
    }

    /// The element currently made editable by the editor.
    #[must_use]
    pub fn editable(&self) -> Option<NodeId> {
        self.editable.as_ref().map(|(id, _)| *id)
    }

    /// Number of connected elements.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.tree
            .iter_all()
            .filter(|&id| self.tree.as_element(id).is_some())
            .count()
    }

    /// The reserved id of the injected style block.
    #[must_use]
    pub fn style_id(&self) -> &str {
        &self.style_id
    }
}

/// Interaction affordances. Selection outranks hover.
fn editor_css(config: &EditorConfig) -> String {
    let hover = &config.hover_attribute;
    let selected = &config.selection_attribute;
    let inserted = &config.inserted_attribute;
    format!(
        "[{hover}=\"true\"] {{ outline: 2px dashed rgba(59, 130, 246, 0.6); outline-offset: 2px; cursor: pointer; }}\n\
         [{selected}=\"true\"] {{ outline: 2px solid #3b82f6 !important; outline-offset: 2px; }}\n\
         [{selected}=\"true\"][{hover}=\"true\"] {{ outline: 2px solid #3b82f6 !important; }}\n\
         [{EDITABLE_ATTRIBUTE}=\"true\"] {{ outline: 2px solid #10b981 !important; cursor: text; }}\n\
         [{inserted}] {{ scroll-margin-top: 16px; }}\n"
    )
}
