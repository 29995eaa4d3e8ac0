//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
//!
//! Turns a [`DomTree`] back into markup. Callers can hide nodes and
//! attributes from the output with filters, which is how editor-only
//! scaffolding is kept out of persisted documents.

use std::fmt::Write;

use voxel_dom::{DomTree, NodeId, NodeType};

type NodeFilter<'a> = Box<dyn Fn(&DomTree, NodeId) -> bool + 'a>;
type AttributeFilter<'a> = Box<dyn Fn(NodeId, &str, &str) -> bool + 'a>;

/// Elements whose text children are emitted without escaping.
///
/// "If the parent of current node is a style, script, xmp, iframe, noembed,
/// noframes, or plaintext element ... then append the value of current
/// node's data IDL attribute literally."
const LITERAL_TEXT_PARENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Markup serializer over a borrowed tree.
pub struct HtmlSerializer<'a> {
    tree: &'a DomTree,
    skip_node: Option<NodeFilter<'a>>,
    skip_attribute: Option<AttributeFilter<'a>>,
}

impl<'a> HtmlSerializer<'a> {
    /// Serializer with no filters.
    #[must_use]
    pub const fn new(tree: &'a DomTree) -> Self {
        Self {
            tree,
            skip_node: None,
            skip_attribute: None,
        }
    }

    /// Omit every node (and its subtree) for which `filter` returns `true`.
    #[must_use]
    pub fn skip_nodes(mut self, filter: impl Fn(&DomTree, NodeId) -> bool + 'a) -> Self {
        self.skip_node = Some(Box::new(filter));
        self
    }

    /// Omit attributes for which `filter(element, name, value)` returns `true`.
    #[must_use]
    pub fn skip_attributes(mut self, filter: impl Fn(NodeId, &str, &str) -> bool + 'a) -> Self {
        self.skip_attribute = Some(Box::new(filter));
        self
    }

    /// Serialize the whole document: doctype, top-level comments and the
    /// document element.
    #[must_use]
    pub fn document(&self) -> String {
        self.inner_html(NodeId::ROOT)
    }

    /// "The inner HTML": the serialization of `id`'s children.
    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.serialize_children(id, &mut out);
        out
    }

    /// "The outer HTML": `id` itself followed by its children.
    #[must_use]
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.serialize_node(id, &mut out);
        out
    }

    fn is_skipped(&self, id: NodeId) -> bool {
        self.skip_node.as_ref().is_some_and(|f| f(self.tree, id))
    }

    fn serialize_children(&self, id: NodeId, out: &mut String) {
        for &child in self.tree.children(id) {
            self.serialize_node(child, out);
        }
    }

    /// "For each child node of the node, in tree order, run the following steps"
    fn serialize_node(&self, id: NodeId, out: &mut String) {
        if self.is_skipped(id) {
            return;
        }
        let Some(node) = self.tree.get(id) else {
            return;
        };
        match &node.node_type {
            NodeType::Document => self.serialize_children(id, out),
            // "If current node is a DocumentType node - Append the literal
            // string "<!DOCTYPE", followed by a space, followed by the value of
            // current node's name IDL attribute, followed by the literal string ">"."
            NodeType::DocumentType(name) => {
                let _ = write!(out, "<!DOCTYPE {name}>");
            }
            // "If current node is a Comment - Append the literal string "<!--",
            // followed by the value of current node's data IDL attribute,
            // followed by the literal string "-->"."
            NodeType::Comment(data) => {
                let _ = write!(out, "<!--{data}-->");
            }
            NodeType::Text(data) => {
                let literal = node
                    .parent
                    .and_then(|p| self.tree.as_element(p))
                    .is_some_and(|e| LITERAL_TEXT_PARENTS.contains(&e.tag_name.as_str()));
                if literal {
                    out.push_str(data);
                } else {
                    escape_text(data, out);
                }
            }
            NodeType::Element(element) => {
                // "append a U+003C LESS-THAN SIGN character (<), followed by
                // tagname."
                out.push('<');
                out.push_str(&element.tag_name);
                for (name, value) in element.attrs.iter() {
                    if self
                        .skip_attribute
                        .as_ref()
                        .is_some_and(|f| f(id, name, value))
                    {
                        continue;
                    }
                    // "a U+0020 SPACE character, the attribute's serialized name,
                    // a U+003D EQUALS SIGN character (=), a U+0022 QUOTATION MARK
                    // character ("), the attribute's value, escaped ..., and a
                    // second U+0022 QUOTATION MARK character (")."
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_attribute(value, out);
                    out.push('"');
                }
                out.push('>');

                // "If current node serializes as void, then continue on to the
                // next child node at this point."
                if element.is_void() {
                    return;
                }

                // "If current node is a pre, textarea, or listing element, and
                // the first child node of the element, if any, is a Text node
                // whose character data has as its first character a U+000A LINE
                // FEED (LF) character, then append a U+000A LINE FEED (LF)."
                if matches!(element.tag_name.as_str(), "pre" | "textarea" | "listing")
                    && self
                        .tree
                        .first_child(id)
                        .and_then(|c| self.tree.as_text(c))
                        .is_some_and(|t| t.starts_with('\n'))
                {
                    out.push('\n');
                }

                self.serialize_children(id, out);
                let _ = write!(out, "</{}>", element.tag_name);
            }
        }
    }
}

/// "Escaping a string ... in attribute mode": `&`, U+00A0 and `"`.
pub fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// "Escaping a string" outside attribute mode: `&`, U+00A0, `<` and `>`.
pub fn escape_text(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// Serialize an entire document with no filtering.
#[must_use]
pub fn serialize_document(tree: &DomTree) -> String {
    HtmlSerializer::new(tree).document()
}

/// Serialize a single node and its subtree.
#[must_use]
pub fn outer_html(tree: &DomTree, id: NodeId) -> String {
    HtmlSerializer::new(tree).outer_html(id)
}
