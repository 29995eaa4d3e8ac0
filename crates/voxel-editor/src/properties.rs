//! Read-only property snapshots of a selected element.
//!
//! There is no layout engine behind the editor, so the "computed" style
//! subset is resolved from what the markup itself says: the element's inline
//! `style` declarations, inherited properties from ancestors' inline styles,
//! then user-agent defaults.
//!
//! [CSS Cascade 4 § 7 Defaulting](https://www.w3.org/TR/css-cascade-4/#defaulting)

use serde::Serialize;
use voxel_dom::{DomTree, NodeId};

use crate::color;
use crate::live_tree::LiveTree;

/// Elements whose content is primarily text the user can edit in place.
const TEXT_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "span", "a", "button", "label", "li", "td", "th",
    "strong", "em", "b", "i", "u", "small", "blockquote", "figcaption", "caption", "dt", "dd",
    "pre", "code", "cite", "q", "mark", "summary", "legend", "option", "title",
];

/// The style subset shown in the property panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StyleSnapshot {
    /// `font-size`
    pub font_size: String,
    /// `font-weight`
    pub font_weight: String,
    /// `font-style`
    pub font_style: String,
    /// `color`, in computed `rgb()` form when recognised
    pub color: String,
    /// `color` for a hex color control; see [`color::to_hex`]
    pub color_hex: String,
    /// `text-align`
    pub text_align: String,
    /// `background-color`, in computed form when recognised
    pub background_color: String,
    /// `background-color` for a hex color control
    pub background_color_hex: String,
    /// `padding`
    pub padding: String,
    /// `margin`
    pub margin: String,
    /// `border-radius`
    pub border_radius: String,
}

/// Snapshot of an element, keyed by the kind of editing it supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementProperties {
    /// Text-bearing element.
    Text {
        /// Tag name.
        tag: String,
        /// Descendant text content.
        text: String,
        /// Resolved style subset.
        style: StyleSnapshot,
    },
    /// `<img>`.
    Image {
        /// `src` attribute.
        src: String,
        /// `alt` attribute.
        alt: String,
        /// Width from the attribute or inline style.
        width: Option<String>,
        /// Height from the attribute or inline style.
        height: Option<String>,
        /// Resolved style subset.
        style: StyleSnapshot,
    },
    /// `<a>`.
    Link {
        /// `href` attribute.
        href: String,
        /// `target` attribute.
        target: Option<String>,
        /// Descendant text content.
        text: String,
        /// Resolved style subset.
        style: StyleSnapshot,
    },
    /// Anything else.
    Generic {
        /// Tag name.
        tag: String,
        /// Resolved style subset.
        style: StyleSnapshot,
    },
}

impl ElementProperties {
    /// Snapshot the element `id`. `None` if `id` is not an element.
    #[must_use]
    pub fn of(live: &LiveTree, id: NodeId) -> Option<Self> {
        let tree = live.tree();
        let element = tree.as_element(id)?;
        let style = resolve_style(tree, id);
        let attr = |name: &str| element.attrs.get(name).map(str::to_string);
        let inline = |name: &str| inline_declaration(element.attrs.get("style").unwrap_or(""), name);

        Some(match element.tag_name.as_str() {
            "img" => Self::Image {
                src: attr("src").unwrap_or_default(),
                alt: attr("alt").unwrap_or_default(),
                width: attr("width").or_else(|| inline("width")),
                height: attr("height").or_else(|| inline("height")),
                style,
            },
            "a" => Self::Link {
                href: attr("href").unwrap_or_default(),
                target: attr("target"),
                text: tree.text_content(id),
                style,
            },
            tag if is_text_bearing(tree, id) => Self::Text {
                tag: tag.to_string(),
                text: tree.text_content(id),
                style,
            },
            tag => Self::Generic {
                tag: tag.to_string(),
                style,
            },
        })
    }

    /// The style subset of any variant.
    #[must_use]
    pub const fn style(&self) -> &StyleSnapshot {
        match self {
            Self::Text { style, .. }
            | Self::Image { style, .. }
            | Self::Link { style, .. }
            | Self::Generic { style, .. } => style,
        }
    }
}

/// Whether `id` holds text the user can edit in place: a known text element,
/// or any element whose only children are non-blank text.
#[must_use]
pub fn is_text_bearing(tree: &DomTree, id: NodeId) -> bool {
    let Some(element) = tree.as_element(id) else {
        return false;
    };
    if TEXT_TAGS.contains(&element.tag_name.as_str()) {
        return true;
    }
    let children = tree.children(id);
    !children.is_empty()
        && children.iter().all(|&c| tree.as_text(c).is_some())
        && !tree.text_content(id).trim().is_empty()
}

/// Split a `style` attribute into `(property, value)` pairs, in order.
///
/// Property names are lowercased. Declarations without a colon are dropped.
#[must_use]
pub fn parse_inline_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            (!name.is_empty() && !value.is_empty()).then(|| (name, value.to_string()))
        })
        .collect()
}

/// Rewrite a `style` attribute with one property set, or removed if `value`
/// is empty. Other declarations keep their order.
#[must_use]
pub fn set_inline_declaration(style: &str, property: &str, value: &str) -> String {
    let property = property.trim().to_ascii_lowercase();
    let value = value.trim();
    let mut declarations = parse_inline_style(style);
    match declarations.iter().position(|(name, _)| *name == property) {
        Some(index) if value.is_empty() => {
            let _ = declarations.remove(index);
        }
        Some(index) => declarations[index].1 = value.to_string(),
        None if value.is_empty() => {}
        None => declarations.push((property, value.to_string())),
    }
    declarations
        .iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn inline_declaration(style: &str, property: &str) -> Option<String> {
    parse_inline_style(style)
        .into_iter()
        .rev()
        .find(|(name, _)| name == property)
        .map(|(_, value)| value)
}

fn own_declaration(tree: &DomTree, id: NodeId, property: &str) -> Option<String> {
    let style = tree.as_element(id)?.attrs.get("style")?;
    inline_declaration(style, property)
}

/// Inherited properties: walk up from `id`, taking the first inline value
/// or tag default found.
fn inherited(tree: &DomTree, id: NodeId, property: &str) -> Option<String> {
    std::iter::once(id)
        .chain(tree.ancestors(id))
        .filter(|&n| tree.as_element(n).is_some())
        .find_map(|n| {
            own_declaration(tree, n, property).or_else(|| {
                let tag = &tree.as_element(n)?.tag_name;
                user_agent_inherited(tag, property)
            })
        })
}

fn user_agent_inherited(tag: &str, property: &str) -> Option<String> {
    let value = match (property, tag) {
        ("font-size", "h1") => "32px",
        ("font-size", "h2") => "24px",
        ("font-size", "h3") => "18.72px",
        ("font-size", "h4") => "16px",
        ("font-size", "h5") => "13.28px",
        ("font-size", "h6") => "10.72px",
        ("font-weight", "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "b" | "strong" | "th") => "700",
        ("font-style", "em" | "i" | "cite" | "var" | "address" | "dfn") => "italic",
        ("color", "a") => "rgb(0, 0, 238)",
        ("text-align", "th") => "center",
        _ => return None,
    };
    Some(value.to_string())
}

fn user_agent_own(tag: &str, property: &str) -> &'static str {
    match (property, tag) {
        ("margin", "body") => "8px",
        ("background-color", _) => "rgba(0, 0, 0, 0)",
        _ => "0px",
    }
}

fn resolve_style(tree: &DomTree, id: NodeId) -> StyleSnapshot {
    let inherit = |property: &str, initial: &str| {
        inherited(tree, id, property).unwrap_or_else(|| initial.to_string())
    };
    let own = |property: &str| {
        let tag = tree.as_element(id).map_or("", |e| e.tag_name.as_str());
        own_declaration(tree, id, property)
            .unwrap_or_else(|| user_agent_own(tag, property).to_string())
    };
    let foreground = color::to_computed(&inherit("color", "rgb(0, 0, 0)"));
    let background = color::to_computed(&own("background-color"));
    StyleSnapshot {
        font_size: inherit("font-size", "16px"),
        font_weight: normalize_weight(&inherit("font-weight", "400")),
        font_style: inherit("font-style", "normal"),
        color_hex: color::to_hex(&foreground),
        color: foreground,
        text_align: inherit("text-align", "start"),
        background_color_hex: color::to_hex(&background),
        background_color: background,
        padding: own("padding"),
        margin: own("margin"),
        border_radius: own("border-radius"),
    }
}

/// [CSS Fonts 4 § 2.2](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
/// "normal: Same as 400. bold: Same as 700."
fn normalize_weight(weight: &str) -> String {
    match weight.to_ascii_lowercase().as_str() {
        "normal" => "400".to_string(),
        "bold" => "700".to_string(),
        _ => weight.to_string(),
    }
}
