use strum_macros::Display;

use voxel_common::notice::warn_once;
use voxel_dom::{Attributes, DomTree, ElementData, NodeId, NodeType};

use super::foreign_content::{adjust_svg_attribute_name, adjust_svg_tag_name};
use crate::tokenizer::{Attribute, Token};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
///
/// Table, select, template and frameset modes are not implemented; their
/// elements are built with the "in body" rules plus a few implied closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
}

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// "The handling of parse errors is well-defined." Nothing here aborts the
/// parse; issues are only collected so callers can show them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Human-readable description.
    pub message: String,
    /// Index into the token stream where this issue was encountered.
    pub token_index: usize,
    /// `true` for a parse error in the content, `false` for a construct
    /// this builder only approximates.
    pub is_error: bool,
}

/// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
const IMPLIED_END_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
/// default scope markers (MathML/SVG integration points omitted).
const DEFAULT_SCOPE: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template",
];

/// Start tags that close an open `p` element and are then inserted normally.
const CLOSES_P: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div",
    "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "main", "menu", "nav",
    "ol", "p", "search", "section", "summary", "ul", "table", "form", "hr", "xmp", "plaintext",
];

/// End tags closed with "generate implied end tags, then pop until".
const BLOCK_END_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "button", "center", "details", "dialog", "dir",
    "div", "dl", "fieldset", "figcaption", "figure", "footer", "form", "header", "hgroup",
    "listing", "main", "menu", "nav", "ol", "pre", "search", "section", "summary", "ul",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Start tags handled "using the rules for the in head insertion mode".
const HEAD_CONTENT: &[&str] = &[
    "base", "basefont", "bgsound", "link", "meta", "noframes", "script", "style", "template",
    "title",
];

/// Elements whose content the tokenizer delivers as raw text.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "title", "textarea", "style", "script", "xmp", "iframe", "noembed", "noframes",
];

/// [§ 13.2.4.2 Special](https://html.spec.whatwg.org/multipage/parsing.html#special)
///
/// Abridged to the HTML namespace entries that matter for end-tag recovery.
fn is_special_element(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "address" | "applet" | "area" | "article" | "aside" | "base" | "basefont" | "bgsound"
            | "blockquote" | "body" | "br" | "button" | "caption" | "center" | "col"
            | "colgroup" | "dd" | "details" | "dir" | "div" | "dl" | "dt" | "embed"
            | "fieldset" | "figcaption" | "figure" | "footer" | "form" | "frame" | "frameset"
            | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "head" | "header" | "hgroup" | "hr"
            | "html" | "iframe" | "img" | "input" | "keygen" | "li" | "link" | "listing"
            | "main" | "marquee" | "menu" | "meta" | "nav" | "noembed" | "noframes"
            | "noscript" | "object" | "ol" | "p" | "param" | "plaintext" | "pre" | "script"
            | "search" | "section" | "select" | "source" | "style" | "summary" | "table"
            | "tbody" | "td" | "template" | "textarea" | "tfoot" | "th" | "thead" | "title"
            | "tr" | "track" | "ul" | "wbr" | "xmp"
    )
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// Builds a [`DomTree`] from a token stream. Lenient by construction: every
/// token sequence yields a tree, mis-nested or unknown markup is recovered
/// from, and nothing panics.
pub struct HTMLParser {
    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    insertion_mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    original_insertion_mode: Option<InsertionMode>,

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    stack_of_open_elements: Vec<NodeId>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    head_element_pointer: Option<NodeId>,

    /// `NodeId::ROOT` (index 0) is the Document node.
    tree: DomTree,

    tokens: Vec<Token>,
    token_index: usize,
    stopped: bool,
    issues: Vec<ParseIssue>,

    /// "If the next token is a U+000A LINE FEED (LF) character token, then
    /// ignore that token and move on to the next one." (pre, listing, textarea)
    ignore_next_line_feed: bool,

    /// Set when parsing with the [fragment parsing algorithm](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments).
    fragment: bool,
}

impl HTMLParser {
    /// Create a parser that builds a full document.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            stack_of_open_elements: Vec::new(),
            head_element_pointer: None,
            tree: DomTree::new(),
            tokens,
            token_index: 0,
            stopped: false,
            issues: Vec::new(),
            ignore_next_line_feed: false,
            fragment: false,
        }
    }

    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// Parse in the context of a `<body>` element. "Let root be a new html
    /// element with no attributes. Append the element root to the Document
    /// node created above. Set up the parser's stack of open elements so that
    /// it contains just the single element root."
    ///
    /// The parsed nodes end up as children of that root, which
    /// [`DomTree::document_element`] returns.
    #[must_use]
    pub fn new_fragment(tokens: Vec<Token>) -> Self {
        let mut parser = Self::new(tokens);
        let root = parser.tree.alloc(NodeType::Element(ElementData::new("html")));
        parser.tree.append_child(NodeId::ROOT, root);
        parser.stack_of_open_elements.push(root);
        // "Reset the parser's insertion mode appropriately." For a body
        // context that is "in body".
        parser.insertion_mode = InsertionMode::InBody;
        parser.fragment = true;
        parser
    }

    /// Get all parse issues encountered so far.
    #[must_use]
    pub fn get_issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Run the parser and return the DOM tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Run the parser and return both the `DomTree` and any parse issues.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        while !self.stopped && self.token_index < self.tokens.len() {
            let token = self.tokens[self.token_index].clone();
            self.process_token(&token);
            self.token_index += 1;
        }
        let issues = std::mem::take(&mut self.issues);
        (self.tree, issues)
    }

    /// [§ 13.2.6 Tree construction dispatcher](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    fn process_token(&mut self, token: &Token) {
        if self.ignore_next_line_feed {
            self.ignore_next_line_feed = false;
            if matches!(token, Token::Character { data: '\n' }) {
                return;
            }
        }
        match self.insertion_mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
        }
    }

    /// "Reprocess the token" in the (already switched) insertion mode.
    fn reprocess_token(&mut self, token: &Token) {
        self.process_token(token);
    }

    fn parse_error(&mut self, message: &str) {
        self.issues.push(ParseIssue {
            message: message.to_string(),
            token_index: self.token_index,
            is_error: true,
        });
    }

    /// Record a construct this builder only approximates.
    ///
    /// Logs through the deduplicating warning channel and stores the issue.
    fn parse_warning(&mut self, message: &str) {
        warn_once("HTML Parser", message);
        self.issues.push(ParseIssue {
            message: message.to_string(),
            token_index: self.token_index,
            is_error: false,
        });
    }

    // =========================================================================
    // Tree helpers
    // =========================================================================

    const fn is_whitespace(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
    }

    /// "The current node is the bottommost node in this stack of open elements."
    fn current_node(&self) -> Option<NodeId> {
        self.stack_of_open_elements.last().copied()
    }

    fn current_node_is(&self, tag_name: &str) -> bool {
        self.current_node()
            .is_some_and(|id| self.tree.is_element_named(id, tag_name))
    }

    fn get_tag_name(&self, id: NodeId) -> Option<&str> {
        self.tree.as_element(id).map(|data| data.tag_name.as_str())
    }

    /// [§ 13.2.6.1 Appropriate place for inserting a node](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// Without foster parenting this is always "inside the current node,
    /// after its last child".
    fn insertion_parent(&self) -> NodeId {
        self.current_node().unwrap_or(NodeId::ROOT)
    }

    /// [§ 13.2.6.1 Create an element for a token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// Inside `<svg>` the names are case-adjusted first.
    fn create_element(&mut self, tag_name: &str, attributes: &[Attribute]) -> NodeId {
        let svg = tag_name == "svg" || self.in_svg();
        let mut data = ElementData::new(tag_name);
        if svg {
            data.tag_name = adjust_svg_tag_name(tag_name);
        }
        data.attrs = attributes
            .iter()
            .map(|a| {
                let name = if svg {
                    adjust_svg_attribute_name(&a.name)
                } else {
                    a.name.clone()
                };
                (name, a.value.clone())
            })
            .collect::<Attributes>();
        self.tree.alloc(NodeType::Element(data))
    }

    fn in_svg(&self) -> bool {
        self.stack_of_open_elements
            .iter()
            .any(|&id| self.tree.is_element_named(id, "svg"))
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    fn insert_character(&mut self, c: char) {
        // STEP 1: "Let the adjusted insertion location be the appropriate place
        //         for inserting a node."
        let parent_id = self.insertion_parent();
        // "If the adjusted insertion location is in a Document node, then
        // return." The DOM will not let Document nodes have Text node children.
        if parent_id == NodeId::ROOT {
            return;
        }

        // STEP 2: "If there is a Text node immediately before the adjusted
        //         insertion location, then append data to that Text node's data."
        if let Some(last) = self.tree.last_child(parent_id)
            && let Some(node) = self.tree.get_mut(last)
            && let NodeType::Text(ref mut text) = node.node_type
        {
            text.push(c);
            return;
        }

        // STEP 3: "Otherwise, create a new Text node whose data is data ...
        //         and insert the newly created node at the adjusted insertion location."
        let text_id = self.tree.alloc(NodeType::Text(String::from(c)));
        self.tree.append_child(parent_id, text_id);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    fn insert_comment(&mut self, data: &str, parent: Option<NodeId>) {
        let parent_id = parent.unwrap_or_else(|| self.insertion_parent());
        let comment_id = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.tree.append_child(parent_id, comment_id);
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// Non-start-tag tokens are ignored.
    fn insert_html_element(&mut self, token: &Token) -> Option<NodeId> {
        let Token::StartTag {
            name, attributes, ..
        } = token
        else {
            return None;
        };
        Some(self.insert_element_named(name, attributes))
    }

    fn insert_element_named(&mut self, tag_name: &str, attributes: &[Attribute]) -> NodeId {
        // STEP 1: "Create an element for the token"
        let element_id = self.create_element(tag_name, attributes);
        // STEP 2-3: "Append the new element to the node at the adjusted
        //           insertion location."
        let parent_id = self.insertion_parent();
        self.tree.append_child(parent_id, element_id);
        // STEP 4: "Push the element onto the stack of open elements."
        self.stack_of_open_elements.push(element_id);
        element_id
    }

    /// Insert a void element: inserted, then "immediately pop the current
    /// node off the stack of open elements".
    fn insert_void_element(&mut self, token: &Token) {
        if self.insert_html_element(token).is_some() {
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// [§ 13.2.6.2 Generic RCDATA/raw text element parsing](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    ///
    /// The tokenizer has already switched itself to RCDATA/RAWTEXT.
    /// "Let the original insertion mode be the current insertion mode.
    /// Then, switch the insertion mode to "text"."
    fn insert_raw_text_element(&mut self, token: &Token) {
        let _ = self.insert_html_element(token);
        self.original_insertion_mode = Some(self.insertion_mode);
        self.insertion_mode = InsertionMode::Text;
    }

    /// "When the steps below require the UA to merge attributes onto an
    /// element: for each attribute on the token, check to see if the
    /// attribute is already present on the element. If it is not, add the
    /// attribute and its corresponding value to that element."
    fn merge_attributes(&mut self, target: NodeId, attributes: &[Attribute]) {
        if let Some(element) = self.tree.as_element_mut(target) {
            for attribute in attributes {
                if !element.attrs.contains(&attribute.name) {
                    let _ = element.attrs.set(&attribute.name, &attribute.value);
                }
            }
        }
    }

    /// Pop elements until one named `tag_name` has been popped.
    fn pop_until_tag(&mut self, tag_name: &str) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if self.get_tag_name(id) == Some(tag_name) {
                break;
            }
        }
    }

    /// Pop elements until one of `tag_names` has been popped.
    fn pop_until_one_of(&mut self, tag_names: &[&str]) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if self.get_tag_name(id).is_some_and(|n| tag_names.contains(&n)) {
                break;
            }
        }
    }

    /// [§ 13.2.4.2 Has an element in a specific scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// STEP 1: "Initialize node to be the current node."
    /// STEP 2: "If node is the target node, terminate in a match state."
    /// STEP 3: "Otherwise, if node is one of the element types in list,
    ///          terminate in a failure state."
    /// STEP 4: "Otherwise, set node to the previous entry and return to step 2."
    fn has_element_in_specific_scope(&self, tag_names: &[&str], scope_markers: &[&str]) -> bool {
        for &node_id in self.stack_of_open_elements.iter().rev() {
            if let Some(node_tag) = self.get_tag_name(node_id) {
                if tag_names.contains(&node_tag) {
                    return true;
                }
                if scope_markers.contains(&node_tag) {
                    return false;
                }
            }
        }
        false
    }

    fn has_element_in_scope(&self, tag_name: &str) -> bool {
        self.has_element_in_specific_scope(&[tag_name], DEFAULT_SCOPE)
    }

    /// "has an element in button scope": default scope plus `button`.
    fn has_element_in_button_scope(&self, tag_name: &str) -> bool {
        const BUTTON_SCOPE: &[&str] = &[
            "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template",
            "button",
        ];
        self.has_element_in_specific_scope(&[tag_name], BUTTON_SCOPE)
    }

    /// "has an element in list item scope": default scope plus `ol`, `ul`.
    fn has_element_in_list_item_scope(&self, tag_name: &str) -> bool {
        const LIST_ITEM_SCOPE: &[&str] = &[
            "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template",
            "ol", "ul",
        ];
        self.has_element_in_specific_scope(&[tag_name], LIST_ITEM_SCOPE)
    }

    /// "has an element in table scope": html, table, template.
    fn has_element_in_table_scope(&self, tag_names: &[&str]) -> bool {
        self.has_element_in_specific_scope(tag_names, &["html", "table", "template"])
    }

    /// [§ 13.2.6.3 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "while the current node is [an implied end tag element] other than
    /// `exclude`, the UA must pop the current node off the stack"
    fn generate_implied_end_tags(&mut self, exclude: Option<&str>) {
        while let Some(id) = self.current_node() {
            match self.get_tag_name(id) {
                Some(name) if IMPLIED_END_TAGS.contains(&name) && Some(name) != exclude => {
                    let _ = self.stack_of_open_elements.pop();
                }
                _ => break,
            }
        }
    }

    /// "close a p element": generate implied end tags except for p, then pop
    /// until a p element has been popped.
    fn close_p_element(&mut self) {
        self.generate_implied_end_tags(Some("p"));
        if !self.current_node_is("p") {
            self.parse_error("p element closed with other elements still open");
        }
        self.pop_until_tag("p");
    }

    fn close_p_if_in_button_scope(&mut self) {
        if self.has_element_in_button_scope("p") {
            self.close_p_element();
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// The shared `li` / `dd` / `dt` start tag loop.
    fn close_list_item(&mut self, closes: &[&str]) {
        for &node_id in self.stack_of_open_elements.clone().iter().rev() {
            let Some(tag) = self.get_tag_name(node_id).map(str::to_string) else {
                continue;
            };
            if closes.contains(&tag.as_str()) {
                self.generate_implied_end_tags(Some(&tag));
                self.pop_until_tag(&tag);
                break;
            }
            if is_special_element(&tag) && !matches!(tag.as_str(), "address" | "div" | "p") {
                break;
            }
        }
        self.close_p_if_in_button_scope();
    }

    /// "Any other end tag" in body.
    ///
    /// STEP 1: "Initialize node to be the current node."
    /// STEP 2: "Loop: If node is an HTML element with the same tag name as the
    ///          token, then: generate implied end tags, except for HTML
    ///          elements with the same tag name as the token ... pop all the
    ///          nodes from the current node up to node, including node, then
    ///          stop these steps."
    /// STEP 3: "Otherwise, if node is in the special category, then this is a
    ///          parse error; ignore the token, and return."
    /// STEP 4: "Set node to the previous entry in the stack of open elements."
    fn any_other_end_tag(&mut self, tag_name: &str) {
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let node_id = self.stack_of_open_elements[index];
            let Some(node_tag) = self.get_tag_name(node_id) else {
                continue;
            };
            // Foreign elements keep their camelCase names.
            if node_tag.eq_ignore_ascii_case(tag_name) {
                self.generate_implied_end_tags(Some(tag_name));
                self.stack_of_open_elements.truncate(index);
                return;
            }
            if is_special_element(node_tag) {
                self.parse_error(&format!("stray end tag </{tag_name}> ignored"));
                return;
            }
        }
    }

    // =========================================================================
    // Insertion modes
    // =========================================================================

    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    fn handle_initial_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ...
            // U+0020 SPACE - Ignore the token."
            Token::Character { data } if Self::is_whitespace(*data) => {}
            // "A comment token - Insert a comment as the last child of the Document object."
            Token::Comment { data } => self.insert_comment(data, Some(NodeId::ROOT)),
            // "A DOCTYPE token - Append a DocumentType node to the Document node
            // ... Then, switch the insertion mode to "before html"."
            Token::Doctype { name } => {
                let doctype = self
                    .tree
                    .alloc(NodeType::DocumentType(name.clone().unwrap_or_default()));
                self.tree.append_child(NodeId::ROOT, doctype);
                self.insertion_mode = InsertionMode::BeforeHtml;
            }
            // "Anything else - ... switch the insertion mode to "before html",
            // then reprocess the token."
            _ => {
                self.insertion_mode = InsertionMode::BeforeHtml;
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    fn handle_before_html_mode(&mut self, token: &Token) {
        match token {
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE"),
            Token::Comment { data } => self.insert_comment(data, Some(NodeId::ROOT)),
            Token::Character { data } if Self::is_whitespace(*data) => {}
            // "A start tag whose tag name is "html" - Create an element for the
            // token ... Append it to the Document object. Put this element in
            // the stack of open elements."
            Token::StartTag {
                name, attributes, ..
            } if name == "html" => {
                let _ = self.insert_element_named(name, attributes);
                self.insertion_mode = InsertionMode::BeforeHead;
            }
            Token::EndTag { name } if !matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.parse_error(&format!("stray end tag </{name}> before <html>"));
            }
            // "Anything else - Create an html element whose node document is
            // the Document object. Append it to the Document object. Put this
            // element in the stack of open elements. Switch the insertion mode
            // to "before head", then reprocess the token."
            _ => {
                let _ = self.insert_element_named("html", &[]);
                self.insertion_mode = InsertionMode::BeforeHead;
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    fn handle_before_head_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if Self::is_whitespace(*data) => {}
            Token::Comment { data } => self.insert_comment(data, None),
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE"),
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),
            // "A start tag whose tag name is "head" - Insert an HTML element for
            // the token. Set the head element pointer to the newly created head
            // element. Switch the insertion mode to "in head"."
            Token::StartTag { name, .. } if name == "head" => {
                self.head_element_pointer = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InHead;
            }
            Token::EndTag { name } if !matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.parse_error(&format!("stray end tag </{name}> before <head>"));
            }
            // "Anything else - Insert an HTML element for a "head" start tag token
            // with no attributes ... Switch the insertion mode to "in head".
            // Reprocess the current token."
            _ => {
                self.head_element_pointer = Some(self.insert_element_named("head", &[]));
                self.insertion_mode = InsertionMode::InHead;
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    fn handle_in_head_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.insert_character(*data);
            }
            Token::Comment { data } => self.insert_comment(data, None),
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE"),
            Token::StartTag { name, .. } => match name.as_str() {
                "html" => self.handle_in_body_mode(token),
                // "Insert an HTML element for the token. Immediately pop the
                // current node off the stack of open elements."
                "base" | "basefont" | "bgsound" | "link" | "meta" => {
                    self.insert_void_element(token);
                }
                "title" | "style" | "script" | "noframes" => self.insert_raw_text_element(token),
                "head" => self.parse_error("nested <head> ignored"),
                "template" => {
                    self.parse_warning("<template> contents are parsed as ordinary elements");
                    let _ = self.insert_html_element(token);
                }
                _ => self.handle_in_head_anything_else(token),
            },
            Token::EndTag { name } => match name.as_str() {
                // "An end tag whose tag name is "head" - Pop the current node
                // (which will be the head element) off the stack of open
                // elements. Switch the insertion mode to "after head"."
                "head" => {
                    let _ = self.stack_of_open_elements.pop();
                    self.insertion_mode = InsertionMode::AfterHead;
                }
                "template" => self.any_other_end_tag(name),
                "body" | "html" | "br" => self.handle_in_head_anything_else(token),
                _ => self.parse_error(&format!("stray end tag </{name}> in head")),
            },
            _ => self.handle_in_head_anything_else(token),
        }
    }

    /// "Anything else - Pop the current node (which will be the head element)
    /// off the stack of open elements. Switch the insertion mode to "after
    /// head". Reprocess the token."
    fn handle_in_head_anything_else(&mut self, token: &Token) {
        if self.current_node_is("head") {
            let _ = self.stack_of_open_elements.pop();
        }
        self.insertion_mode = InsertionMode::AfterHead;
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    fn handle_after_head_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.insert_character(*data);
            }
            Token::Comment { data } => self.insert_comment(data, None),
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE"),
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),
            // "A start tag whose tag name is "body" - Insert an HTML element for
            // the token. Switch the insertion mode to "in body"."
            Token::StartTag { name, .. } if name == "body" => {
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InBody;
            }
            // "Push the node pointed to by the head element pointer onto the
            // stack of open elements. Process the token using the rules for the
            // "in head" insertion mode. Remove the node pointed to by the head
            // element pointer from the stack of open elements."
            Token::StartTag { name, .. } if HEAD_CONTENT.contains(&name.as_str()) => {
                self.parse_error(&format!("<{name}> after </head>"));
                let Some(head) = self.head_element_pointer else {
                    return self.handle_after_head_anything_else(token);
                };
                self.stack_of_open_elements.push(head);
                self.handle_in_head_mode(token);
                if let Some(pos) = self.stack_of_open_elements.iter().rposition(|&id| id == head) {
                    let _ = self.stack_of_open_elements.remove(pos);
                }
            }
            Token::StartTag { name, .. } if name == "head" => {
                self.parse_error("second <head> ignored");
            }
            Token::EndTag { name } if !matches!(name.as_str(), "body" | "html" | "br") => {
                self.parse_error(&format!("stray end tag </{name}> after head"));
            }
            _ => self.handle_after_head_anything_else(token),
        }
    }

    /// "Anything else - Insert an HTML element for a "body" start tag token with
    /// no attributes. Switch the insertion mode to "in body". Reprocess the
    /// current token."
    fn handle_after_head_anything_else(&mut self, token: &Token) {
        let _ = self.insert_element_named("body", &[]);
        self.insertion_mode = InsertionMode::InBody;
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    fn handle_in_body_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL - Parse error. Ignore the token."
            Token::Character { data: '\0' } => self.parse_error("NULL character ignored"),
            Token::Character { data } => self.insert_character(*data),
            Token::Comment { data } => self.insert_comment(data, None),
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE in body"),
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => self.handle_in_body_start_tag(token, name, *self_closing, attributes),
            Token::EndTag { name } => self.handle_in_body_end_tag(name),
            // "An end-of-file token - ... Stop parsing."
            Token::EndOfFile => self.stopped = true,
        }
    }

    fn handle_in_body_start_tag(
        &mut self,
        token: &Token,
        name: &str,
        self_closing: bool,
        attributes: &[Attribute],
    ) {
        match name {
            // "A start tag whose tag name is "html" - Parse error. ... for each
            // attribute on the token, check to see if the attribute is already
            // present on the top element of the stack of open elements. If it is
            // not, add the attribute"
            "html" => {
                self.parse_error("unexpected <html> in body");
                if !self.fragment
                    && let Some(&html) = self.stack_of_open_elements.first()
                {
                    self.merge_attributes(html, attributes);
                }
            }
            _ if HEAD_CONTENT.contains(&name) => self.handle_in_head_mode(token),
            // "If the second element on the stack of open elements is not a body
            // element ... ignore the token. Otherwise ... merge attributes"
            "body" => {
                self.parse_error("unexpected <body> in body");
                if let Some(&body) = self.stack_of_open_elements.get(1)
                    && self.tree.is_element_named(body, "body")
                {
                    self.merge_attributes(body, attributes);
                }
            }
            "head" => self.parse_error("unexpected <head> in body"),
            "frameset" | "frame" => {
                self.parse_warning("framesets are not supported; element ignored");
            }
            _ if HEADINGS.contains(&name) => {
                self.close_p_if_in_button_scope();
                // "If the current node is an HTML element whose tag name is one of
                // "h1", ..., "h6", then this is a parse error; pop the current node"
                if self
                    .current_node()
                    .and_then(|id| self.get_tag_name(id))
                    .is_some_and(|n| HEADINGS.contains(&n))
                {
                    self.parse_error("nested heading closed");
                    let _ = self.stack_of_open_elements.pop();
                }
                let _ = self.insert_html_element(token);
            }
            "pre" | "listing" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(token);
                self.ignore_next_line_feed = true;
            }
            "hr" => {
                self.close_p_if_in_button_scope();
                self.insert_void_element(token);
            }
            "plaintext" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(token);
            }
            "xmp" => {
                self.close_p_if_in_button_scope();
                self.insert_raw_text_element(token);
            }
            _ if CLOSES_P.contains(&name) => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(token);
            }
            "li" => {
                self.close_list_item(&["li"]);
                let _ = self.insert_html_element(token);
            }
            "dd" | "dt" => {
                self.close_list_item(&["dd", "dt"]);
                let _ = self.insert_html_element(token);
            }
            "button" => {
                if self.has_element_in_scope("button") {
                    self.parse_error("nested <button> closes the open one");
                    self.generate_implied_end_tags(None);
                    self.pop_until_tag("button");
                }
                let _ = self.insert_html_element(token);
            }
            // No list of active formatting elements: an open `a` is simply
            // closed before the new one opens.
            "a" => {
                if self.has_element_in_scope("a") {
                    self.parse_error("nested <a> closes the open one");
                    self.any_other_end_tag("a");
                }
                let _ = self.insert_html_element(token);
            }
            "option" | "optgroup" => {
                if self.current_node_is("option") {
                    let _ = self.stack_of_open_elements.pop();
                }
                let _ = self.insert_html_element(token);
            }
            "textarea" => {
                self.insert_raw_text_element(token);
                self.ignore_next_line_feed = true;
            }
            "iframe" | "noembed" => self.insert_raw_text_element(token),
            // "Parse error. Change the token's tag name to "img" and reprocess it."
            "image" => {
                self.parse_error("<image> treated as <img>");
                self.insert_void_element(&Token::StartTag {
                    name: "img".to_string(),
                    self_closing,
                    attributes: attributes.to_vec(),
                });
            }
            "td" | "th" => {
                if self.has_element_in_table_scope(&["td", "th"]) {
                    self.generate_implied_end_tags(None);
                    self.pop_until_one_of(&["td", "th"]);
                }
                let _ = self.insert_html_element(token);
            }
            "tr" => {
                if self.has_element_in_table_scope(&["tr"]) {
                    self.generate_implied_end_tags(None);
                    self.pop_until_tag("tr");
                }
                let _ = self.insert_html_element(token);
            }
            "tbody" | "thead" | "tfoot" => {
                if self.has_element_in_table_scope(&["tbody", "thead", "tfoot"]) {
                    self.generate_implied_end_tags(None);
                    self.pop_until_one_of(&["tbody", "thead", "tfoot"]);
                }
                let _ = self.insert_html_element(token);
            }
            _ if voxel_dom::is_void_element(name) => self.insert_void_element(token),
            // Foreign content: "If the token has its self-closing flag set, pop
            // the current node off the stack of open elements"
            _ => {
                let _ = self.insert_html_element(token);
                if self_closing && self.in_foreign_content() {
                    let _ = self.stack_of_open_elements.pop();
                }
            }
        }
    }

    fn in_foreign_content(&self) -> bool {
        self.stack_of_open_elements.iter().any(|&id| {
            self.tree.is_element_named(id, "svg") || self.tree.is_element_named(id, "math")
        })
    }

    fn handle_in_body_end_tag(&mut self, name: &str) {
        match name {
            // "If the stack of open elements does not have a body element in
            // scope, this is a parse error; ignore the token. ... Switch the
            // insertion mode to "after body"."
            "body" | "html" => {
                if !self.has_element_in_scope("body") {
                    self.parse_error(&format!("</{name}> without an open body"));
                    return;
                }
                self.insertion_mode = InsertionMode::AfterBody;
                if name == "html" {
                    self.reprocess_token(&Token::EndTag {
                        name: name.to_string(),
                    });
                }
            }
            // "If the stack of open elements does not have a p element in button
            // scope, then this is a parse error; insert an HTML element for a "p"
            // start tag token with no attributes. Close a p element."
            "p" => {
                if !self.has_element_in_button_scope("p") {
                    self.parse_error("</p> without an open p");
                    let _ = self.insert_element_named("p", &[]);
                }
                self.close_p_element();
            }
            "li" => {
                if self.has_element_in_list_item_scope("li") {
                    self.generate_implied_end_tags(Some("li"));
                    self.pop_until_tag("li");
                } else {
                    self.parse_error("</li> without an open li");
                }
            }
            "dd" | "dt" => {
                if self.has_element_in_scope(name) {
                    self.generate_implied_end_tags(Some(name));
                    self.pop_until_tag(name);
                } else {
                    self.parse_error(&format!("</{name}> without an open {name}"));
                }
            }
            _ if HEADINGS.contains(&name) => {
                if self.has_element_in_specific_scope(HEADINGS, DEFAULT_SCOPE) {
                    self.generate_implied_end_tags(None);
                    self.pop_until_one_of(HEADINGS);
                } else {
                    self.parse_error(&format!("</{name}> without an open heading"));
                }
            }
            "table" | "caption" | "tbody" | "thead" | "tfoot" | "tr" | "td" | "th" => {
                if self.has_element_in_table_scope(&[name]) {
                    self.generate_implied_end_tags(None);
                    self.pop_until_tag(name);
                } else {
                    self.parse_error(&format!("</{name}> without an open {name}"));
                }
            }
            _ if BLOCK_END_TAGS.contains(&name) => {
                if self.has_element_in_scope(name) {
                    self.generate_implied_end_tags(None);
                    self.pop_until_tag(name);
                } else {
                    self.parse_error(&format!("</{name}> without an open {name}"));
                }
            }
            // "An end tag whose tag name is "br" - Parse error. Drop the
            // attributes from the token, and act as described in the next entry;
            // i.e. act as if this was a "br" start tag token with no attributes"
            "br" => {
                self.parse_error("</br> treated as <br>");
                let _ = self.insert_element_named("br", &[]);
                let _ = self.stack_of_open_elements.pop();
            }
            _ => self.any_other_end_tag(name),
        }
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    fn handle_text_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } => self.insert_character(*data),
            // "An end-of-file token - Parse error. ... Pop the current node off
            // the stack of open elements. Switch the insertion mode to the
            // original insertion mode and reprocess the token."
            Token::EndOfFile => {
                self.parse_error("end of file inside raw text element");
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = self
                    .original_insertion_mode
                    .take()
                    .unwrap_or(InsertionMode::InBody);
                self.reprocess_token(token);
            }
            // "Any other end tag - Pop the current node off the stack of open
            // elements. Switch the insertion mode to the original insertion mode."
            _ => {
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = self
                    .original_insertion_mode
                    .take()
                    .unwrap_or(InsertionMode::InBody);
            }
        }
    }

    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    fn handle_after_body_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.handle_in_body_mode(token);
            }
            // "Insert a comment as the last child of the first element in the
            // stack of open elements (the html element)."
            Token::Comment { data } => {
                let html = self.stack_of_open_elements.first().copied();
                self.insert_comment(data, html);
            }
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE after body"),
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),
            Token::EndTag { name } if name == "html" => {
                self.insertion_mode = InsertionMode::AfterAfterBody;
            }
            Token::EndOfFile => self.stopped = true,
            _ => {
                self.parse_error("content after </body>");
                self.insertion_mode = InsertionMode::InBody;
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    fn handle_after_after_body_mode(&mut self, token: &Token) {
        match token {
            Token::Comment { data } => self.insert_comment(data, Some(NodeId::ROOT)),
            Token::Doctype { .. } => self.handle_in_body_mode(token),
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.handle_in_body_mode(token);
            }
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),
            Token::EndOfFile => self.stopped = true,
            _ => {
                self.parse_error("content after </html>");
                self.insertion_mode = InsertionMode::InBody;
                self.reprocess_token(token);
            }
        }
    }
}

/// Whether `tag_name`'s content is delivered by the tokenizer as raw text
/// (RCDATA or RAWTEXT).
#[must_use]
pub fn is_raw_text_element(tag_name: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag_name)
}

/// Print a DOM tree for debugging.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let prefix = "  ".repeat(indent);
    if let Some(node) = tree.get(id) {
        match &node.node_type {
            NodeType::Document => {
                println!("{prefix}Document");
            }
            NodeType::DocumentType(name) => {
                println!("{prefix}<!DOCTYPE {name}>");
            }
            NodeType::Element(data) => {
                if data.attrs.is_empty() {
                    println!("{prefix}<{}>", data.tag_name);
                } else {
                    let attrs: Vec<String> = data
                        .attrs
                        .iter()
                        .map(|(k, v)| {
                            if v.is_empty() {
                                k.to_string()
                            } else {
                                format!("{k}=\"{v}\"")
                            }
                        })
                        .collect();
                    println!("{prefix}<{} {}>", data.tag_name, attrs.join(" "));
                }
            }
            NodeType::Text(data) => {
                let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
                println!("{prefix}\"{display}\"");
            }
            NodeType::Comment(data) => {
                println!("{prefix}<!-- {data} -->");
            }
        }
        for &child_id in tree.children(id) {
            print_tree(tree, child_id, indent + 1);
        }
    }
}
