//! HTML tokenizer, tree builder and serializer for the Voxel editor.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, RCDATA, RAWTEXT, PLAINTEXT and tag states
//!   - DOCTYPE, comment, and character reference handling
//!   - Attribute parsing
//!
//! - **HTML Parser / Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - Insertion modes: Initial, BeforeHtml, BeforeHead, InHead, AfterHead, InBody, Text, AfterBody, AfterAfterBody
//!   - Implicit html/head/body, implied end tags, stray end tag recovery
//!   - Fragment parsing in a `<body>` context
//!
//! - **Serializer** ([WHATWG § 13.3](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments))
//!
//! # Not Yet Implemented
//!
//! - Script data states (script content is tokenized as RAWTEXT)
//! - Table, select and template insertion modes
//! - Foster parenting
//! - Adoption agency algorithm
//!
//! Authored markup is never rejected: anything the builder does not model is
//! recovered into some tree, and the serializer writes that tree back out.

/// HTML parser and tree construction.
pub mod parser;
/// Tree to markup.
pub mod serializer;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use parser::{HTMLParser, InsertionMode, ParseIssue, is_raw_text_element, print_tree};
pub use serializer::{HtmlSerializer, outer_html, serialize_document};
pub use tokenizer::{Attribute, HTMLTokenizer, Token};

use voxel_dom::{DomTree, NodeId};

/// Tokenize and parse a complete document.
#[must_use]
pub fn parse_document(html: &str) -> DomTree {
    let mut tokenizer = HTMLTokenizer::new(html.to_string());
    tokenizer.run();
    HTMLParser::new(tokenizer.into_tokens()).run()
}

/// Tokenize and parse markup as the children of a `<body>` element.
///
/// Returns the tree and the container whose children are the parsed nodes.
#[must_use]
pub fn parse_fragment(html: &str) -> (DomTree, NodeId) {
    let mut tokenizer = HTMLTokenizer::new(html.to_string());
    tokenizer.run();
    let tree = HTMLParser::new_fragment(tokenizer.into_tokens()).run();
    let container = tree.document_element().unwrap_or(NodeId::ROOT);
    (tree, container)
}
