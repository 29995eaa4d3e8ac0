//! HTML parser module for tree construction.

/// Tree builder implementation.
pub mod core;
/// Case adjustments for SVG content.
pub mod foreign_content;

pub use self::core::{HTMLParser, InsertionMode, ParseIssue, is_raw_text_element, print_tree};
