//! Tests for textual removal of the injected editor style block.

use voxel_editor::strip_editor_styles;

const ID: &str = "voxel-editor-styles";

#[test]
fn test_strip_removes_double_quoted_block() {
    let html = r#"<html><head><style id="voxel-editor-styles">[x] { color: red; }</style></head><body></body></html>"#;
    assert_eq!(
        strip_editor_styles(html, ID),
        "<html><head></head><body></body></html>"
    );
}

#[test]
fn test_strip_accepts_single_and_unquoted_ids() {
    let single = "<head><style id='voxel-editor-styles'>a{}</style></head>";
    let bare = "<head><style type=text/css id=voxel-editor-styles>a{}</style></head>";
    assert_eq!(strip_editor_styles(single, ID), "<head></head>");
    assert_eq!(strip_editor_styles(bare, ID), "<head></head>");
}

#[test]
fn test_strip_is_case_insensitive_on_markup() {
    let html = r#"<HEAD><STYLE ID="voxel-editor-styles">a{}</STYLE></HEAD>"#;
    assert_eq!(strip_editor_styles(html, ID), "<HEAD></HEAD>");
}

#[test]
fn test_strip_tolerates_arbitrary_inner_content() {
    let html = r#"<head><style id="voxel-editor-styles">/* <b>not markup</b> */ [a="1"] > p { x: y }</style><title>T</title></head>"#;
    assert_eq!(strip_editor_styles(html, ID), "<head><title>T</title></head>");
}

#[test]
fn test_strip_leaves_other_style_blocks() {
    let html = r#"<head><style id="site">p{}</style><style>h1{}</style></head>"#;
    assert_eq!(strip_editor_styles(html, ID), html);
}

#[test]
fn test_strip_removes_every_copy() {
    let html = r#"<style id="voxel-editor-styles">a</style><p>x</p><style id="voxel-editor-styles">b</style>"#;
    assert_eq!(strip_editor_styles(html, ID), "<p>x</p>");
}

#[test]
fn test_strip_without_marker_returns_input() {
    let html = "<html><head></head><body><p>clean</p></body></html>";
    assert_eq!(strip_editor_styles(html, ID), html);
}

#[test]
fn test_unterminated_block_is_left_alone() {
    let html = r#"<head><style id="voxel-editor-styles">a{}"#;
    assert_eq!(strip_editor_styles(html, ID), html);
}

#[test]
fn test_strip_is_idempotent() {
    let html = r#"<head><style id="voxel-editor-styles">a{}</style><style id="keep">b{}</style></head><body>é ü</body>"#;
    let once = strip_editor_styles(html, ID);
    assert_eq!(strip_editor_styles(&once, ID), once);
}

#[test]
fn test_similar_tag_names_are_not_matched() {
    let html = r#"<styles id="voxel-editor-styles">x</styles>"#;
    assert_eq!(strip_editor_styles(html, ID), html);
}
