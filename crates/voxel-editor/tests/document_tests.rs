//! Tests for screen documents and source loading.

use voxel_common::notice::NoticeLevel;
use voxel_editor::document::read_source;
use voxel_editor::{Document, LoadError, load_screen_source};

#[test]
fn test_load_accepts_anything() {
    let doc = Document::load("<p>unclosed <b>tags");
    assert_eq!(doc.raw, "<p>unclosed <b>tags");
    assert_eq!(doc.screen_id, None);
    assert_eq!(doc.with_screen_id("home").screen_id.as_deref(), Some("home"));
}

#[test]
fn test_placeholder_escapes_name() {
    let doc = Document::placeholder("Tom & <Jerry>");
    assert!(doc.raw.contains("<title>Tom &amp; &lt;Jerry&gt;</title>"));
    assert!(doc.raw.contains("<h1>Tom &amp; &lt;Jerry&gt;</h1>"));
    assert!(doc.raw.contains("could not be loaded"));
}

#[test]
fn test_load_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, b"<h1>From disk</h1>").unwrap();
    let path = file.path().to_string_lossy().into_owned();

    let (doc, notice) = load_screen_source(&path, "Disk");
    assert_eq!(doc.raw, "<h1>From disk</h1>");
    assert!(notice.is_none());
}

#[test]
fn test_missing_source_yields_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.html");
    let path = path.to_string_lossy();

    assert!(matches!(read_source(&path), Err(LoadError::Io { .. })));

    let (doc, notice) = load_screen_source(&path, "Gone");
    assert_eq!(doc, Document::placeholder("Gone"));
    let notice = notice.unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert_eq!(notice.component, "Loader");
}
