//! Tests for image uploads.

use voxel_common::net::DataURL;
use voxel_editor::{DataUrlImageStore, ImageError, ImageStore};

const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

#[test]
fn test_upload_returns_decodable_data_url() {
    let mut store = DataUrlImageStore::default();
    let url = store.upload("logo.PNG", PNG_HEADER).unwrap();
    assert!(url.starts_with("data:image/png;base64,"));

    let data = DataURL::new(url);
    assert_eq!(data.media_type(), Some("image/png"));
    assert_eq!(data.decode().unwrap(), PNG_HEADER);
}

#[test]
fn test_rejections() {
    let mut store = DataUrlImageStore::new(4);
    assert!(matches!(store.upload("a.png", &[]), Err(ImageError::Empty)));
    assert!(matches!(
        store.upload("a.png", PNG_HEADER),
        Err(ImageError::TooLarge { size: 8, limit: 4 })
    ));
    assert!(matches!(
        store.upload("notes.txt", b"hi"),
        Err(ImageError::UnsupportedType(name)) if name == "notes.txt"
    ));
    assert!(store.list_user_images().is_empty());
}

#[test]
fn test_gallery_keeps_upload_order() {
    let mut store = DataUrlImageStore::default();
    let first = store.upload("a.gif", b"GIF89a").unwrap();
    let second = store.upload("b.svg", b"<svg/>").unwrap();
    assert_eq!(store.list_user_images(), [first, second.clone()]);
    assert!(second.starts_with("data:image/svg+xml;base64,"));
}
