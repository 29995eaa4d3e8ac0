//! Tests for `data:` URL helpers.

use voxel_common::net::{DataURL, is_remote, media_type_for};

#[test]
fn test_data_url_encode_then_decode() {
    let url = DataURL::encode("image/png", &[0x89, b'P', b'N', b'G']);
    assert!(url.raw_data.starts_with("data:image/png;base64,"));
    assert_eq!(url.decode().unwrap(), vec![0x89, b'P', b'N', b'G']);
}

#[test]
fn test_data_url_media_type() {
    let url = DataURL::new("data:image/svg+xml;base64,PHN2Zy8+".to_string());
    assert_eq!(url.media_type(), Some("image/svg+xml"));
}

#[test]
fn test_data_url_plain_payload() {
    let url = DataURL::new("data:text/plain,hello".to_string());
    assert_eq!(url.decode().unwrap(), b"hello".to_vec());
}

#[test]
fn test_data_url_missing_comma_is_error() {
    let url = DataURL::new("data:image/png;base64".to_string());
    assert!(url.decode().is_err());
}

#[test]
fn test_media_type_for_extension() {
    assert_eq!(media_type_for("photo.JPG"), "image/jpeg");
    assert_eq!(media_type_for("logo.svg"), "image/svg+xml");
    assert_eq!(media_type_for("README"), "application/octet-stream");
}

#[test]
fn test_is_remote() {
    assert!(is_remote("https://example.com/a.html"));
    assert!(!is_remote("./screens/a.html"));
}
