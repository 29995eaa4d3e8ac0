//! Tests for editor configuration loading.

use std::time::Duration;

use voxel_editor::{ConfigError, EditorConfig};

fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    move |var| {
        pairs
            .iter()
            .find(|(k, _)| *k == var)
            .map(|(_, v)| (*v).to_string())
    }
}

#[test]
fn test_defaults() {
    let config = EditorConfig::default();
    assert_eq!(config.debounce(), Duration::from_millis(800));
    assert_eq!(config.style_id, "voxel-editor-styles");
    assert_eq!(config.path_separator, " > ");
    assert!(config.wrap_library_fragments);
}

#[test]
fn test_partial_json_keeps_other_defaults() {
    let config = EditorConfig::from_json_str(r#"{"debounce_ms": 250, "toolbar_width": 320.0}"#).unwrap();
    assert_eq!(config.debounce_ms, 250);
    assert!((config.toolbar_width - 320.0).abs() < f32::EPSILON);
    assert_eq!(config.selection_attribute, "data-voxel-selected");
}

#[test]
fn test_malformed_json_is_a_parse_error() {
    assert!(matches!(
        EditorConfig::from_json_str(r#"{"debounce_ms": "soon"}"#),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("voxel.json");
    std::fs::write(&path, r#"{"wrap_library_fragments": false}"#).unwrap();
    let config = EditorConfig::from_file(&path).unwrap();
    assert!(!config.wrap_library_fragments);

    assert!(matches!(
        EditorConfig::from_file(&dir.path().join("missing.json")),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn test_overrides_apply() {
    let mut config = EditorConfig::default();
    config
        .apply_overrides(lookup(&[
            ("VOXEL_DEBOUNCE_MS", " 100 "),
            ("VOXEL_TOOLBAR_WIDTH", "240"),
            ("VOXEL_STYLE_ID", "my-styles"),
        ]))
        .unwrap();
    assert_eq!(config.debounce_ms, 100);
    assert!((config.toolbar_width - 240.0).abs() < f32::EPSILON);
    assert_eq!(config.style_id, "my-styles");
}

#[test]
fn test_blank_style_id_is_ignored() {
    let mut config = EditorConfig::default();
    config
        .apply_overrides(lookup(&[("VOXEL_STYLE_ID", "   ")]))
        .unwrap();
    assert_eq!(config.style_id, "voxel-editor-styles");
}

#[test]
fn test_invalid_numbers_are_rejected() {
    let mut config = EditorConfig::default();
    let err = config
        .apply_overrides(lookup(&[("VOXEL_DEBOUNCE_MS", "fast")]))
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidEnv { var: "VOXEL_DEBOUNCE_MS", ref value } if value == "fast"
    ));

    for width in ["-5", "NaN", "wide"] {
        assert!(matches!(
            config.apply_overrides(lookup(&[("VOXEL_TOOLBAR_WIDTH", width)])),
            Err(ConfigError::InvalidEnv { var: "VOXEL_TOOLBAR_WIDTH", .. })
        ));
    }
    assert!((config.toolbar_width - 200.0).abs() < f32::EPSILON);
}
