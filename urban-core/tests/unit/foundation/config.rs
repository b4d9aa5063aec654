use super::*;

#[test]
fn defaults_match_service_settings() {
    let cfg = EngineConfig::default();
    assert_eq!(cfg.jpeg_quality, 95);
    assert_eq!(cfg.gradient_peak_alpha, 220);
    assert_eq!(cfg.shorten_threshold_chars, 30);
    assert_eq!(cfg.default_font_key, "noto_sans");
    assert_eq!(cfg.system_fallbacks.len(), 3);
    cfg.validate().unwrap();
}

#[test]
fn partial_json_keeps_other_defaults() {
    let cfg = EngineConfig::from_reader(r#"{ "jpeg_quality": 80 }"#.as_bytes()).unwrap();
    assert_eq!(cfg.jpeg_quality, 80);
    assert_eq!(cfg.fonts, FontCatalog::with_default_entries());
}

#[test]
fn unknown_fields_and_bad_values_are_rejected() {
    let err = EngineConfig::from_reader(r#"{ "quality": 80 }"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("config error:"));

    let err = EngineConfig::from_reader(r#"{ "jpeg_quality": 0 }"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("jpeg_quality"));

    let err =
        EngineConfig::from_reader(r#"{ "default_font_key": "comic" }"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("comic"));
}

#[test]
fn fonts_dir_override_ignores_blank_values() {
    let cfg = EngineConfig::default().with_overrides_from(|name| {
        (name == FONTS_DIR_ENV).then(|| "/opt/urban/fonts".to_string())
    });
    assert_eq!(cfg.fonts_dir, PathBuf::from("/opt/urban/fonts"));

    let cfg = EngineConfig::default().with_overrides_from(|_| Some("  ".to_string()));
    assert_eq!(cfg.fonts_dir, PathBuf::from("fonts"));
}

#[test]
fn from_path_reports_missing_file() {
    let err = EngineConfig::from_path("target/does-not-exist/urban.json").unwrap_err();
    assert!(err.to_string().contains("open engine config"));
}
