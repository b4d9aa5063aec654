use std::io::Cursor;

use super::*;

fn offline_engine() -> OverlayEngine {
    let config = EngineConfig {
        fonts_dir: "target/pipeline_unit/no_fonts".into(),
        system_fallbacks: Vec::new(),
        ..EngineConfig::default()
    };
    OverlayEngine::new(config).unwrap()
}

fn jpeg(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(w, h, |x, y| image::Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .unwrap();
    buf
}

#[test]
fn zero_font_size_is_rejected() {
    let req = RenderRequest::new(jpeg(32, 32), "hi").with_font_size(0);
    let err = offline_engine().render(&req).unwrap_err();
    assert!(matches!(err, UrbanError::Validation(_)));
}

#[test]
fn undecodable_input_fails_the_call() {
    let req = RenderRequest::new(b"garbage".to_vec(), "hi");
    assert!(matches!(
        offline_engine().render(&req).unwrap_err(),
        UrbanError::Decode(_)
    ));
}

#[test]
fn report_describes_a_builtin_fallback_render() {
    let req = RenderRequest::new(jpeg(200, 160), "HELLO").with_font("noto_sans");
    let out = offline_engine().render_with_report(&req).unwrap();

    assert_eq!(out.report.width, 200);
    assert_eq!(out.report.height, 160);
    assert_eq!(out.report.font_size, 48);
    assert_eq!(out.report.font_name, "Noto Sans TC");
    assert!(out.report.builtin_font);
    assert_eq!(out.report.font_source, "builtin");
    assert_eq!(out.report.total_lines, 1);
    assert_eq!(&out.bytes[..2], &[0xFF, 0xD8]);
}

#[test]
fn unknown_selector_reports_system_name() {
    let req = RenderRequest::new(jpeg(120, 120), "x").with_font("nope");
    let (_, report) = offline_engine().compose(&req).unwrap();
    assert_eq!(report.font_name, SYSTEM_FONT_NAME);
}

#[test]
fn overlay_opacity_controls_gradient_strength() {
    let engine = offline_engine();
    let base = RenderRequest::new(jpeg(64, 64), "");
    let (light, _) = engine.compose(&base.clone().with_overlay_opacity(0)).unwrap();
    let (dark, _) = engine.compose(&base.with_overlay_opacity(255)).unwrap();

    let luma = |c: &Canvas, y: u32| -> u32 {
        (0..64).map(|x| u32::from(c.pixel(x, y).unwrap()[1])).sum()
    };
    assert!(luma(&dark, 62) < luma(&light, 62));
}

#[test]
fn font_size_override_wins() {
    let req = RenderRequest::new(jpeg(300, 300), "abc").with_font_size(61);
    let (_, report) = offline_engine().compose(&req).unwrap();
    assert_eq!(report.font_size, 61);
}
