use super::*;
use crate::layout::plan::plan_layout;
use crate::text::builtin::BuiltinFont;

fn gray(w: u32, h: u32) -> Canvas {
    Canvas::from_premul(w, h, [120u8, 120, 120, 255].repeat((w * h) as usize)).unwrap()
}

fn scene(w: u32, h: u32, text: &str) -> Scene {
    let font = ResolvedFont::Builtin(BuiltinFont::default());
    let mut shaper = TextShaper::new();
    let plan = plan_layout(text, &font, 48, w, h, &mut shaper);
    Scene::prepare(w, h, plan, &font, &font, &mut shaper, 220).unwrap()
}

fn layer(kind: LayerKind) -> LayerFn {
    LAYER_STACK
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, f)| *f)
        .unwrap()
}

#[test]
fn stack_order_is_fixed() {
    let kinds: Vec<_> = LAYER_STACK.iter().map(|(k, _)| *k).collect();
    assert_eq!(
        kinds,
        vec![
            LayerKind::Blur,
            LayerKind::Gradient,
            LayerKind::Accent,
            LayerKind::Text,
            LayerKind::Brand,
            LayerKind::Ornament
        ]
    );
}

#[test]
fn geometry_for_square_post() {
    let font = ResolvedFont::Builtin(BuiltinFont::default());
    let mut shaper = TextShaper::new();
    let plan = plan_layout("AB", &font, 59, 1080, 1080, &mut shaper);

    let accent = accent_geometry(1080, &plan);
    assert_eq!(accent.bar.x0, 49.0);
    assert_eq!(accent.bar.width(), 6.0);
    assert_eq!(accent.bar.y0, f64::from(plan.y_start));
    assert_eq!(accent.cap.x0, 44.0);
    assert_eq!(accent.cap.y1, f64::from(plan.y_start) - 4.0);

    let (segments, stroke) = ornament_segments(1080);
    assert_eq!(segments[0].0, Point::new(1026.0, 54.0));
    assert_eq!(segments[0].1, Point::new(1026.0, 183.0));
    assert_eq!(segments[1].1, Point::new(897.0, 54.0));
    assert_eq!(stroke, 2.0);

    assert_eq!(brand_origin(1080, 1080, 86, 60.0), Point::new(934.0, 1043.0));
    assert_eq!(shadow_offset(59), 3.0);
    assert_eq!(outline_width(59), 2.0);
    assert_eq!(blur_radius(1080), 3);
    assert_eq!(blur_radius(4000), 8);
}

#[test]
fn ramps_start_at_zero_and_grow() {
    assert_eq!(blur_mask_alpha(540, 540, 1080), 0);
    assert_eq!(blur_mask_alpha(1079, 540, 1080), 79);
    assert_eq!(blur_mask_alpha(10, 540, 1080), 0);

    assert_eq!(gradient_alpha(324, 324, 1080, 220), 0);
    assert!(gradient_alpha(1079, 324, 1080, 220) >= 218);
    assert!(gradient_alpha(700, 324, 1080, 220) < gradient_alpha(900, 324, 1080, 220));
}

#[test]
fn blur_of_flat_image_is_identity() {
    let s = scene(64, 64, "HI");
    let out = layer(LayerKind::Blur)(gray(64, 64), &s).unwrap();
    assert_eq!(out, gray(64, 64));
}

#[test]
fn gradient_darkens_only_the_lower_part() {
    let s = scene(50, 100, "HI");
    let out = layer(LayerKind::Gradient)(gray(50, 100), &s).unwrap();
    assert_eq!(out.pixel(10, 5), Some([120, 120, 120, 255]));
    assert_eq!(out.pixel(10, 30), Some([120, 120, 120, 255]));
    let bottom = out.pixel(10, 99).unwrap();
    assert!(bottom[0] < 60);
    assert_eq!(bottom[3], 255);
}

#[test]
fn accent_tints_the_bar() {
    let s = scene(400, 400, "HI");
    let geometry = accent_geometry(400, &s.plan);
    let out = layer(LayerKind::Accent)(gray(400, 400), &s).unwrap();
    let x = (geometry.bar.x0 + 2.0) as u32;
    let y = (geometry.bar.y0 + 2.0) as u32;
    let px = out.pixel(x, y).unwrap();
    assert!(px[0] > 180 && px[2] < 110);
}

#[test]
fn text_layer_draws_white_glyph_cells() {
    let s = scene(400, 400, "HI");
    let out = layer(LayerKind::Text)(gray(400, 400), &s).unwrap();
    let white = out
        .as_bytes()
        .chunks_exact(4)
        .filter(|px| px[0] == 255 && px[1] == 255)
        .count();
    assert!(white > 0);
}

#[test]
fn brand_and_ornament_change_pixels_on_empty_caption() {
    let s = scene(400, 400, "");
    assert!(s.lines.iter().all(|l| l.shaped.is_empty()));

    let base = gray(400, 400);
    let branded = layer(LayerKind::Brand)(base.clone(), &s).unwrap();
    assert_ne!(branded, base);

    let ornamented = layer(LayerKind::Ornament)(base.clone(), &s).unwrap();
    let (segments, _) = ornament_segments(400);
    let anchor = segments[0].0;
    let px = ornamented
        .pixel(anchor.x as u32, (anchor.y + 5.0) as u32)
        .unwrap();
    assert_ne!(px, [120, 120, 120, 255]);
}

#[test]
fn full_stack_survives_degenerate_canvas() {
    let s = scene(1, 1, "tiny");
    let out = composite_layers(gray(1, 1), &s).unwrap();
    assert_eq!(out.dimensions(), (1, 1));
}
