use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 255), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255], 255), [255, 0, 0, 255]);
}

#[test]
fn over_dst_transparent_returns_src() {
    let src = [100, 110, 120, 200];
    assert_eq!(over([0, 0, 0, 0], src, 255), src);
}

#[test]
fn over_keeps_opaque_backgrounds_opaque() {
    let out = over([90, 90, 90, 255], [8, 10, 25, 128], 255);
    assert_eq!(out[3], 255);
}

#[test]
fn over_in_place_rejects_size_mismatch() {
    let mut dst = Canvas::transparent(2, 2).unwrap();
    let src = Canvas::transparent(3, 2).unwrap();
    assert!(over_in_place(&mut dst, &src).is_err());
}

#[test]
fn over_in_place_blends_only_covered_pixels() {
    let mut dst = Canvas::from_premul(2, 1, vec![50, 50, 50, 255, 50, 50, 50, 255]).unwrap();
    let src = Canvas::from_premul(2, 1, vec![0, 0, 0, 0, 255, 255, 255, 255]).unwrap();
    over_in_place(&mut dst, &src).unwrap();
    assert_eq!(dst.pixel(0, 0), Some([50, 50, 50, 255]));
    assert_eq!(dst.pixel(1, 0), Some([255, 255, 255, 255]));
}

#[test]
fn fill_row_over_darkens_row() {
    let mut row = vec![200u8, 200, 200, 255, 100, 100, 100, 255];
    fill_row_over(&mut row, [0, 0, 0, 128]);
    assert!(row[0] < 200 && row[4] < 100);
    assert_eq!(row[3], 255);
}

#[test]
fn blend_toward_weight_extremes() {
    let mut a = vec![10u8, 20, 30, 255];
    blend_toward_in_place(&mut a, &[110, 120, 130, 255], 0).unwrap();
    assert_eq!(a, vec![10, 20, 30, 255]);
    blend_toward_in_place(&mut a, &[110, 120, 130, 255], 255).unwrap();
    assert_eq!(a, vec![110, 120, 130, 255]);
    assert!(blend_toward_in_place(&mut a, &[1, 2], 10).is_err());
}
