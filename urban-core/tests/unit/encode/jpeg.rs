use super::*;

#[test]
fn flatten_unpremultiplies_and_drops_alpha() {
    let canvas = Canvas::from_premul(3, 1, vec![10, 20, 30, 255, 64, 32, 0, 128, 9, 9, 9, 0])
        .unwrap();
    let rgb = flatten_to_rgb8(&canvas);
    assert_eq!(&rgb[0..3], &[10, 20, 30]);
    assert_eq!(&rgb[3..6], &[128, 64, 0]);
    assert_eq!(&rgb[6..9], &[0, 0, 0]);
}

#[test]
fn encodes_decodable_jpeg_with_same_dimensions() {
    let canvas =
        Canvas::from_premul(24, 16, [200u8, 100, 50, 255].repeat(24 * 16)).unwrap();
    let bytes = encode_jpeg(&canvas, DEFAULT_JPEG_QUALITY).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (24, 16));
}

#[test]
fn encoding_is_deterministic() {
    let canvas = Canvas::from_premul(8, 8, (0..256).map(|i| i as u8).collect()).unwrap();
    let a = encode_jpeg(&canvas, 95).unwrap();
    let b = encode_jpeg(&canvas, 95).unwrap();
    assert_eq!(a, b);
}

#[test]
fn lower_quality_is_not_larger_on_noise() {
    let bytes: Vec<u8> = (0..64 * 64 * 4)
        .map(|i: u32| if i % 4 == 3 { 255 } else { (i.wrapping_mul(2654435761) >> 24) as u8 })
        .collect();
    let canvas = Canvas::from_premul(64, 64, bytes).unwrap();
    let high = encode_jpeg(&canvas, 95).unwrap();
    let low = encode_jpeg(&canvas, 20).unwrap();
    assert!(low.len() < high.len());
}
