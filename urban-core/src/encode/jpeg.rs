use anyhow::Context;

use crate::foundation::core::Canvas;
use crate::foundation::error::{UrbanError, UrbanResult};

/// Default output quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Flatten a premultiplied canvas to RGB and encode it as baseline JPEG.
///
/// Alpha is dropped after un-premultiplying, so an opaque canvas keeps its exact colors.
pub fn encode_jpeg(canvas: &Canvas, quality: u8) -> UrbanResult<Vec<u8>> {
    if canvas.is_empty() {
        return Err(UrbanError::encode("cannot encode an empty canvas"));
    }
    let quality = quality.clamp(1, 100);
    let rgb = flatten_to_rgb8(canvas);

    let mut out = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality);
    image::ImageEncoder::write_image(
        encoder,
        &rgb,
        canvas.width(),
        canvas.height(),
        image::ExtendedColorType::Rgb8,
    )
    .context("encode jpeg")?;
    Ok(out)
}

fn flatten_to_rgb8(canvas: &Canvas) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(canvas.as_bytes().len() / 4 * 3);
    for px in canvas.as_bytes().chunks_exact(4) {
        let a = u16::from(px[3]);
        match a {
            255 => rgb.extend_from_slice(&px[..3]),
            0 => rgb.extend_from_slice(&[0, 0, 0]),
            _ => {
                for &c in &px[..3] {
                    let v = (u16::from(c) * 255 + a / 2) / a;
                    rgb.push(v.min(255) as u8);
                }
            }
        }
    }
    rgb
}

#[cfg(test)]
#[path = "../../tests/unit/encode/jpeg.rs"]
mod tests;
