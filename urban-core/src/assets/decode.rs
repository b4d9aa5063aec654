use crate::foundation::core::Canvas;
use crate::foundation::error::{UrbanError, UrbanResult};

/// Largest edge the vector rasterizer accepts.
pub const MAX_EDGE_PX: u32 = u16::MAX as u32;

/// Decode encoded image bytes (JPEG, PNG or WebP) into a premultiplied canvas.
pub fn decode_image(bytes: &[u8]) -> UrbanResult<Canvas> {
    if bytes.is_empty() {
        return Err(UrbanError::decode("image bytes are empty"));
    }
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| UrbanError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(UrbanError::decode("image has no pixels"));
    }
    if width > MAX_EDGE_PX || height > MAX_EDGE_PX {
        return Err(UrbanError::decode(format!(
            "image {width}x{height} exceeds {MAX_EDGE_PX}px per edge"
        )));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    Canvas::from_premul(width, height, rgba8_premul)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
