use crate::foundation::core::Canvas;
use crate::foundation::error::{UrbanError, UrbanResult};
use crate::foundation::math::{lerp_u8, mul_div255_u8};

pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over for premultiplied pixels, with an extra 8-bit opacity on `src`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: u8) -> PremulRgba8 {
    if opacity == 0 || src[3] == 0 {
        return dst;
    }

    let op = u16::from(opacity);
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Composite a same-size layer over `dst`.
pub fn over_in_place(dst: &mut Canvas, src: &Canvas) -> UrbanResult<()> {
    if dst.dimensions() != src.dimensions() {
        return Err(UrbanError::render(format!(
            "layer {}x{} does not match canvas {}x{}",
            src.width(),
            src.height(),
            dst.width(),
            dst.height()
        )));
    }
    for (d, s) in dst
        .as_bytes_mut()
        .chunks_exact_mut(4)
        .zip(src.as_bytes().chunks_exact(4))
    {
        if s[3] == 0 {
            continue;
        }
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], 255);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite one premultiplied color over every pixel of a row.
pub fn fill_row_over(row: &mut [u8], color: PremulRgba8) {
    if color[3] == 0 {
        return;
    }
    for d in row.chunks_exact_mut(4) {
        let out = over([d[0], d[1], d[2], d[3]], color, 255);
        d.copy_from_slice(&out);
    }
}

/// Move every channel of `dst` toward `src` by `weight / 255` (mask composite).
pub fn blend_toward_in_place(dst: &mut [u8], src: &[u8], weight: u8) -> UrbanResult<()> {
    if dst.len() != src.len() {
        return Err(UrbanError::render(
            "blend_toward_in_place expects equal-length buffers",
        ));
    }
    if weight == 0 {
        return Ok(());
    }
    for (d, s) in dst.iter_mut().zip(src) {
        *d = lerp_u8(*d, *s, weight);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
