use crate::foundation::core::Canvas;
use crate::foundation::error::{UrbanError, UrbanResult};

/// Kernel half-width covering three standard deviations.
pub fn kernel_radius_for(sigma: f32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    (sigma * 3.0).ceil() as u32
}

/// Gaussian-blur rows `first_row..height` of a premultiplied canvas.
///
/// Returns only that band (`(height - first_row) * width * 4` bytes). Source rows within the
/// kernel radius above the band are read so the result equals a full-image blur restricted to
/// the band. Edges clamp.
pub fn blur_band_rgba8_premul(
    canvas: &Canvas,
    first_row: u32,
    radius: u32,
    sigma: f32,
) -> UrbanResult<Vec<u8>> {
    let (width, height) = canvas.dimensions();
    if first_row >= height || width == 0 {
        return Ok(Vec::new());
    }
    let stride = width as usize * 4;
    let src = canvas.as_bytes();
    let band = &src[first_row as usize * stride..];
    if radius == 0 {
        return Ok(band.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let top = first_row.saturating_sub(radius);
    let source = &src[top as usize * stride..];
    let source_rows = height - top;

    let mut tmp = vec![0u8; source.len()];
    horizontal_pass(source, &mut tmp, width, source_rows, &kernel);

    let mut out = vec![0u8; band.len()];
    vertical_pass(
        &tmp,
        &mut out,
        width,
        source_rows,
        first_row - top,
        &kernel,
    );
    Ok(out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> UrbanResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(UrbanError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(UrbanError::render("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, rows: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..rows as i32 {
        let row = (y * w) as usize;
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = (row + sx as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = (row + x as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

/// Vertical pass writing rows `skip..rows` of `src` into `dst`.
fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, rows: u32, skip: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = rows as i32;
    for y in skip as i32..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = (((y - skip as i32) * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
