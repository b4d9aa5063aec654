pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// `value * ratio` truncated toward zero, the rounding every layout constant uses.
pub(crate) fn scale_trunc(value: u32, ratio: f64) -> i32 {
    (f64::from(value) * ratio) as i32
}

/// Linear interpolation between two u8 channels by an 8-bit weight.
pub(crate) fn lerp_u8(a: u8, b: u8, w: u8) -> u8 {
    let w = u16::from(w);
    let inv = 255 - w;
    (((u32::from(a) * u32::from(inv)) + (u32::from(b) * u32::from(w)) + 127) / 255) as u8
}
