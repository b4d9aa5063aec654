use crate::foundation::math::scale_trunc;

/// Smallest main text size in pixels.
pub const MIN_FONT_PX: u32 = 48;
/// Largest main text size in pixels.
pub const MAX_FONT_PX: u32 = 250;

/// Main text size for an image width and caption length in characters.
///
/// Short captions get a larger share of the width: 7% up to six characters, 5.5% up to twelve,
/// 4.5% otherwise. The truncated product is clamped to `[MIN_FONT_PX, MAX_FONT_PX]`.
pub fn font_size_for(image_width: u32, text_chars: usize) -> u32 {
    let ratio = match text_chars {
        0..=6 => 0.07,
        7..=12 => 0.055,
        _ => 0.045,
    };
    let base = scale_trunc(image_width, ratio).max(0) as u32;
    base.clamp(MIN_FONT_PX, MAX_FONT_PX)
}

/// Watermark size: half the main size, never below 28px.
pub fn brand_size_for(font_size: u32) -> u32 {
    (font_size / 2).max(28)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/sizing.rs"]
mod tests;
