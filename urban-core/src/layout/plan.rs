use crate::foundation::math::scale_trunc;
use crate::text::shaper::{MeasureText, ResolvedFont};

/// Lines never extend into this many pixels above the bottom edge.
pub const BOTTOM_GUARD_PX: i32 = 20;

/// One wrapped line with its top-left position on the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedLine {
    /// Index into [`LayoutPlan::lines`].
    pub index: usize,
    pub text: String,
    pub x: i32,
    pub y: i32,
}

/// Wrapped caption and its geometry for one image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutPlan {
    pub font_size: u32,
    /// Every wrapped line, including ones that did not fit.
    pub lines: Vec<String>,
    pub margin_left: i32,
    pub margin_right: i32,
    pub max_width: i32,
    pub line_height: i32,
    /// `line_height * lines.len()`.
    pub total_height: i32,
    /// Top of the text block; the block's bottom sits 7% of the height above the bottom edge.
    pub y_start: i32,
    /// Lines that fit inside `[0, image_height - BOTTOM_GUARD_PX]`, in order.
    pub placed: Vec<PlacedLine>,
    /// True when at least one line was dropped.
    pub truncated: bool,
}

impl LayoutPlan {
    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    pub fn drawn_lines(&self) -> usize {
        self.placed.len()
    }
}

/// Greedy character wrap against measured widths.
///
/// Input is split on `\n`; a paragraph holding only whitespace becomes one empty line. A single
/// character wider than `max_width` still gets a line of its own.
///
/// A prefix never measures narrower than a shorter prefix, so each break is located with a
/// galloping search: `O(log n)` measurements per line instead of one per character.
pub fn wrap_text(
    text: &str,
    font: &ResolvedFont,
    max_width: f32,
    measurer: &mut dyn MeasureText,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let bounds: Vec<usize> = paragraph
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(paragraph.len()))
            .collect();
        let char_count = bounds.len() - 1;

        let mut start = 0;
        while start < char_count {
            let mut fits = |end: usize| {
                measurer.measure(font, &paragraph[bounds[start]..bounds[end]]) <= max_width
            };

            let mut good = start;
            let mut bad = None;
            let mut step = 1;
            while good < char_count {
                let end = (good + step).min(char_count);
                if fits(end) {
                    good = end;
                    step *= 2;
                } else {
                    bad = Some(end);
                    break;
                }
            }
            if let Some(mut bad) = bad {
                while bad - good > 1 {
                    let mid = good + (bad - good) / 2;
                    if fits(mid) {
                        good = mid;
                    } else {
                        bad = mid;
                    }
                }
            }

            let end = if good == start { start + 1 } else { good };
            lines.push(paragraph[bounds[start]..bounds[end]].to_string());
            start = end;
        }
    }
    lines
}

/// Wrap `text` and position it for a `image_width x image_height` canvas.
pub fn plan_layout(
    text: &str,
    font: &ResolvedFont,
    font_size: u32,
    image_width: u32,
    image_height: u32,
    measurer: &mut dyn MeasureText,
) -> LayoutPlan {
    let margin_left = scale_trunc(image_width, 0.08);
    let margin_right = scale_trunc(image_width, 0.08);
    let max_width = image_width as i32 - margin_left - margin_right;

    let lines = wrap_text(text, font, max_width as f32, measurer);

    let line_height = scale_trunc(font_size, 1.5);
    let total_height = line_height.saturating_mul(lines.len() as i32);
    let bottom_margin = scale_trunc(image_height, 0.07);
    let y_start = (image_height as i32)
        .saturating_sub(bottom_margin)
        .saturating_sub(total_height);

    let limit = image_height as i32 - BOTTOM_GUARD_PX;
    let mut placed = Vec::with_capacity(lines.len());
    let mut truncated = false;
    let mut y = y_start;
    for (index, line) in lines.iter().enumerate() {
        if y.saturating_add(line_height) > limit {
            truncated = true;
            break;
        }
        if y < 0 {
            truncated = true;
        } else {
            placed.push(PlacedLine {
                index,
                text: line.clone(),
                x: margin_left,
                y,
            });
        }
        y = y.saturating_add(line_height);
    }

    LayoutPlan {
        font_size,
        lines,
        margin_left,
        margin_right,
        max_width,
        line_height,
        total_height,
        y_start,
        placed,
        truncated,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/plan.rs"]
mod tests;
