use crate::effects::blur::{blur_band_rgba8_premul, kernel_radius_for};
use crate::effects::composite::{blend_toward_in_place, fill_row_over, over_in_place};
use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
use crate::foundation::error::UrbanResult;
use crate::foundation::math::scale_trunc;
use crate::layout::plan::LayoutPlan;
use crate::render::raster::LayerPainter;
use crate::text::shaper::{MeasureText, ResolvedFont, ShapedText, TextShaper};

/// Watermark text.
pub const BRAND_TEXT: &str = "URBAN";

pub const GOLD: Rgba8 = Rgba8::new(215, 175, 85, 255);
pub const GRADIENT_COLOR: Rgba8 = Rgba8::new(8, 10, 25, 255);
pub const BLUR_PEAK_ALPHA: u8 = 80;
pub const ACCENT_ALPHA: u8 = 220;
pub const BRAND_ALPHA: u8 = 150;
pub const ORNAMENT_ALPHA: u8 = 100;
pub const SHADOW_COLOR: Rgba8 = Rgba8::new(0, 0, 0, 100);
pub const OUTLINE_COLOR: Rgba8 = Rgba8::new(0, 0, 0, 160);
pub const TEXT_COLOR: Rgba8 = Rgba8::new(255, 255, 255, 255);

/// The compositing stages, in the order they are applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    Blur,
    Gradient,
    Accent,
    Text,
    Brand,
    Ornament,
}

impl LayerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blur => "blur",
            Self::Gradient => "gradient",
            Self::Accent => "accent",
            Self::Text => "text",
            Self::Brand => "brand",
            Self::Ornament => "ornament",
        }
    }
}

pub type LayerFn = fn(Canvas, &Scene) -> UrbanResult<Canvas>;

/// Every stage as a pure `Canvas -> Canvas` function.
pub const LAYER_STACK: [(LayerKind, LayerFn); 6] = [
    (LayerKind::Blur, blur_layer),
    (LayerKind::Gradient, gradient_layer),
    (LayerKind::Accent, accent_layer),
    (LayerKind::Text, text_layer),
    (LayerKind::Brand, brand_layer),
    (LayerKind::Ornament, ornament_layer),
];

/// A caption line shaped and positioned on the canvas.
#[derive(Clone, Debug)]
pub struct SceneLine {
    pub origin: Point,
    pub shaped: ShapedText,
}

/// Everything the layers need, prepared before compositing starts.
#[derive(Clone, Debug)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub plan: LayoutPlan,
    pub lines: Vec<SceneLine>,
    pub brand: SceneLine,
    pub gradient_peak_alpha: u8,
}

impl Scene {
    /// Shape the placed lines and the watermark for a `width x height` canvas.
    pub fn prepare(
        width: u32,
        height: u32,
        plan: LayoutPlan,
        font: &ResolvedFont,
        brand_font: &ResolvedFont,
        shaper: &mut TextShaper,
        gradient_peak_alpha: u8,
    ) -> UrbanResult<Self> {
        let mut lines = Vec::with_capacity(plan.placed.len());
        for placed in &plan.placed {
            lines.push(SceneLine {
                origin: Point::new(f64::from(placed.x), f64::from(placed.y)),
                shaped: shaper.shape(font, &placed.text)?,
            });
        }

        let brand_width = shaper.measure(brand_font, BRAND_TEXT);
        let brand = SceneLine {
            origin: brand_origin(width, height, plan.margin_right, brand_width),
            shaped: shaper.shape(brand_font, BRAND_TEXT)?,
        };

        Ok(Self {
            width,
            height,
            plan,
            lines,
            brand,
            gradient_peak_alpha,
        })
    }
}

/// Run every stage of [`LAYER_STACK`] in order.
pub fn composite_layers(mut canvas: Canvas, scene: &Scene) -> UrbanResult<Canvas> {
    for (kind, layer) in LAYER_STACK {
        tracing::debug!(layer = kind.as_str(), "compositing layer");
        canvas = layer(canvas, scene)?;
    }
    Ok(canvas)
}

pub fn blur_start(height: u32) -> u32 {
    scale_trunc(height, 0.5).max(0) as u32
}

pub fn blur_radius(width: u32) -> u32 {
    (width / 500).max(3)
}

/// Blur mask alpha for row `y`: a linear ramp from 0 at `start` toward 80 at the bottom edge.
pub fn blur_mask_alpha(y: u32, start: u32, height: u32) -> u8 {
    if y < start || height <= start {
        return 0;
    }
    let p = f64::from(y - start) / f64::from(height - start);
    (p * f64::from(BLUR_PEAK_ALPHA)) as u8
}

pub fn gradient_start(height: u32) -> u32 {
    scale_trunc(height, 0.3).max(0) as u32
}

/// Gradient alpha for row `y`, eased with `p^3`.
pub fn gradient_alpha(y: u32, start: u32, height: u32, peak: u8) -> u8 {
    if y < start || height <= start {
        return 0;
    }
    let p = f64::from(y - start) / f64::from(height - start);
    (p * p * p * f64::from(peak)) as u8
}

/// Gold bar beside the text block and the square cap above it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccentGeometry {
    pub bar: Rect,
    pub cap: Rect,
}

pub fn accent_geometry(width: u32, plan: &LayoutPlan) -> AccentGeometry {
    let bar_width = f64::from((width / 200).max(5));
    let line_x = f64::from(plan.margin_left - scale_trunc(width, 0.035));
    let y_start = f64::from(plan.y_start);
    let block = bar_width * 3.0;

    // Corners are inclusive pixel coordinates, hence the +1 on the far edges.
    AccentGeometry {
        bar: Rect::new(
            line_x,
            y_start,
            line_x + bar_width + 1.0,
            y_start + f64::from(plan.total_height) + 1.0,
        ),
        cap: Rect::new(
            line_x - bar_width,
            y_start - block - bar_width,
            line_x + block + 1.0,
            y_start - bar_width + 1.0,
        ),
    }
}

pub fn shadow_offset(font_size: u32) -> f64 {
    f64::from((font_size / 20).max(3))
}

pub fn outline_width(font_size: u32) -> f64 {
    f64::from((font_size / 30).max(2))
}

/// Top-left of the watermark: right-aligned to the right margin, 3.5% of the height above the
/// bottom edge.
pub fn brand_origin(width: u32, height: u32, margin_right: i32, brand_width: f32) -> Point {
    let x = f64::from(width as i32 - margin_right) - f64::from(brand_width);
    let y = f64::from(height as i32 - scale_trunc(height, 0.035));
    Point::new(x, y)
}

/// The two ornament segments as `(from, to)` pairs plus the stroke width.
pub fn ornament_segments(width: u32) -> ([(Point, Point); 2], f64) {
    let corner = f64::from(scale_trunc(width, 0.05));
    let len = f64::from(scale_trunc(width, 0.12));
    let stroke = f64::from((width / 500).max(2));
    let anchor = Point::new(f64::from(width) - corner, corner);
    (
        [
            (anchor, Point::new(anchor.x, corner + len)),
            (anchor, Point::new(anchor.x - len, corner)),
        ],
        stroke,
    )
}

fn blur_layer(mut canvas: Canvas, _scene: &Scene) -> UrbanResult<Canvas> {
    let (width, height) = canvas.dimensions();
    let start = blur_start(height);
    if start >= height {
        return Ok(canvas);
    }

    let sigma = blur_radius(width) as f32;
    let blurred = blur_band_rgba8_premul(&canvas, start, kernel_radius_for(sigma), sigma)?;
    let stride = width as usize * 4;
    for y in start..height {
        let weight = blur_mask_alpha(y, start, height);
        if weight == 0 {
            continue;
        }
        let offset = (y - start) as usize * stride;
        blend_toward_in_place(canvas.row_mut(y), &blurred[offset..offset + stride], weight)?;
    }
    Ok(canvas)
}

fn gradient_layer(mut canvas: Canvas, scene: &Scene) -> UrbanResult<Canvas> {
    let height = canvas.height();
    let start = gradient_start(height);
    for y in start..height {
        let alpha = gradient_alpha(y, start, height, scene.gradient_peak_alpha);
        if alpha == 0 {
            continue;
        }
        let color = GRADIENT_COLOR.with_alpha(alpha).premul().to_array();
        fill_row_over(canvas.row_mut(y), color);
    }
    Ok(canvas)
}

fn paint_over(
    mut canvas: Canvas,
    draw: impl FnOnce(&mut LayerPainter),
) -> UrbanResult<Canvas> {
    let mut painter = LayerPainter::new(canvas.width(), canvas.height())?;
    draw(&mut painter);
    let layer = painter.finish()?;
    over_in_place(&mut canvas, &layer)?;
    Ok(canvas)
}

fn accent_layer(canvas: Canvas, scene: &Scene) -> UrbanResult<Canvas> {
    let geometry = accent_geometry(scene.width, &scene.plan);
    let gold = GOLD.with_alpha(ACCENT_ALPHA);
    paint_over(canvas, |p| {
        p.fill_rect(geometry.bar, gold);
        p.fill_rect(geometry.cap, gold);
    })
}

fn text_layer(canvas: Canvas, scene: &Scene) -> UrbanResult<Canvas> {
    if scene.lines.iter().all(|l| l.shaped.is_empty()) {
        return Ok(canvas);
    }
    let offset = shadow_offset(scene.plan.font_size);
    let outline = outline_width(scene.plan.font_size);
    paint_over(canvas, |p| {
        for line in &scene.lines {
            let shadow = Point::new(line.origin.x + offset, line.origin.y + offset);
            p.fill_text(&line.shaped, shadow, SHADOW_COLOR);
            p.stroke_text(&line.shaped, line.origin, outline, OUTLINE_COLOR);
            p.fill_text(&line.shaped, line.origin, TEXT_COLOR);
        }
    })
}

fn brand_layer(canvas: Canvas, scene: &Scene) -> UrbanResult<Canvas> {
    let color = GOLD.with_alpha(BRAND_ALPHA);
    paint_over(canvas, |p| {
        p.fill_text(&scene.brand.shaped, scene.brand.origin, color);
    })
}

fn ornament_layer(canvas: Canvas, scene: &Scene) -> UrbanResult<Canvas> {
    let (segments, stroke) = ornament_segments(scene.width);
    let color = GOLD.with_alpha(ORNAMENT_ALPHA);
    paint_over(canvas, |p| {
        for (from, to) in segments {
            p.stroke_line(from, to, stroke, color);
        }
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/layers.rs"]
mod tests;
