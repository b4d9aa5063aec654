use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
use crate::foundation::error::{UrbanError, UrbanResult};
use crate::text::shaper::ShapedText;

/// Draws vector shapes and glyph runs into one transparent, canvas-sized layer.
pub struct LayerPainter {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
}

impl LayerPainter {
    pub fn new(width: u32, height: u32) -> UrbanResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| UrbanError::render("layer width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| UrbanError::render("layer height exceeds u16"))?;
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            width: w,
            height: h,
        })
    }

    fn set_color(&mut self, color: Rgba8) {
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(
                color.r, color.g, color.b, color.a,
            ));
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        if rect.area() <= 0.0 || color.a == 0 {
            return;
        }
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.set_color(color);
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    /// Stroke a straight segment with butt caps.
    pub fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba8) {
        if width <= 0.0 || color.a == 0 {
            return;
        }
        let mut path = vello_cpu::kurbo::BezPath::new();
        path.move_to(point_to_cpu(from));
        path.line_to(point_to_cpu(to));

        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(width).with_caps(vello_cpu::kurbo::Cap::Butt),
        );
        self.set_color(color);
        self.ctx.stroke_path(&path);
    }

    /// Fill shaped text with its line box's top-left corner at `origin`.
    pub fn fill_text(&mut self, shaped: &ShapedText, origin: Point, color: Rgba8) {
        if shaped.is_empty() || color.a == 0 {
            return;
        }
        match shaped {
            ShapedText::Outline {
                font,
                size_px,
                glyphs,
                ..
            } => {
                self.ctx
                    .set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
                self.set_color(color);
                self.ctx
                    .glyph_run(font)
                    .font_size(*size_px)
                    .fill_glyphs(glyphs.iter().copied());
            }
            ShapedText::Bitmap { font, text, .. } => {
                for cell in font.cell_rects(text, origin.x, origin.y) {
                    self.fill_rect(cell, color);
                }
            }
        }
    }

    /// Outline shaped text; the stroke extends `outset` pixels outside each glyph edge.
    pub fn stroke_text(&mut self, shaped: &ShapedText, origin: Point, outset: f64, color: Rgba8) {
        if shaped.is_empty() || outset <= 0.0 || color.a == 0 {
            return;
        }
        match shaped {
            ShapedText::Outline {
                font,
                size_px,
                glyphs,
                ..
            } => {
                self.ctx
                    .set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
                self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(outset * 2.0));
                self.set_color(color);
                self.ctx
                    .glyph_run(font)
                    .font_size(*size_px)
                    .stroke_glyphs(glyphs.iter().copied());
            }
            ShapedText::Bitmap { font, text, .. } => {
                for cell in font.cell_rects(text, origin.x, origin.y) {
                    self.fill_rect(cell.inflate(outset, outset), color);
                }
            }
        }
    }

    /// Rasterize everything drawn so far into a premultiplied canvas.
    pub fn finish(mut self) -> UrbanResult<Canvas> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        Canvas::from_premul(
            u32::from(self.width),
            u32::from(self.height),
            pixmap.data_as_u8_slice().to_vec(),
        )
    }
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
