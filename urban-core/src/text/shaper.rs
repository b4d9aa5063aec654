use std::collections::HashMap;
use std::sync::Arc;

use crate::foundation::error::{UrbanError, UrbanResult};
use crate::text::builtin::BuiltinFont;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

#[derive(Clone)]
/// A loaded outline font at one pixel size.
pub struct OutlineFont {
    /// Family name registered with the shaper.
    pub family: String,
    /// Provider label the bytes came from.
    pub source: String,
    /// Requested pixel size.
    pub size_px: f32,
    /// Font bytes in the form the rasterizer consumes.
    pub font_data: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for OutlineFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineFont")
            .field("family", &self.family)
            .field("source", &self.source)
            .field("size_px", &self.size_px)
            .finish()
    }
}

/// Font handle owned by one render call.
#[derive(Clone, Debug)]
pub enum ResolvedFont {
    /// A catalog or system font that loaded successfully.
    Outline(OutlineFont),
    /// The built-in bitmap face; ignores the requested size.
    Builtin(BuiltinFont),
}

impl ResolvedFont {
    pub fn size_px(&self) -> f32 {
        match self {
            Self::Outline(f) => f.size_px,
            Self::Builtin(b) => b.size_px() as f32,
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin(_))
    }

    /// Where the face came from: a provider label, or `builtin`.
    pub fn source(&self) -> &str {
        match self {
            Self::Outline(f) => &f.source,
            Self::Builtin(_) => "builtin",
        }
    }

    pub fn family(&self) -> &str {
        match self {
            Self::Outline(f) => &f.family,
            Self::Builtin(_) => "builtin",
        }
    }
}

/// Exact rendered advance width of a string in a resolved font.
pub trait MeasureText {
    /// Width in pixels of `text` set on one line.
    fn measure(&mut self, font: &ResolvedFont, text: &str) -> f32;
}

/// Glyphs positioned relative to the line's top-left corner.
#[derive(Clone)]
pub enum ShapedText {
    /// Outline glyphs with baseline-relative positions ready for the rasterizer.
    Outline {
        font: vello_cpu::peniko::FontData,
        size_px: f32,
        glyphs: Vec<vello_cpu::Glyph>,
        width: f32,
    },
    /// Built-in bitmap text, drawn cell by cell.
    Bitmap {
        font: BuiltinFont,
        text: String,
        width: f32,
    },
}

impl ShapedText {
    pub fn width(&self) -> f32 {
        match self {
            Self::Outline { width, .. } | Self::Bitmap { width, .. } => *width,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Outline { glyphs, .. } => glyphs.is_empty(),
            Self::Bitmap { text, .. } => text.trim().is_empty(),
        }
    }
}

impl std::fmt::Debug for ShapedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outline {
                size_px,
                glyphs,
                width,
                ..
            } => f
                .debug_struct("Outline")
                .field("size_px", size_px)
                .field("glyph_count", &glyphs.len())
                .field("width", width)
                .finish(),
            Self::Bitmap { text, width, .. } => f
                .debug_struct("Bitmap")
                .field("text", text)
                .field("width", width)
                .finish(),
        }
    }
}

struct RegisteredFace {
    font_ctx: parley::FontContext,
    family: String,
    font_data: vello_cpu::peniko::FontData,
}

/// Shapes and measures text with Parley.
///
/// Each font source gets its own font context, so a run can never fall back to a face other
/// than the one that was resolved.
pub struct TextShaper {
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    faces: HashMap<String, RegisteredFace>,
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextShaper {
    /// Construct a shaper with no registered fonts.
    pub fn new() -> Self {
        Self {
            layout_ctx: parley::LayoutContext::new(),
            faces: HashMap::new(),
        }
    }

    /// Register font bytes under `source` and return the primary family name.
    ///
    /// Fails with [`UrbanError::Font`] when the bytes hold no usable face.
    pub fn register(&mut self, source: &str, font_bytes: Arc<Vec<u8>>) -> UrbanResult<String> {
        if let Some(face) = self.faces.get(source) {
            return Ok(face.family.clone());
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| UrbanError::font(format!("no font families in '{source}'")))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| UrbanError::font(format!("font family in '{source}' has no name")))?
            .to_string();

        let font_data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font_bytes.to_vec()),
            0,
        );
        self.faces.insert(
            source.to_string(),
            RegisteredFace {
                font_ctx,
                family: family.clone(),
                font_data,
            },
        );
        Ok(family)
    }

    /// Build an [`OutlineFont`] for a registered source at `size_px`.
    pub fn outline_font(&self, source: &str, size_px: f32) -> UrbanResult<OutlineFont> {
        let face = self
            .faces
            .get(source)
            .ok_or_else(|| UrbanError::font(format!("font '{source}' was not registered")))?;
        Ok(OutlineFont {
            family: face.family.clone(),
            source: source.to_string(),
            size_px,
            font_data: face.font_data.clone(),
        })
    }

    fn layout_line(
        &mut self,
        font: &OutlineFont,
        text: &str,
    ) -> Option<parley::Layout<TextBrushRgba8>> {
        let face = self.faces.get_mut(&font.source)?;
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut face.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(face.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(
            TextBrushRgba8::default(),
        ));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Some(layout)
    }

    /// Shape one line of text. Outline glyph positions are relative to the line's top-left.
    pub fn shape(&mut self, font: &ResolvedFont, text: &str) -> UrbanResult<ShapedText> {
        match font {
            ResolvedFont::Builtin(b) => Ok(ShapedText::Bitmap {
                font: *b,
                text: text.to_string(),
                width: b.measure(text),
            }),
            ResolvedFont::Outline(f) => {
                let layout = self.layout_line(f, text).ok_or_else(|| {
                    UrbanError::font(format!("font '{}' was not registered", f.source))
                })?;
                let mut glyphs = Vec::new();
                for line in layout.lines() {
                    for item in line.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };
                        glyphs.extend(run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        }));
                    }
                }
                Ok(ShapedText::Outline {
                    font: f.font_data.clone(),
                    size_px: f.size_px,
                    glyphs,
                    width: layout.width(),
                })
            }
        }
    }
}

impl MeasureText for TextShaper {
    fn measure(&mut self, font: &ResolvedFont, text: &str) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        match font {
            ResolvedFont::Builtin(b) => b.measure(text),
            ResolvedFont::Outline(f) => self
                .layout_line(f, text)
                .map(|layout| layout.width())
                .unwrap_or(0.0),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/shaper.rs"]
mod tests;
