//! Urban turns a photo and a short caption into a finished editorial-style image.
//!
//! One call to [`render`] (or [`OverlayEngine::render_with_report`]) runs a fixed pipeline:
//!
//! 1. **Decode** the input bytes into a premultiplied [`Canvas`].
//! 2. **Size** the caption from the image width and text length ([`font_size_for`]).
//! 3. **Resolve** a font through the catalog, the system fallbacks and finally the built-in face
//!    ([`FontResolver`]).
//! 4. **Plan** the layout: greedy character wrap against measured glyph widths, anchored above
//!    the bottom edge ([`plan_layout`]).
//! 5. **Composite** six layers in order: blur, gradient, accent, text, brand, ornament
//!    ([`LAYER_STACK`]).
//! 6. **Encode** an opaque JPEG ([`encode_jpeg`]).
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: identical inputs produce identical bytes.
//! - **No IO while compositing**: fonts are loaded and text shaped before the first layer runs.
//! - **Premultiplied RGBA8** between stages; alpha is dropped only by the encoder.
//! - **No shared state between calls**: an [`OverlayEngine`] is configuration only.
#![forbid(unsafe_code)]

mod assets;
mod collab;
mod effects;
mod encode;
mod foundation;
mod layout;
mod render;
mod text;

pub use assets::decode::{MAX_EDGE_PX, decode_image};
pub use collab::{
    CaptionShortener, DEFAULT_SCENE, FontRecommender, PreparedCaption, StaticRecommender,
    TruncatingShortener, catalog_listing, prepare_caption,
};
pub use effects::blur::{blur_band_rgba8_premul, kernel_radius_for};
pub use effects::composite::{PremulRgba8, blend_toward_in_place, fill_row_over, over, over_in_place};
pub use encode::jpeg::{DEFAULT_JPEG_QUALITY, encode_jpeg};
pub use foundation::config::{EngineConfig, FONTS_DIR_ENV};
pub use foundation::core::{Canvas, Point, Rect, Rgba8, Rgba8Premul};
pub use foundation::error::{UrbanError, UrbanResult};
pub use layout::plan::{BOTTOM_GUARD_PX, LayoutPlan, PlacedLine, plan_layout, wrap_text};
pub use layout::sizing::{MAX_FONT_PX, MIN_FONT_PX, brand_size_for, font_size_for};
pub use render::layers::{
    AccentGeometry, BRAND_TEXT, LAYER_STACK, LayerFn, LayerKind, Scene, SceneLine,
    accent_geometry, blur_mask_alpha, blur_radius, blur_start, brand_origin, composite_layers,
    gradient_alpha, gradient_start, ornament_segments, outline_width, shadow_offset,
};
pub use render::pipeline::{
    OverlayEngine, RenderOutput, RenderReport, RenderRequest, SYSTEM_FONT_NAME, render,
};
pub use render::raster::LayerPainter;
pub use text::builtin::BuiltinFont;
pub use text::catalog::{FontCatalog, FontDescription, FontEntry};
pub use text::provider::{FileFontProvider, FontProvider, MemoryFontProvider, file_providers};
pub use text::resolver::FontResolver;
pub use text::shaper::{
    MeasureText, OutlineFont, ResolvedFont, ShapedText, TextBrushRgba8, TextShaper,
};
