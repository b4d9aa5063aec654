use std::sync::Arc;

use serde::Serialize;

use crate::assets::decode::decode_image;
use crate::encode::jpeg::encode_jpeg;
use crate::foundation::config::EngineConfig;
use crate::foundation::core::Canvas;
use crate::foundation::error::{UrbanError, UrbanResult};
use crate::layout::plan::plan_layout;
use crate::layout::sizing::{brand_size_for, font_size_for};
use crate::render::layers::{Scene, composite_layers};
use crate::text::provider::FontProvider;
use crate::text::resolver::FontResolver;
use crate::text::shaper::TextShaper;

/// Name reported when the selector is not a catalog key.
pub const SYSTEM_FONT_NAME: &str = "系統預設";

/// One overlay job.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderRequest {
    /// Encoded input photo.
    pub image: Vec<u8>,
    /// Caption; `\n` starts a new paragraph.
    pub text: String,
    /// Catalog key; `None` goes straight to the system fallbacks.
    pub font: Option<String>,
    /// Main text size in pixels, replacing the size policy. Must be positive.
    pub font_size: Option<u32>,
    /// Peak alpha of the darkening gradient.
    pub overlay_opacity: Option<u8>,
}

impl RenderRequest {
    pub fn new(image: impl Into<Vec<u8>>, text: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_font(mut self, key: impl Into<String>) -> Self {
        self.font = Some(key.into());
        self
    }

    pub fn with_font_size(mut self, size_px: u32) -> Self {
        self.font_size = Some(size_px);
        self
    }

    pub fn with_overlay_opacity(mut self, alpha: u8) -> Self {
        self.overlay_opacity = Some(alpha);
        self
    }
}

/// What a render produced, for logging and callers that care about truncation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderReport {
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
    /// Catalog display name, or [`SYSTEM_FONT_NAME`].
    pub font_name: String,
    /// Provider label of the face actually used, or `builtin`.
    pub font_source: String,
    pub builtin_font: bool,
    pub total_lines: usize,
    pub drawn_lines: usize,
    /// True when lines were dropped because they did not fit vertically.
    pub truncated: bool,
}

/// Encoded image plus its [`RenderReport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOutput {
    pub bytes: Vec<u8>,
    pub report: RenderReport,
}

/// Reusable renderer. Holds configuration only; every call owns its fonts and buffers, so one
/// engine can serve concurrent calls.
#[derive(Clone)]
pub struct OverlayEngine {
    config: EngineConfig,
    fallbacks: Option<Vec<Arc<dyn FontProvider>>>,
    catalog_providers: Vec<(String, Arc<dyn FontProvider>)>,
}

impl std::fmt::Debug for OverlayEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayEngine")
            .field("config", &self.config)
            .field(
                "fallbacks",
                &self
                    .fallbacks
                    .as_ref()
                    .map(|v| v.iter().map(|p| p.label()).collect::<Vec<_>>()),
            )
            .finish()
    }
}

impl OverlayEngine {
    pub fn new(config: EngineConfig) -> UrbanResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fallbacks: None,
            catalog_providers: Vec::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the configured system font paths with `providers`.
    pub fn with_fallback_providers(mut self, providers: Vec<Arc<dyn FontProvider>>) -> Self {
        self.fallbacks = Some(providers);
        self
    }

    /// Serve catalog `key` from `provider` instead of the fonts directory.
    pub fn with_catalog_provider(
        mut self,
        key: impl Into<String>,
        provider: Arc<dyn FontProvider>,
    ) -> Self {
        self.catalog_providers.push((key.into(), provider));
        self
    }

    fn resolver(&self) -> FontResolver {
        let mut resolver = FontResolver::from_config(&self.config);
        if let Some(fallbacks) = &self.fallbacks {
            resolver = resolver.with_fallback_providers(fallbacks.clone());
        }
        for (key, provider) in &self.catalog_providers {
            resolver = resolver.with_catalog_provider(key.clone(), provider.clone());
        }
        resolver
    }

    /// Render and encode, discarding the report.
    pub fn render(&self, request: &RenderRequest) -> UrbanResult<Vec<u8>> {
        Ok(self.render_with_report(request)?.bytes)
    }

    /// Render and encode one request.
    #[tracing::instrument(skip(self, request), fields(text_chars = request.text.chars().count()))]
    pub fn render_with_report(&self, request: &RenderRequest) -> UrbanResult<RenderOutput> {
        let (canvas, report) = self.compose(request)?;
        let bytes = encode_jpeg(&canvas, self.config.jpeg_quality)?;
        tracing::info!(
            width = report.width,
            height = report.height,
            font = %report.font_name,
            font_size = report.font_size,
            lines = report.total_lines,
            truncated = report.truncated,
            "overlay rendered"
        );
        Ok(RenderOutput { bytes, report })
    }

    /// Run every stage except encoding.
    pub fn compose(&self, request: &RenderRequest) -> UrbanResult<(Canvas, RenderReport)> {
        if request.font_size == Some(0) {
            return Err(UrbanError::validation("font_size override must be > 0"));
        }

        let canvas = decode_image(&request.image)?;
        let (width, height) = canvas.dimensions();
        let font_size = request
            .font_size
            .unwrap_or_else(|| font_size_for(width, request.text.chars().count()));
        tracing::debug!(width, height, font_size, "decoded input");

        let mut shaper = TextShaper::new();
        let mut resolver = self.resolver();
        let font = resolver.resolve(request.font.as_deref(), font_size, &mut shaper);
        let plan = plan_layout(&request.text, &font, font_size, width, height, &mut shaper);
        if plan.truncated {
            tracing::debug!(
                total = plan.total_lines(),
                drawn = plan.drawn_lines(),
                "caption lines dropped"
            );
        }

        let brand_font = resolver.resolve(None, brand_size_for(font_size), &mut shaper);
        let peak = request
            .overlay_opacity
            .unwrap_or(self.config.gradient_peak_alpha);

        let report = RenderReport {
            width,
            height,
            font_size,
            font_name: request
                .font
                .as_deref()
                .and_then(|key| self.config.fonts.get(key))
                .map(|e| e.display_name.clone())
                .unwrap_or_else(|| SYSTEM_FONT_NAME.to_string()),
            font_source: font.source().to_string(),
            builtin_font: font.is_builtin(),
            total_lines: plan.total_lines(),
            drawn_lines: plan.drawn_lines(),
            truncated: plan.truncated,
        };

        let scene = Scene::prepare(width, height, plan, &font, &brand_font, &mut shaper, peak)?;
        let canvas = composite_layers(canvas, &scene)?;
        Ok((canvas, report))
    }
}

/// Render with the default configuration (plus environment overrides).
pub fn render(
    image_bytes: &[u8],
    text: &str,
    font_selector: Option<&str>,
    font_size_override: Option<u32>,
    overlay_opacity_override: Option<u8>,
) -> UrbanResult<Vec<u8>> {
    let engine = OverlayEngine::new(EngineConfig::default().with_env_overrides())?;
    engine.render(&RenderRequest {
        image: image_bytes.to_vec(),
        text: text.to_string(),
        font: font_selector.map(str::to_string),
        font_size: font_size_override,
        overlay_opacity: overlay_opacity_override,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
