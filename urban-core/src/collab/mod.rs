//! Seams for the external caption services and the flow that runs them before a render.
//!
//! Network-backed implementations live outside this crate; [`StaticRecommender`] and
//! [`TruncatingShortener`] are deterministic stand-ins.

use crate::foundation::config::EngineConfig;
use crate::foundation::error::UrbanResult;
use crate::text::catalog::FontCatalog;

/// Usage context passed to the recommender when the caller gives none.
pub const DEFAULT_SCENE: &str = "社群貼文";

/// Picks a catalog key for a caption.
pub trait FontRecommender: Send + Sync {
    /// May return any string; unknown keys are replaced by the default key.
    fn recommend_font(&self, text: &str, scene: &str) -> UrbanResult<String>;
}

/// Condenses long captions to something that fits on an image.
pub trait CaptionShortener: Send + Sync {
    fn shorten(&self, text: &str) -> UrbanResult<String>;
}

/// Always recommends the same key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticRecommender {
    key: String,
}

impl StaticRecommender {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl FontRecommender for StaticRecommender {
    fn recommend_font(&self, _text: &str, _scene: &str) -> UrbanResult<String> {
        Ok(self.key.clone())
    }
}

/// Keeps the first `max_chars` characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TruncatingShortener {
    max_chars: usize,
}

impl TruncatingShortener {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl CaptionShortener for TruncatingShortener {
    fn shorten(&self, text: &str) -> UrbanResult<String> {
        Ok(text.chars().take(self.max_chars).collect())
    }
}

/// Caption text and font key ready to hand to the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedCaption {
    pub text: String,
    pub font_key: String,
    pub shortened: bool,
    pub recommended: bool,
}

/// One line per catalog entry, the listing a recommender chooses from.
pub fn catalog_listing(catalog: &FontCatalog) -> String {
    catalog
        .iter()
        .map(|(key, e)| {
            format!(
                "- {key}: {}（風格：{}，適合：{}）",
                e.display_name, e.style, e.best_for
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Shorten an over-long caption and pick its font.
///
/// Text longer than `config.shorten_threshold_chars` characters goes through `shortener` and is
/// trimmed. An explicit `selector` is kept as given; otherwise the recommender is asked, and its
/// answer (trimmed and lowercased) falls back to `config.default_font_key` when the catalog does
/// not know it or the recommender fails.
pub fn prepare_caption(
    text: &str,
    selector: Option<&str>,
    scene: Option<&str>,
    config: &EngineConfig,
    recommender: &dyn FontRecommender,
    shortener: &dyn CaptionShortener,
) -> UrbanResult<PreparedCaption> {
    let (text, shortened) = if text.chars().count() > config.shorten_threshold_chars {
        (shortener.shorten(text)?.trim().to_string(), true)
    } else {
        (text.to_string(), false)
    };

    if let Some(key) = selector {
        return Ok(PreparedCaption {
            text,
            font_key: key.to_string(),
            shortened,
            recommended: false,
        });
    }

    let scene = scene.unwrap_or(DEFAULT_SCENE);
    let font_key = match recommender.recommend_font(&text, scene) {
        Ok(raw) => {
            let key = raw.trim().to_lowercase();
            if config.fonts.contains(&key) {
                tracing::info!(key = %key, "recommended font");
                key
            } else {
                tracing::warn!(key = %key, "recommended font key is unknown, using default");
                config.default_font_key.clone()
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "font recommendation failed, using default");
            config.default_font_key.clone()
        }
    };

    Ok(PreparedCaption {
        text,
        font_key,
        shortened,
        recommended: true,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/collab/prepare.rs"]
mod tests;
