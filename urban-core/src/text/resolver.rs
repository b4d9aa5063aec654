use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use crate::foundation::config::EngineConfig;
use crate::foundation::error::UrbanResult;
use crate::text::builtin::BuiltinFont;
use crate::text::catalog::FontCatalog;
use crate::text::provider::{FileFontProvider, FontProvider, file_providers};
use crate::text::shaper::{OutlineFont, ResolvedFont, TextShaper};

/// Maps a font selector to a usable font at a pixel size.
///
/// Candidates are tried in order: the catalog entry named by the selector, then every fallback
/// provider, then the built-in bitmap face. Loaded bytes are kept for the lifetime of the
/// resolver and sources that failed once are not retried.
pub struct FontResolver {
    catalog: FontCatalog,
    fonts_dir: PathBuf,
    catalog_overrides: HashMap<String, Arc<dyn FontProvider>>,
    fallbacks: Vec<Arc<dyn FontProvider>>,
    loaded: HashMap<String, Arc<Vec<u8>>>,
    failed: HashSet<String>,
}

impl FontResolver {
    pub fn new(
        catalog: FontCatalog,
        fonts_dir: impl Into<PathBuf>,
        fallbacks: Vec<Arc<dyn FontProvider>>,
    ) -> Self {
        Self {
            catalog,
            fonts_dir: fonts_dir.into(),
            catalog_overrides: HashMap::new(),
            fallbacks,
            loaded: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    /// Resolver over the configured catalog and system fallback paths.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.fonts.clone(),
            config.fonts_dir.clone(),
            file_providers(&config.system_fallbacks),
        )
    }

    /// Replace the fallback chain.
    pub fn with_fallback_providers(mut self, providers: Vec<Arc<dyn FontProvider>>) -> Self {
        self.fallbacks = providers;
        self
    }

    /// Serve a catalog key from `provider` instead of its file under the fonts directory.
    pub fn with_catalog_provider(
        mut self,
        key: impl Into<String>,
        provider: Arc<dyn FontProvider>,
    ) -> Self {
        self.catalog_overrides.insert(key.into(), provider);
        self
    }

    pub fn catalog(&self) -> &FontCatalog {
        &self.catalog
    }

    fn catalog_candidate(&self, key: &str) -> Option<Arc<dyn FontProvider>> {
        if let Some(p) = self.catalog_overrides.get(key) {
            return Some(p.clone());
        }
        let path = self.catalog.path_for(key, &self.fonts_dir)?;
        Some(Arc::new(FileFontProvider::new(path)) as Arc<dyn FontProvider>)
    }

    fn try_load(
        &mut self,
        provider: &dyn FontProvider,
        size_px: u32,
        shaper: &mut TextShaper,
    ) -> UrbanResult<OutlineFont> {
        let label = provider.label();
        let bytes = match self.loaded.get(&label) {
            Some(b) => b.clone(),
            None => {
                let b = provider.load()?;
                self.loaded.insert(label.clone(), b.clone());
                b
            }
        };
        shaper.register(&label, bytes)?;
        shaper.outline_font(&label, size_px as f32)
    }

    fn attempt(
        &mut self,
        provider: &dyn FontProvider,
        size_px: u32,
        shaper: &mut TextShaper,
    ) -> Option<OutlineFont> {
        let label = provider.label();
        if self.failed.contains(&label) {
            return None;
        }
        match self.try_load(provider, size_px, shaper) {
            Ok(font) => Some(font),
            Err(e) => {
                tracing::debug!(source = %label, error = %e, "font candidate failed");
                self.failed.insert(label);
                None
            }
        }
    }

    /// Resolve `selector` at `size_px`. Never fails.
    pub fn resolve(
        &mut self,
        selector: Option<&str>,
        size_px: u32,
        shaper: &mut TextShaper,
    ) -> ResolvedFont {
        if let Some(key) = selector {
            match self.catalog_candidate(key) {
                Some(provider) => {
                    if let Some(font) = self.attempt(provider.as_ref(), size_px, shaper) {
                        let name = self
                            .catalog
                            .get(key)
                            .map(|e| e.display_name.as_str())
                            .unwrap_or(key);
                        tracing::info!(font = name, size_px, "loaded catalog font");
                        return ResolvedFont::Outline(font);
                    }
                    tracing::warn!(
                        key,
                        source = %provider.label(),
                        "catalog font failed to load, trying fallbacks"
                    );
                }
                None => {
                    tracing::debug!(key, "unknown font key, trying fallbacks");
                }
            }
        }

        let fallbacks = self.fallbacks.clone();
        for provider in &fallbacks {
            if let Some(font) = self.attempt(provider.as_ref(), size_px, shaper) {
                tracing::info!(source = %font.source, size_px, "using fallback font");
                return ResolvedFont::Outline(font);
            }
        }

        tracing::warn!(size_px, "no font could be loaded, using built-in font");
        ResolvedFont::Builtin(BuiltinFont::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/resolver.rs"]
mod tests;
