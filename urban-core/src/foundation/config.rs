use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{UrbanError, UrbanResult};
use crate::text::catalog::FontCatalog;

/// Environment variable that overrides [`EngineConfig::fonts_dir`].
pub const FONTS_DIR_ENV: &str = "URBAN_FONTS_DIR";

/// Engine configuration: font catalog, fallback chain and output policy.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Directory holding the catalog's font files.
    pub fonts_dir: PathBuf,
    /// Catalog key used when a recommendation is missing or invalid.
    pub default_font_key: String,
    /// Known fonts by key.
    pub fonts: FontCatalog,
    /// System font files tried in order when the selected font is unavailable.
    pub system_fallbacks: Vec<PathBuf>,
    /// JPEG quality, 1..=100.
    pub jpeg_quality: u8,
    /// Peak alpha of the bottom gradient when no overlay opacity is requested.
    pub gradient_peak_alpha: u8,
    /// Captions longer than this many characters are shortened before rendering.
    pub shorten_threshold_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fonts_dir: PathBuf::from("fonts"),
            default_font_key: "noto_sans".to_string(),
            fonts: FontCatalog::with_default_entries(),
            system_fallbacks: vec![
                PathBuf::from("/System/Library/Fonts/PingFang.ttc"),
                PathBuf::from("/usr/share/fonts/opentype/noto/NotoSansCJK-Bold.ttc"),
                PathBuf::from("/usr/share/fonts/noto-cjk/NotoSansCJK-Bold.ttc"),
            ],
            jpeg_quality: 95,
            gradient_peak_alpha: 220,
            shorten_threshold_chars: 30,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> UrbanResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| UrbanError::config(format!("parse engine config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a configuration from a JSON file on disk, then apply environment overrides.
    pub fn from_path(path: impl AsRef<Path>) -> UrbanResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            UrbanError::config(format!("open engine config '{}': {e}", path.display()))
        })?;
        Ok(Self::from_reader(BufReader::new(f))?.with_env_overrides())
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides looked up through `var`.
    pub fn with_overrides_from(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = var(FONTS_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.fonts_dir = PathBuf::from(dir);
        }
        self
    }

    pub fn validate(&self) -> UrbanResult<()> {
        if !self.fonts.contains(&self.default_font_key) {
            return Err(UrbanError::config(format!(
                "default_font_key '{}' is not in the font catalog",
                self.default_font_key
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(UrbanError::config("jpeg_quality must be in 1..=100"));
        }
        if self.shorten_threshold_chars == 0 {
            return Err(UrbanError::config("shorten_threshold_chars must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
