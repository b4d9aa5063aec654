use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One typeface the engine can be asked for by key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontEntry {
    /// Human-facing family name.
    pub display_name: String,
    /// Font file name, relative to the configured fonts directory.
    pub file: String,
    /// Free-form style tag (used when recommending a font).
    pub style: String,
    /// Free-form tag describing which captions the face suits.
    pub best_for: String,
}

/// Catalog entry as exposed to callers that list or recommend fonts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FontDescription {
    pub key: String,
    pub display_name: String,
    pub style: String,
    pub best_for: String,
}

/// Static mapping `font_key -> FontEntry`.
///
/// Keys are kept sorted so listings and recommendation prompts are stable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontCatalog {
    entries: BTreeMap<String, FontEntry>,
}

impl FontCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two Traditional Chinese faces the service ships with.
    pub fn with_default_entries() -> Self {
        let mut catalog = Self::new();
        catalog.insert(
            "noto_sans",
            FontEntry {
                display_name: "Noto Sans TC".to_string(),
                file: "NotoSansTC-Variable.ttf".to_string(),
                style: "現代、乾淨、專業".to_string(),
                best_for: "財商觀點、專業形象、清單體、長文".to_string(),
            },
        );
        catalog.insert(
            "noto_serif",
            FontEntry {
                display_name: "Noto Serif TC".to_string(),
                file: "NotoSerifTC-Variable.ttf".to_string(),
                style: "典雅、文藝、有質感".to_string(),
                best_for: "金句、心靈雞湯、文青風、限動標語".to_string(),
            },
        );
        catalog
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: FontEntry) {
        self.entries.insert(key.into(), entry);
    }

    pub fn get(&self, key: &str) -> Option<&FontEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FontEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Backing file for `key` inside `fonts_dir`.
    pub fn path_for(&self, key: &str, fonts_dir: &Path) -> Option<PathBuf> {
        self.get(key).map(|entry| fonts_dir.join(&entry.file))
    }

    pub fn describe(&self, key: &str) -> Option<FontDescription> {
        self.get(key).map(|entry| FontDescription {
            key: key.to_string(),
            display_name: entry.display_name.clone(),
            style: entry.style.clone(),
            best_for: entry.best_for.clone(),
        })
    }

    pub fn describe_all(&self) -> Vec<FontDescription> {
        self.keys().filter_map(|key| self.describe(key)).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/catalog.rs"]
mod tests;
