use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{UrbanError, UrbanResult};

/// A source of font bytes in the resolver's fallback chain.
///
/// The filesystem chain is environment dependent; tests and embedding applications substitute
/// [`MemoryFontProvider`] to avoid that coupling.
pub trait FontProvider: Send + Sync {
    /// Label used in logs and render reports (usually a path).
    fn label(&self) -> String;

    /// Fetch the raw font file bytes.
    fn load(&self) -> UrbanResult<Arc<Vec<u8>>>;
}

/// Reads a font file from disk on every `load`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileFontProvider {
    path: PathBuf,
}

impl FileFontProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FontProvider for FileFontProvider {
    fn label(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> UrbanResult<Arc<Vec<u8>>> {
        let bytes = std::fs::read(&self.path).map_err(|e| {
            UrbanError::font(format!("read font '{}': {e}", self.path.display()))
        })?;
        if bytes.is_empty() {
            return Err(UrbanError::font(format!(
                "font file '{}' is empty",
                self.path.display()
            )));
        }
        Ok(Arc::new(bytes))
    }
}

/// Serves font bytes already held in memory.
#[derive(Clone, Debug)]
pub struct MemoryFontProvider {
    label: String,
    bytes: Arc<Vec<u8>>,
}

impl MemoryFontProvider {
    pub fn new(label: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            label: label.into(),
            bytes: Arc::new(bytes.into()),
        }
    }
}

impl FontProvider for MemoryFontProvider {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn load(&self) -> UrbanResult<Arc<Vec<u8>>> {
        if self.bytes.is_empty() {
            return Err(UrbanError::font(format!("font '{}' is empty", self.label)));
        }
        Ok(self.bytes.clone())
    }
}

/// Build the filesystem chain for a list of fallback paths.
pub fn file_providers<P: AsRef<Path>>(paths: &[P]) -> Vec<Arc<dyn FontProvider>> {
    paths
        .iter()
        .map(|p| Arc::new(FileFontProvider::new(p.as_ref())) as Arc<dyn FontProvider>)
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/text/provider.rs"]
mod tests;
