use super::*;
use crate::foundation::error::UrbanError;
use crate::text::provider::MemoryFontProvider;
use std::sync::atomic::{AtomicUsize, Ordering};

struct CountingProvider {
    loads: Arc<AtomicUsize>,
}

impl FontProvider for CountingProvider {
    fn label(&self) -> String {
        "counting".to_string()
    }

    fn load(&self) -> UrbanResult<Arc<Vec<u8>>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Err(UrbanError::font("unavailable"))
    }
}

fn missing_everything() -> FontResolver {
    FontResolver::new(
        FontCatalog::with_default_entries(),
        "target/resolver_unit/no_such_dir",
        file_providers(&["target/resolver_unit/missing-a.ttf", "target/resolver_unit/missing-b.ttc"]),
    )
}

fn fixture_font_bytes() -> Vec<u8> {
    std::fs::read("tests/data/fonts/DejaVuSansMono.ttf").unwrap()
}

#[test]
fn exhausted_chain_returns_builtin_font() {
    let mut resolver = missing_everything();
    let mut shaper = TextShaper::new();
    let font = resolver.resolve(Some("noto_sans"), 59, &mut shaper);
    assert!(font.is_builtin());
}

#[test]
fn unknown_selector_is_not_an_error() {
    let mut resolver = missing_everything();
    let mut shaper = TextShaper::new();
    assert!(resolver.resolve(Some("comic_sans"), 48, &mut shaper).is_builtin());
    assert!(resolver.resolve(None, 48, &mut shaper).is_builtin());
}

#[test]
fn garbage_bytes_advance_the_chain() {
    let mut resolver = missing_everything()
        .with_catalog_provider(
            "noto_sans",
            Arc::new(MemoryFontProvider::new("junk-catalog", b"nope".to_vec())),
        )
        .with_fallback_providers(vec![Arc::new(MemoryFontProvider::new(
            "junk-fallback",
            b"also nope".to_vec(),
        )) as Arc<dyn FontProvider>]);
    let mut shaper = TextShaper::new();
    assert!(resolver.resolve(Some("noto_sans"), 64, &mut shaper).is_builtin());
}

#[test]
fn failed_sources_are_not_reloaded() {
    let loads = Arc::new(AtomicUsize::new(0));
    let mut resolver = missing_everything().with_fallback_providers(vec![Arc::new(
        CountingProvider {
            loads: loads.clone(),
        },
    ) as Arc<dyn FontProvider>]);
    let mut shaper = TextShaper::new();
    let _ = resolver.resolve(None, 59, &mut shaper);
    let _ = resolver.resolve(None, 29, &mut shaper);
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[test]
fn catalog_override_serves_embedded_font() {
    let bytes = fixture_font_bytes();
    let mut resolver = missing_everything()
        .with_catalog_provider("noto_sans", Arc::new(MemoryFontProvider::new("embedded", bytes)));
    let mut shaper = TextShaper::new();
    let font = resolver.resolve(Some("noto_sans"), 59, &mut shaper);
    assert!(!font.is_builtin());
    assert_eq!(font.source(), "embedded");
    assert_eq!(font.size_px(), 59.0);

    let brand = resolver.resolve(Some("noto_sans"), 29, &mut shaper);
    assert_eq!(brand.size_px(), 29.0);
}
