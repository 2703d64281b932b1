use planetvote::error::CatalogError;
use planetvote::kernel::catalog::{self, extension_id, BundleId, BUNDLE_COUNT};
use std::collections::HashSet;

#[test]
fn test_catalog_shape() {
    let bundles = catalog::bundles();
    assert_eq!(bundles.len(), BUNDLE_COUNT);

    for (index, bundle) in bundles.iter().enumerate() {
        assert_eq!(bundle.id as usize, index + 1);
        assert_eq!(bundle.extensions.len(), 3);
        assert!(!bundle.name.is_empty());
        assert!(!bundle.emoji.is_empty());
        for extension in &bundle.extensions {
            assert!(!extension.name.is_empty());
            assert!(!extension.id().is_empty());
        }
    }
}

#[test]
fn test_lookup_by_id() {
    for id in 1..=8 {
        assert_eq!(catalog::lookup(id).unwrap().id, id);
    }

    assert_eq!(catalog::lookup(0).unwrap_err(), CatalogError::UnknownBundle(0));
    assert_eq!(catalog::lookup(9).unwrap_err(), CatalogError::UnknownBundle(9));
}

#[test]
fn test_bundle_id_bounds() {
    assert!(BundleId::new(0).is_err());
    assert!(BundleId::new(9).is_err());
    assert_eq!(BundleId::try_from(4).unwrap().index(), 3);
    assert_eq!(BundleId::all().map(u8::from).collect::<Vec<_>>(), (1..=8).collect::<Vec<_>>());

    assert_eq!(serde_json::from_str::<BundleId>("3").unwrap().get(), 3);
    assert!(serde_json::from_str::<BundleId>("9").is_err());
}

#[test]
fn test_extension_id_table() {
    assert_eq!(extension_id("Azure Machine Learning"), "azure-ml");
    assert_eq!(extension_id("GitHub Copilot"), "github-copilot");
    assert_eq!(extension_id("Synthwave '84 Theme"), "synthwave-theme");
}

#[test]
fn test_extension_id_fallback() {
    assert_eq!(extension_id("Bracket Pair Colorizer"), "bracket-pair-colorizer");
    assert_eq!(extension_id("Error   Lens"), "error-lens");
    assert_eq!(extension_id(" Foo Bar"), "-foo-bar");
    assert_eq!(extension_id("Foo\tBar \n"), "foo-bar-");
    assert_eq!(extension_id("Prettier"), "prettier");
}

#[test]
fn test_distinct_extensions_have_unique_ids() {
    let extensions = catalog::distinct_extensions();
    let ids: HashSet<String> = extensions.iter().map(|e| e.id()).collect();
    assert_eq!(ids.len(), extensions.len());

    let total: usize = catalog::bundles().iter().map(|b| b.extensions.len()).sum();
    assert!(extensions.len() < total, "Copilot appears in several bundles");
}
