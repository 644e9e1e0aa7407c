//! Flatten corpus tests
//!
//! Every case resolves a bundle from the fixture manifest and compares the
//! flattened options against the golden expectation.

mod fixtures;

use fixtures::FlattenCorpus;
use optbundle::config::ResolveSettings;
use optbundle::{flatten_bundle, BundleManifest, Error, ManifestError};

fn load() -> (FlattenCorpus, BundleManifest) {
    let corpus = FlattenCorpus::load().expect("Failed to load corpus");
    let manifest =
        BundleManifest::from_file(&corpus.manifest_path()).expect("Failed to load manifest");
    (corpus, manifest)
}

#[test]
fn test_flatten_corpus() {
    let (corpus, manifest) = load();

    let mut failed = Vec::new();
    for case in &corpus.cases {
        let settings = ResolveSettings {
            dedup: case.dedup,
            max_depth: 64,
        };
        match flatten_bundle(&manifest, &case.bundle, &settings) {
            Ok(report) if report.options == case.expected => {}
            Ok(report) => {
                eprintln!("FAIL [{}]", case.id);
                eprintln!("  expected: {:?}", case.expected);
                eprintln!("  got:      {:?}", report.options);
                failed.push(case.id.clone());
            }
            Err(e) => {
                eprintln!("FAIL [{}]: {}", case.id, e);
                failed.push(case.id.clone());
            }
        }
    }

    assert!(failed.is_empty(), "corpus failures: {:?}", failed);
}

#[test]
fn test_corpus_covers_every_bundle_with_options() {
    let (corpus, manifest) = load();
    for name in ["chained", "nested", "doubly_nested", "two_nested"] {
        assert!(manifest.bundles.contains_key(name));
        assert!(corpus.cases.iter().any(|c| c.bundle == name && c.dedup));
        assert!(corpus.cases.iter().any(|c| c.bundle == name && !c.dedup));
    }
}

#[test]
fn test_resolve_all_fixture_bundles() {
    let (_, manifest) = load();
    let all = manifest.resolve_all().expect("fixture manifest resolves");
    assert_eq!(all.len(), manifest.bundles.len());
    assert!(all["empty"].is_empty());
    assert_eq!(all["extended"].len(), all["nested"].len() + 2);
}

#[test]
fn test_missing_bundle_reports_manifest_error() {
    let (_, manifest) = load();
    let settings = ResolveSettings {
        dedup: true,
        max_depth: 64,
    };
    let err = flatten_bundle(&manifest, "nope", &settings).unwrap_err();
    assert!(matches!(
        err,
        Error::Manifest(ManifestError::UnknownBundle { .. })
    ));
}
