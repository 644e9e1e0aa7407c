//! Test fixtures for golden-file assertions
//!
//! - Flatten corpus (bundle name, dedup flag, expected options)
//! - Aggregate manifest the corpus resolves against

use std::path::{Path, PathBuf};

use optbundle::AggregateOption;

/// Directory holding the fixtures
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Path to the flatten corpus
pub fn flatten_corpus_path() -> PathBuf {
    fixtures_dir().join("flatten_corpus.json")
}

/// One flatten case from flatten_corpus.json
#[derive(Debug, Clone, serde::Deserialize)]
pub struct FlattenCase {
    pub id: String,
    pub bundle: String,
    pub dedup: bool,
    pub expected: Vec<AggregateOption>,
}

/// Full flatten corpus
#[derive(Debug, Clone, serde::Deserialize)]
pub struct FlattenCorpus {
    /// Manifest path, relative to the fixtures directory
    pub manifest: String,
    pub cases: Vec<FlattenCase>,
}

impl FlattenCorpus {
    pub fn load() -> Result<Self, String> {
        let contents = std::fs::read_to_string(flatten_corpus_path())
            .map_err(|e| format!("Failed to read corpus: {}", e))?;
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse corpus: {}", e))
    }

    pub fn manifest_path(&self) -> PathBuf {
        fixtures_dir().join(&self.manifest)
    }
}
