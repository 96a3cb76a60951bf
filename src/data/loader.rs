// ============================================================
// Layer 4 - Parallel Corpus Loader
// ============================================================
// Reads a tab-separated parallel corpus, one pair per line:
//
//   Go.<TAB>Git.
//   Hi.<TAB>Merhaba.
//   Run!<TAB>Koş!<TAB>CC-BY 2.0 (France) Attribution: ...
//
// Only the first two fields are used; anything after them
// (attribution columns in the Tatoeba/Anki exports) is ignored.
// Every destination sentence is wrapped in the start/end markers
// the decoder relies on.
//
// Lines without a tab are skipped with a warning rather than
// aborting the whole load.

use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use crate::domain::sentence_pair::SentencePair;
use crate::domain::traits::CorpusSource;

/// Loads sentence pairs from a `source<TAB>destination` file.
pub struct TsvCorpusLoader {
    path:      PathBuf,
    /// Stop after this many pairs (handy for quick experiments)
    max_pairs: Option<usize>,
}

impl TsvCorpusLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), max_pairs: None }
    }

    pub fn with_max_pairs(mut self, max_pairs: Option<usize>) -> Self {
        self.max_pairs = max_pairs;
        self
    }

    /// Parse pairs from any buffered reader.
    pub fn read_pairs<R: BufRead>(&self, reader: R) -> Result<Vec<SentencePair>> {
        let mut pairs   = Vec::new();
        let mut skipped = 0usize;

        for (line_no, line) in reader.lines().enumerate() {
            if self.max_pairs.is_some_and(|max| pairs.len() >= max) {
                break;
            }

            let line = line.with_context(|| format!("Cannot read line {}", line_no + 1))?;
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }

            let mut fields = line.split('\t');
            match (fields.next(), fields.next()) {
                (Some(src), Some(dest)) => pairs.push(SentencePair::with_markers(src, dest)),
                _ => {
                    skipped += 1;
                    tracing::warn!("Skipping line {}: no tab separator", line_no + 1);
                }
            }
        }

        if skipped > 0 {
            tracing::warn!("Skipped {} malformed lines", skipped);
        }
        Ok(pairs)
    }
}

impl CorpusSource for TsvCorpusLoader {
    fn load_pairs(&self) -> Result<Vec<SentencePair>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Cannot open corpus '{}'", self.path.display()))?;

        let pairs = self.read_pairs(BufReader::new(file))?;
        tracing::info!("Loaded {} sentence pairs from '{}'", pairs.len(), self.path.display());
        Ok(pairs)
    }
}
