// ============================================================
// Layer 6 - Sequence Preparer Store
// ============================================================
// Persists the source and destination SequencePreparers next
// to the checkpoint so `translate` reuses exactly the
// vocabulary and max lengths the model was trained with.
//
// Only the vocabulary word lists, max lengths and padding
// settings are written; the padded training corpus is not.
//
//   checkpoints/
//     source_preparer.json
//     dest_preparer.json

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::data::sequence_preparer::SequencePreparer;

const SOURCE_FILE: &str = "source_preparer.json";
const DEST_FILE:   &str = "dest_preparer.json";

pub struct PreparerStore {
    dir: PathBuf,
}

impl PreparerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn save(&self, source: &SequencePreparer, dest: &SequencePreparer) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;
        self.write(SOURCE_FILE, source)?;
        self.write(DEST_FILE, dest)?;
        tracing::info!("Saved sequence preparers to '{}'", self.dir.display());
        Ok(())
    }

    /// Load `(source, dest)` preparers.
    pub fn load(&self) -> Result<(SequencePreparer, SequencePreparer)> {
        Ok((self.read(SOURCE_FILE)?, self.read(DEST_FILE)?))
    }

    fn write(&self, name: &str, preparer: &SequencePreparer) -> Result<()> {
        let path = self.dir.join(name);
        fs::write(&path, serde_json::to_string(preparer)?)
            .with_context(|| format!("Cannot write '{}'", path.display()))
    }

    fn read(&self, name: &str) -> Result<SequencePreparer> {
        let path = self.dir.join(name);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'. Have you run 'train' first?", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed preparer file '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::padding::Side;

    #[test]
    fn test_save_and_load_preparers() {
        let dir = std::env::temp_dir().join(format!("nmt-seq2seq-preparers-{}", std::process::id()));
        let store = PreparerStore::new(&dir);

        let src  = SequencePreparer::new(&["hello world", "hello"], Side::Pre, true, None).unwrap();
        let dest = SequencePreparer::new(&["ssss merhaba dünya eeee", "ssss merhaba eeee"], Side::Post, false, None).unwrap();
        store.save(&src, &dest).unwrap();

        let (src_back, dest_back) = store.load().unwrap();
        assert_eq!(src_back.max_length(), src.max_length());
        assert!(src_back.reverse());
        assert_eq!(dest_back.padding(), Side::Post);
        assert_eq!(dest_back.marker_ids(), Ok((1, 2)));
        assert_eq!(dest_back.vocabulary(), dest.vocabulary());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_zero_max_length_file_is_rejected() {
        let dir = std::env::temp_dir().join(format!("nmt-seq2seq-preparers-zero-{}", std::process::id()));
        let store = PreparerStore::new(&dir);

        let src = SequencePreparer::new(&["hello world"], Side::Pre, true, None).unwrap();
        store.save(&src, &src).unwrap();
        fs::write(
            dir.join(DEST_FILE),
            r#"{"vocabulary":[],"max_length":0,"padding":"post","reverse":false}"#,
        )
        .unwrap();

        let err = store.load().unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("dest_preparer.json"), "{msg}");
        assert!(msg.contains("max length is zero"), "{msg}");

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_duplicate_vocabulary_word_is_rejected() {
        let dir = std::env::temp_dir().join(format!("nmt-seq2seq-preparers-dup-{}", std::process::id()));
        let store = PreparerStore::new(&dir);

        let src = SequencePreparer::new(&["hello world"], Side::Pre, true, None).unwrap();
        store.save(&src, &src).unwrap();
        fs::write(
            dir.join(SOURCE_FILE),
            r#"{"vocabulary":["hello","hello"],"max_length":2,"padding":"pre","reverse":true}"#,
        )
        .unwrap();

        let msg = format!("{:#}", store.load().unwrap_err());
        assert!(msg.contains("more than once"), "{msg}");

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_load_from_empty_dir_fails() {
        let store = PreparerStore::new("/definitely/not/a/checkpoint/dir");
        assert!(store.load().is_err());
    }
}
