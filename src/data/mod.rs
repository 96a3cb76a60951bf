// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything between the raw corpus file and tensor batches.
//
//   corpus.tsv
//       │
//       ▼
//   TsvCorpusLoader     → (source, "ssss destination eeee") pairs
//       │
//       ▼
//   Preprocessor        → lowercase words, punctuation removed
//       │
//       ▼
//   SequencePreparer    → vocabulary, reversing, max length,
//       │                 padding/truncation
//       ▼
//   TranslationDataset  → encoder input, decoder input/target
//       │
//       ▼
//   TranslationBatcher  → Int tensors for the training loop
//
// The pretrained embedding table sits beside this chain: it is
// read once and turned into the encoder's initial embedding weights.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads the tab-separated parallel corpus
pub mod loader;

/// Splits sentences into lowercase words
pub mod preprocessor;

/// Word ↔ id mapping
pub mod vocabulary;

/// Pad/truncate helpers and the max length statistic
pub mod padding;

/// Text ↔ fixed-width token rows
pub mod sequence_preparer;

/// GloVe table and embedding matrix initialisation
pub mod embeddings;

/// Implements Burn's Dataset trait for translation samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
