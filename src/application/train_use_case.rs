// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load sentence pairs        (Layer 4 - data)
//   Step 2: Build sequence preparers   (Layer 4 - data)
//   Step 3: Save preparers             (Layer 6 - infra)
//   Step 4: Build embedding matrix     (Layer 4 - data)
//   Step 5: Save configs               (Layer 6 - infra)
//   Step 6: Build dataset              (Layer 4 - data)
//   Step 7: Run training loop          (Layer 5 - ml)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::TranslationDataset,
    embeddings::{embedding_matrix, EmbeddingTable},
    loader::TsvCorpusLoader,
    padding::Side,
    sequence_preparer::SequencePreparer,
};
use crate::domain::traits::CorpusSource;
use crate::infra::{checkpoint::CheckpointManager, preparer_store::PreparerStore};
use crate::ml::{model::Seq2SeqConfig, trainer::run_training};

/// GloVe 100d vectors, used unless another file is given.
pub const DEFAULT_EMBEDDINGS: &str = "data/glove.6B.100d.txt";

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Saved next to the checkpoint as train_config.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub corpus_path:     String,
    /// GloVe text file; `None` means purely random source embeddings
    pub embeddings_path: Option<String>,
    pub checkpoint_dir:  String,
    pub epochs:          usize,
    pub batch_size:      usize,
    pub lr:              f64,
    pub embed_dim:       usize,
    pub state_size:      usize,
    /// Keep only the most frequent words of each language
    pub num_words:       Option<usize>,
    /// Read at most this many pairs from the corpus
    pub max_pairs:       Option<usize>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            corpus_path:     "data/tur.txt".to_string(),
            embeddings_path: Some(DEFAULT_EMBEDDINGS.to_string()),
            checkpoint_dir:  "checkpoints".to_string(),
            epochs:          15,
            batch_size:      128,
            lr:              1e-3,
            embed_dim:       100,
            state_size:      256,
            num_words:       None,
            max_pairs:       None,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load sentence pairs ──────────────────────────────────────
        let loader = TsvCorpusLoader::new(&cfg.corpus_path).with_max_pairs(cfg.max_pairs);
        let pairs  = loader.load_pairs()?;
        tracing::info!("Loaded {} sentence pairs from '{}'", pairs.len(), cfg.corpus_path);

        // ── Step 2: Build sequence preparers ─────────────────────────────────
        let (source, dest) = build_preparers(
            pairs.iter().map(|p| p.source.as_str()),
            pairs.iter().map(|p| p.destination.as_str()),
            cfg.num_words,
        )?;

        // ── Step 3: Save preparers for translation ───────────────────────────
        PreparerStore::new(&cfg.checkpoint_dir).save(&source, &dest)?;

        // ── Step 4: Source embedding matrix ──────────────────────────────────
        let table = cfg
            .embeddings_path
            .as_deref()
            .map(EmbeddingTable::load)
            .transpose()?;
        if table.is_none() {
            tracing::warn!("No embedding file given, source embeddings start random");
        }
        let matrix = embedding_matrix(
            source.vocabulary(),
            table.as_ref(),
            cfg.embed_dim,
            &mut rand::thread_rng(),
        )?;

        // ── Step 5: Save configs ─────────────────────────────────────────────
        let model_cfg = Seq2SeqConfig::new(
            source.vocab_size(),
            dest.vocab_size(),
            cfg.embed_dim,
            cfg.state_size,
        );
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir)?;
        ckpt_manager.save_model_config(&model_cfg)?;
        ckpt_manager.save_train_config(cfg)?;

        // ── Step 6: Dataset ──────────────────────────────────────────────────
        let dataset = TranslationDataset::from_padded(source.tokens_padded(), dest.tokens_padded());
        tracing::info!("Built {} training samples", dataset.sample_count());

        // ── Step 7: Train (Layer 5) ──────────────────────────────────────────
        run_training(cfg, &model_cfg, &matrix, dataset, &ckpt_manager)
    }
}

/// Source side is reversed and pre-padded; destination side keeps
/// word order and is post-padded.
pub fn build_preparers<'a>(
    sources:      impl Iterator<Item = &'a str>,
    destinations: impl Iterator<Item = &'a str>,
    num_words:    Option<usize>,
) -> Result<(SequencePreparer, SequencePreparer)> {
    let sources: Vec<&str>      = sources.collect();
    let destinations: Vec<&str> = destinations.collect();

    let source = SequencePreparer::new(&sources, Side::Pre, true, num_words)
        .context("Cannot build source sequence preparer")?;
    let dest = SequencePreparer::new(&destinations, Side::Post, false, num_words)
        .context("Cannot build destination sequence preparer")?;

    dest.marker_ids().context("Destination vocabulary is missing a sentence marker")?;
    Ok((source, dest))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ConfigurationError;
    use crate::domain::sentence_pair::SentencePair;

    #[test]
    fn test_default_config_matches_reference_hyperparameters() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.epochs, 15);
        assert_eq!(cfg.batch_size, 128);
        assert_eq!(cfg.embed_dim, 100);
        assert_eq!(cfg.state_size, 256);
        assert!((cfg.lr - 1e-3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_build_preparers_sides() {
        let pairs = vec![
            SentencePair::with_markers("Go.", "Git."),
            SentencePair::with_markers("I won!", "Kazandım!"),
        ];
        let (source, dest) = build_preparers(
            pairs.iter().map(|p| p.source.as_str()),
            pairs.iter().map(|p| p.destination.as_str()),
            None,
        )
        .unwrap();

        assert!(source.reverse());
        assert_eq!(source.padding(), Side::Pre);
        assert!(!dest.reverse());
        assert_eq!(dest.padding(), Side::Post);
        assert_eq!(dest.marker_ids(), Ok((1, 2)));
    }

    #[test]
    fn test_build_preparers_rejects_empty_corpus() {
        let err = build_preparers(std::iter::empty(), std::iter::empty(), None).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigurationError>(),
            Some(&ConfigurationError::EmptyCorpus)
        );
    }

    #[test]
    fn test_build_preparers_requires_markers() {
        let err = build_preparers(["hello"].into_iter(), ["merhaba"].into_iter(), None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigurationError>(),
            Some(ConfigurationError::MissingMarker(_))
        ));
    }
}
