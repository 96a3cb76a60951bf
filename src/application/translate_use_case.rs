// ============================================================
// Layer 2 - Translate Use Case
// ============================================================
// English sentence in, Turkish sentence out:
//   1. Source preparer turns the text into one reversed,
//      pre-padded token row
//   2. The model encodes the row into a thought vector
//   3. The greedy decoder emits destination words until the
//      end marker or the destination max length
//
// Preparers and model come from the checkpoint directory written
// by `train`.

use anyhow::{Context, Result};

use crate::data::sequence_preparer::SequencePreparer;
use crate::domain::{
    greedy_decoder::{GreedyDecoder, Translation},
    traits::{Seq2Seq, Translator},
};
use crate::infra::{checkpoint::CheckpointManager, preparer_store::PreparerStore};
use crate::ml::inferencer::{BurnTranslator, InferBackend};

pub struct TranslateUseCase<M: Seq2Seq> {
    source:  SequencePreparer,
    dest:    SequencePreparer,
    model:   M,
    decoder: GreedyDecoder,
}

impl TranslateUseCase<BurnTranslator<InferBackend>> {
    pub fn new(checkpoint_dir: &str) -> Result<Self> {
        let (source, dest) = PreparerStore::new(checkpoint_dir).load()?;
        let ckpt           = CheckpointManager::new(checkpoint_dir)?;
        match ckpt.load_train_config() {
            Ok(cfg) => tracing::info!("Checkpoint trained on '{}' for {} epochs", cfg.corpus_path, cfg.epochs),
            Err(e)  => tracing::warn!("No training config found: {e:#}"),
        }
        let model          = BurnTranslator::from_checkpoint(&ckpt)?;
        Self::from_parts(source, dest, model)
    }
}

impl<M: Seq2Seq> TranslateUseCase<M> {
    pub fn from_parts(source: SequencePreparer, dest: SequencePreparer, model: M) -> Result<Self> {
        let (start, end) = dest.marker_ids()?;
        let decoder      = GreedyDecoder::new(start, end, dest.max_length())?;
        Ok(Self { source, dest, model, decoder })
    }

    /// Full decoding result including the stop reason.
    pub fn translate_detailed(&self, text: &str) -> Result<Translation> {
        let padded = self.source.encode(text);
        let row    = padded.row(0).context("Source preparer produced no row")?;
        tracing::debug!("Source tokens: {:?}", row);

        let thought     = self.model.encode(row)?;
        let translation = self.decoder.decode(&self.model, &thought, &self.dest)?;
        tracing::info!(
            "Translated {} source words into {} tokens ({:?})",
            row.iter().filter(|&&t| t != 0).count(),
            translation.tokens.len(),
            translation.stop,
        );
        Ok(translation)
    }
}

impl<M: Seq2Seq> Translator for TranslateUseCase<M> {
    fn translate(&self, text: &str) -> Result<String> {
        Ok(self.translate_detailed(text)?.text)
    }
}
