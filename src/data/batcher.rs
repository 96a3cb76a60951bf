// ============================================================
// Layer 4 - Translation Batcher
// ============================================================
// Implements Burn's Batcher trait to stack TranslationSamples
// into tensors.
//
// How batching works here:
//   Input:  Vec of N samples, encoder rows of width S and
//           decoder rows of width T
//   Output: encoder_input [N, S], decoder_input/target [N, T]
//
// All rows are already padded by the SequencePreparer, so the
// batcher only flattens and reshapes.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::TranslationSample;

// ─── TranslationBatch ─────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct TranslationBatch<B: Backend> {
    /// Reversed, pre-padded source rows: [batch_size, source_len]
    pub encoder_input: Tensor<B, 2, Int>,

    /// Destination rows without the last column: [batch_size, target_len]
    pub decoder_input: Tensor<B, 2, Int>,

    /// Destination rows without the first column: [batch_size, target_len]
    pub decoder_target: Tensor<B, 2, Int>,
}

// ─── TranslationBatcher ───────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct TranslationBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> TranslationBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// Flatten rows into one Int tensor of shape [rows, width].
    fn stack(&self, rows: Vec<&[u32]>) -> Tensor<B, 2, Int> {
        let batch_size = rows.len();
        let width      = rows.first().map_or(0, |r| r.len());

        // Burn uses i32 for Int tensor data
        let flat: Vec<i32> = rows
            .iter()
            .flat_map(|r| r.iter().map(|&x| x as i32))
            .collect();

        Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([batch_size, width])
    }
}

impl<B: Backend> Batcher<TranslationSample, TranslationBatch<B>> for TranslationBatcher<B> {
    fn batch(&self, items: Vec<TranslationSample>) -> TranslationBatch<B> {
        let encoder_input  = self.stack(items.iter().map(|s| s.encoder_input.as_slice()).collect());
        let decoder_input  = self.stack(items.iter().map(|s| s.decoder_input.as_slice()).collect());
        let decoder_target = self.stack(items.iter().map(|s| s.decoder_target.as_slice()).collect());

        TranslationBatch { encoder_input, decoder_input, decoder_target }
    }
}
