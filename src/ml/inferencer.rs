// ============================================================
// Layer 5 - Inferencer
// ============================================================
// Wraps a trained Seq2SeqModel behind the Seq2Seq trait so the
// greedy decoder can drive it without knowing about Burn.
use anyhow::{anyhow, bail, Result};
use burn::prelude::*;

use crate::domain::traits::Seq2Seq;
use crate::infra::checkpoint::{CheckpointLoad, CheckpointManager};
use crate::ml::model::Seq2SeqModel;

pub type InferBackend = burn::backend::Wgpu;

pub struct BurnTranslator<B: Backend> {
    model:      Seq2SeqModel<B>,
    state_size: usize,
    device:     B::Device,
}

impl<B: Backend> BurnTranslator<B> {
    pub fn new(model: Seq2SeqModel<B>, state_size: usize, device: B::Device) -> Self {
        Self { model, state_size, device }
    }

    fn int_row(&self, tokens: &[u32]) -> Tensor<B, 2, Int> {
        let flat: Vec<i32> = tokens.iter().map(|&x| x as i32).collect();
        Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([1, tokens.len()])
    }
}

impl BurnTranslator<InferBackend> {
    /// Rebuild the architecture from the saved config and load weights.
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager) -> Result<Self> {
        let device    = burn::backend::wgpu::WgpuDevice::default();
        let cfg       = ckpt_manager.load_model_config()?;
        let model: Seq2SeqModel<InferBackend> = cfg.init(&device);

        let model = match ckpt_manager.load_model(model, &device) {
            CheckpointLoad::Loaded(model) => model,
            CheckpointLoad::NotFound => {
                bail!("No checkpoint in '{}'. Have you run 'train' first?", ckpt_manager.dir().display())
            }
            CheckpointLoad::Corrupt(e) => return Err(e.context("Checkpoint cannot be used for translation")),
        };
        tracing::info!("Model loaded from checkpoint");
        Ok(Self::new(model, cfg.state_size, device))
    }
}

impl<B: Backend> Seq2Seq for BurnTranslator<B> {
    fn state_size(&self) -> usize {
        self.state_size
    }

    fn encode(&self, source_tokens: &[u32]) -> Result<Vec<f32>> {
        if source_tokens.is_empty() {
            bail!("Cannot encode an empty source row");
        }
        let thought = self.model.encoder.forward(self.int_row(source_tokens));
        thought
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read thought vector: {e:?}"))
    }

    fn decode(&self, partial_tokens: &[u32], thought: &[f32]) -> Result<Vec<Vec<f32>>> {
        if thought.len() != self.state_size {
            bail!("Thought vector has {} values, expected {}", thought.len(), self.state_size);
        }
        let state = Tensor::<B, 1>::from_floats(thought, &self.device)
            .reshape([1, self.state_size]);

        let logits = self.model.decoder.forward(self.int_row(partial_tokens), state);
        let [_, _, vocab] = logits.dims();

        let flat = logits
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read decoder output: {e:?}"))?;

        Ok(flat.chunks(vocab).map(<[f32]>::to_vec).collect())
    }
}
