// ============================================================
// Layer 5 - Training Loop
// ============================================================
// Teacher-forced training of the encoder/decoder with Burn's
// DataLoader and RMSprop.
//
//   - TrainBackend (Autodiff<Wgpu>) carries the gradients
//   - the loss is sparse cross-entropy over every decoder
//     position, padding included
//   - weights are written to the checkpoint after every epoch,
//     overwriting the previous one
//   - a CheckpointLoad::Loaded on startup resumes training
//
// Reference: Burn Book §5, Tieleman & Hinton (2012) RMSprop

use anyhow::Result;
use burn::{
    backend::{wgpu::WgpuDevice, Autodiff, Wgpu},
    data::dataloader::DataLoaderBuilder,
    optim::{GradientsParams, Optimizer, RmsPropConfig},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::TranslationBatcher,
    dataset::TranslationDataset,
    embeddings::EmbeddingMatrix,
};
use crate::infra::{
    checkpoint::{CheckpointLoad, CheckpointManager},
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::model::{Seq2SeqConfig, Seq2SeqModel};

pub type TrainBackend = Autodiff<Wgpu>;

const SHUFFLE_SEED: u64 = 42;

pub fn run_training(
    cfg:          &TrainConfig,
    model_cfg:    &Seq2SeqConfig,
    embeddings:   &EmbeddingMatrix,
    dataset:      TranslationDataset,
    ckpt_manager: &CheckpointManager,
) -> Result<()> {
    let device = WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);

    let model = prepare_model::<TrainBackend>(model_cfg, embeddings, ckpt_manager, &device);
    train_loop(cfg, model, dataset, ckpt_manager, device)?;
    Ok(())
}

/// Fresh model with pretrained source embeddings, replaced by the
/// checkpointed weights when a usable checkpoint exists.
pub fn prepare_model<B: Backend>(
    model_cfg:    &Seq2SeqConfig,
    embeddings:   &EmbeddingMatrix,
    ckpt_manager: &CheckpointManager,
    device:       &B::Device,
) -> Seq2SeqModel<B> {
    let fresh = model_cfg.init::<B>(device).with_source_embeddings(embeddings, device);

    match ckpt_manager.load_model(fresh.clone(), device) {
        CheckpointLoad::Loaded(model) => {
            tracing::info!("Resuming training from '{}'", ckpt_manager.dir().display());
            model
        }
        CheckpointLoad::NotFound => {
            tracing::info!("No checkpoint found, training from scratch");
            fresh
        }
        CheckpointLoad::Corrupt(e) => {
            tracing::warn!("Ignoring unusable checkpoint: {e:#}");
            fresh
        }
    }
}

pub fn train_loop<B: AutodiffBackend>(
    cfg:          &TrainConfig,
    mut model:    Seq2SeqModel<B>,
    dataset:      TranslationDataset,
    ckpt_manager: &CheckpointManager,
    device:       B::Device,
) -> Result<Seq2SeqModel<B>> {

    // ── RMSprop optimiser ─────────────────────────────────────────────────────
    // v = ρ*v + (1-ρ)*g²
    // θ = θ - lr * g / (√v + ε)
    let mut optim = RmsPropConfig::new()
        .with_alpha(0.9)
        .with_momentum(0.0)
        .with_epsilon(1e-7)
        .init::<B, Seq2SeqModel<B>>();

    // ── Data loader ───────────────────────────────────────────────────────────
    let sample_count = dataset.sample_count();
    let batcher      = TranslationBatcher::<B>::new(device);
    let loader       = DataLoaderBuilder::new(batcher)
        .batch_size(cfg.batch_size)
        .shuffle(SHUFFLE_SEED)
        .num_workers(1)
        .build(dataset);

    let metrics = MetricsLogger::new(ckpt_manager.dir())?;
    tracing::info!(
        "Training on {} pairs: {} epochs, batch_size={}, lr={}",
        sample_count, cfg.epochs, cfg.batch_size, cfg.lr,
    );

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;

        for batch in loader.iter() {
            let loss = model.forward_loss(
                batch.encoder_input,
                batch.decoder_input,
                batch.decoder_target,
            );

            loss_sum += loss.clone().into_scalar().elem::<f64>();
            batches  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
        let row      = EpochMetrics::new(epoch, avg_loss, batches);

        println!("Epoch {:>3}/{} | train_loss={:.4}", epoch, cfg.epochs, avg_loss);
        metrics.log(&row)?;

        ckpt_manager.save_model(&model)?;
        tracing::info!("Checkpoint saved for epoch {}", epoch);
    }

    tracing::info!("Training complete!");
    Ok(model)
}
