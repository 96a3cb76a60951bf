// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// All Burn model code lives here; the domain layer only sees
// the Seq2Seq trait that BurnTranslator implements.
//
//   model.rs      - GRU encoder/decoder
//                   • embedding → 3 GRU → thought vector
//                   • embedding → 3 GRU seeded with the
//                     thought vector → linear vocab logits
//
//   trainer.rs    - teacher-forced training loop with RMSprop,
//                   per-epoch checkpoint and metrics row
//
//   inferencer.rs - loads the checkpoint and answers encode /
//                   decode calls for the greedy decoder
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Cho et al. (2014) GRU encoder-decoder

/// GRU encoder/decoder architecture
pub mod model;

/// Training loop with checkpointing
pub mod trainer;

/// Checkpoint-backed Seq2Seq implementation
pub mod inferencer;
