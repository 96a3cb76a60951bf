// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Persistence concerns shared by training and translation:
//
//   checkpoint.rs      - model weights (Burn CompactRecorder)
//                        plus model/train configs as JSON.
//                        Loading returns Loaded | NotFound |
//                        Corrupt instead of printing and
//                        carrying on.
//
//   preparer_store.rs  - source/destination SequencePreparers
//                        as JSON, so translation uses the same
//                        vocabulary and max lengths as training.
//
//   metrics.rs         - per-epoch training loss CSV.
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Sequence preparer persistence
pub mod preparer_store;

/// Training metrics CSV logger
pub mod metrics;
