// ============================================================
// Layer 6 - Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// File layout:
//   checkpoints/
//     model.mpk.gz           ← weights, overwritten after every epoch
//     model_config.json      ← architecture (vocab sizes, dims)
//     train_config.json      ← hyperparameters of the run
//
// Loading weights never panics or prints-and-continues; the
// caller gets a CheckpointLoad and decides:
//   - Loaded   → resume training / translate
//   - NotFound → start from scratch (train) or bail (translate)
//   - Corrupt  → the file exists but does not fit this model
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{anyhow, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder, RecorderError},
};
use serde::{de::DeserializeOwned, Serialize};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::{Seq2SeqConfig, Seq2SeqModel};

const MODEL_FILE:        &str = "model";
const MODEL_CONFIG_FILE: &str = "model_config.json";
const TRAIN_CONFIG_FILE: &str = "train_config.json";

/// Outcome of trying to restore weights from disk.
#[derive(Debug)]
pub enum CheckpointLoad<M> {
    Loaded(M),
    NotFound,
    Corrupt(anyhow::Error),
}

/// Manages saving and loading of model checkpoints.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager; creates the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint dir '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save model weights. CompactRecorder appends the `.mpk.gz` extension.
    pub fn save_model<B: Backend>(&self, model: &Seq2SeqModel<B>) -> Result<()> {
        let path = self.dir.join(MODEL_FILE);

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .map_err(|e| anyhow!("Failed to save checkpoint to '{}': {e:?}", path.display()))?;

        tracing::debug!("Saved checkpoint to '{}'", path.display());
        Ok(())
    }

    /// Restore weights into `model`.
    pub fn load_model<B: Backend>(
        &self,
        model:  Seq2SeqModel<B>,
        device: &B::Device,
    ) -> CheckpointLoad<Seq2SeqModel<B>> {
        let path = self.dir.join(MODEL_FILE);

        match CompactRecorder::new().load(path.clone(), device) {
            Ok(record) => {
                tracing::info!("Loaded weights from '{}'", path.display());
                CheckpointLoad::Loaded(model.load_record(record))
            }
            Err(RecorderError::FileNotFound(_)) => CheckpointLoad::NotFound,
            Err(e) => CheckpointLoad::Corrupt(anyhow!(
                "Cannot load checkpoint '{}': {e:?}",
                path.display()
            )),
        }
    }

    pub fn save_model_config(&self, cfg: &Seq2SeqConfig) -> Result<()> {
        self.write_json(MODEL_CONFIG_FILE, cfg)
    }

    /// Architecture of the saved model, needed before weights can be loaded.
    pub fn load_model_config(&self) -> Result<Seq2SeqConfig> {
        self.read_json(MODEL_CONFIG_FILE)
    }

    pub fn save_train_config(&self, cfg: &TrainConfig) -> Result<()> {
        self.write_json(TRAIN_CONFIG_FILE, cfg)
    }

    pub fn load_train_config(&self) -> Result<TrainConfig> {
        self.read_json(TRAIN_CONFIG_FILE)
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        tracing::debug!("Saved '{}'", path.display());
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read '{}'. Make sure you have run 'train' before 'translate'.",
                path.display()
            )
        })?;
        serde_json::from_str(&json).with_context(|| format!("Malformed '{}'", path.display()))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nmt-seq2seq-ckpt-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn model_config() -> Seq2SeqConfig {
        Seq2SeqConfig::new(5, 6, 3, 4)
    }

    #[test]
    fn test_missing_checkpoint_is_not_found() {
        let dir    = temp_dir("missing");
        let ckpt   = CheckpointManager::new(&dir).unwrap();
        let device = Default::default();
        let model  = model_config().init::<NdArray>(&device);
        assert!(matches!(ckpt.load_model(model, &device), CheckpointLoad::NotFound));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_save_then_load_restores_weights() {
        let dir    = temp_dir("roundtrip");
        let ckpt   = CheckpointManager::new(&dir).unwrap();
        let device = Default::default();
        let saved  = model_config().init::<NdArray>(&device);
        ckpt.save_model(&saved).unwrap();

        let fresh = model_config().init::<NdArray>(&device);
        let loaded = match ckpt.load_model(fresh, &device) {
            CheckpointLoad::Loaded(m) => m,
            other => panic!("expected Loaded, got {other:?}"),
        };

        let a = saved.decoder.dense.weight.val().into_data().to_vec::<f32>().unwrap();
        let b = loaded.decoder.dense.weight.val().into_data().to_vec::<f32>().unwrap();
        assert_eq!(a.len(), b.len());
        // CompactRecorder stores half precision
        assert!(a.iter().zip(&b).all(|(x, y)| (x - y).abs() < 1e-2));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_garbage_file_is_corrupt() {
        let dir  = temp_dir("corrupt");
        let ckpt = CheckpointManager::new(&dir).unwrap();
        fs::write(dir.join("model.mpk.gz"), b"not a checkpoint").unwrap();

        let device = Default::default();
        let model  = model_config().init::<NdArray>(&device);
        assert!(matches!(ckpt.load_model(model, &device), CheckpointLoad::Corrupt(_)));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_model_config_round_trip() {
        let dir  = temp_dir("config");
        let ckpt = CheckpointManager::new(&dir).unwrap();
        ckpt.save_model_config(&model_config()).unwrap();
        let back = ckpt.load_model_config().unwrap();
        assert_eq!(back.source_vocab_size, 5);
        assert_eq!(back.state_size, 4);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let dir  = temp_dir("noconfig");
        let ckpt = CheckpointManager::new(&dir).unwrap();
        assert!(ckpt.load_train_config().is_err());
        let _ = fs::remove_dir_all(dir);
    }
}
