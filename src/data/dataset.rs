use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::padding::PaddedSequences;

/// One padded training example.
///
/// The decoder is trained with teacher forcing: its input is the
/// destination row without the last column and its target is the
/// same row shifted one step left.
///
///   destination:    [ssss, bu, bir, test, eeee, 0]
///   decoder_input:  [ssss, bu, bir, test, eeee]
///   decoder_target: [bu,   bir, test, eeee, 0]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationSample {
    pub encoder_input:  Vec<u32>,
    pub decoder_input:  Vec<u32>,
    pub decoder_target: Vec<u32>,
}

pub struct TranslationDataset {
    samples: Vec<TranslationSample>,
}

impl TranslationDataset {
    pub fn new(samples: Vec<TranslationSample>) -> Self { Self { samples } }

    /// Pair up padded source and destination rows.
    pub fn from_padded(source: &PaddedSequences, destination: &PaddedSequences) -> Self {
        let inputs  = destination.without_last_column();
        let targets = destination.without_first_column();

        let samples = source
            .rows()
            .zip(inputs.rows())
            .zip(targets.rows())
            .map(|((src, input), target)| TranslationSample {
                encoder_input:  src.to_vec(),
                decoder_input:  input.to_vec(),
                decoder_target: target.to_vec(),
            })
            .collect();

        Self::new(samples)
    }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl Dataset<TranslationSample> for TranslationDataset {
    fn get(&self, index: usize) -> Option<TranslationSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
