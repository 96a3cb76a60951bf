// ============================================================
// Layer 3 - Greedy Autoregressive Decoder
// ============================================================
// Turns one thought vector into a destination sentence, one
// word at a time:
//
//   partial = [ssss, 0, 0, 0, ...]      → decode → argmax @0 = "bu"
//   partial = [ssss, bu, 0, 0, ...]     → decode → argmax @1 = "bir"
//   partial = [ssss, bu, bir, 0, ...]   → decode → argmax @2 = "eeee"  → done
//
// State machine:
//
//   AwaitingFirstToken ──step──▶ Emitting ──step──▶ ... ──▶ Done
//                        │                    │
//                        └── end marker or length cap ──┘
//
// Exactly one decoder call per emitted token, no batching across
// steps. The loop always stops after `max_length` steps even if
// the end marker never shows up.
//
// Reference: Sutskever et al. (2014) Sequence to Sequence Learning

use crate::domain::error::{ConfigurationError, DecodeError};
use crate::domain::traits::{Seq2Seq, TokenWords};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The decoder emitted the end marker
    EndMarker,
    /// `max_length` steps were taken without an end marker
    LengthCap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    AwaitingFirstToken,
    Emitting,
    Done(StopReason),
}

/// Result of decoding one thought vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Emitted token ids, end marker excluded
    pub tokens: Vec<u32>,
    /// Space-joined words of the emitted non-padding tokens
    pub text:   String,
    pub stop:   StopReason,
}

/// Greedy (argmax) decoder. Holds no per-call state, so one
/// instance can serve any number of `decode` calls.
#[derive(Debug, Clone)]
pub struct GreedyDecoder {
    start_token: u32,
    end_token:   u32,
    max_length:  usize,
}

impl GreedyDecoder {
    pub fn new(start_token: u32, end_token: u32, max_length: usize) -> Result<Self, ConfigurationError> {
        if max_length == 0 {
            return Err(ConfigurationError::ZeroMaxLength);
        }
        Ok(Self { start_token, end_token, max_length })
    }

    /// Decode `thought` with `model`, mapping ids back to words with `words`.
    pub fn decode<M, W>(&self, model: &M, thought: &[f32], words: &W) -> Result<Translation, DecodeError>
    where
        M: Seq2Seq + ?Sized,
        W: TokenWords + ?Sized,
    {
        let expected = model.state_size();
        if thought.len() != expected {
            return Err(ConfigurationError::StateSizeMismatch {
                expected,
                actual: thought.len(),
            }
            .into());
        }

        // Scratch buffer private to this call
        let mut partial = vec![0u32; self.max_length];
        let mut emitted = Vec::new();
        let mut token   = self.start_token;
        let mut step    = 0usize;
        let mut state   = DecoderState::AwaitingFirstToken;

        let stop = loop {
            match state {
                DecoderState::Done(reason) => break reason,
                DecoderState::AwaitingFirstToken | DecoderState::Emitting => {}
            }

            partial[step] = token;
            let emissions = model.decode(&partial, thought)?;
            token = emissions
                .get(step)
                .and_then(|row| argmax(row))
                .ok_or(ConfigurationError::MissingEmission { position: step })?;
            step += 1;

            state = if token == self.end_token {
                DecoderState::Done(StopReason::EndMarker)
            } else {
                emitted.push(token);
                if step >= self.max_length {
                    DecoderState::Done(StopReason::LengthCap)
                } else {
                    DecoderState::Emitting
                }
            };
        };

        let text = emitted
            .iter()
            .filter(|&&id| id != 0)
            .map(|&id| words.word_for_token(id))
            .collect::<Vec<_>>()
            .join(" ");

        tracing::debug!("Decoded {} tokens in {} steps ({:?})", emitted.len(), step, stop);

        Ok(Translation { tokens: emitted, text, stop })
    }
}

/// Index of the highest score; the lowest index wins ties.
/// Returns `None` for an empty row.
fn argmax(scores: &[f32]) -> Option<u32> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &s) in scores.iter().enumerate() {
        match best {
            Some((_, b)) if s <= b || s.is_nan() => {}
            _ => best = Some((i, s)),
        }
    }
    best.map(|(i, _)| i as u32)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    const VOCAB: usize = 6;

    /// Emits the scripted ids in order, one per call, and counts calls.
    struct ScriptedModel {
        script: Vec<u32>,
        calls:  Cell<usize>,
    }

    impl ScriptedModel {
        fn new(script: Vec<u32>) -> Self {
            Self { script, calls: Cell::new(0) }
        }
    }

    impl Seq2Seq for ScriptedModel {
        fn state_size(&self) -> usize {
            2
        }

        fn encode(&self, _source_tokens: &[u32]) -> anyhow::Result<Vec<f32>> {
            Ok(vec![0.0; 2])
        }

        fn decode(&self, partial: &[u32], _thought: &[f32]) -> anyhow::Result<Vec<Vec<f32>>> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            let next = self.script.get(call).copied().unwrap_or(3);
            let mut rows = vec![vec![0.0; VOCAB]; partial.len()];
            rows[call][next as usize] = 1.0;
            Ok(rows)
        }
    }

    struct Words;

    impl TokenWords for Words {
        fn word_for_token(&self, id: u32) -> &str {
            ["", "ssss", "eeee", "bu", "bir", "test"][id as usize]
        }
    }

    #[test]
    fn test_immediate_end_marker_gives_empty_text() {
        let model   = ScriptedModel::new(vec![2]);
        let decoder = GreedyDecoder::new(1, 2, 5).unwrap();
        let out     = decoder.decode(&model, &[0.0, 0.0], &Words).unwrap();
        assert_eq!(out.text, "");
        assert!(out.tokens.is_empty());
        assert_eq!(out.stop, StopReason::EndMarker);
        assert_eq!(model.calls.get(), 1);
    }

    #[test]
    fn test_emits_words_until_end_marker() {
        let model   = ScriptedModel::new(vec![3, 4, 5, 2]);
        let decoder = GreedyDecoder::new(1, 2, 10).unwrap();
        let out     = decoder.decode(&model, &[0.0, 0.0], &Words).unwrap();
        assert_eq!(out.text, "bu bir test");
        assert_eq!(out.tokens, vec![3, 4, 5]);
        // One decoder call per emitted token plus the end marker
        assert_eq!(model.calls.get(), 4);
    }

    #[test]
    fn test_each_step_sees_previous_tokens() {
        struct Recording {
            inner: ScriptedModel,
            seen:  RefCell<Vec<Vec<u32>>>,
        }
        impl Seq2Seq for Recording {
            fn state_size(&self) -> usize { self.inner.state_size() }
            fn encode(&self, t: &[u32]) -> anyhow::Result<Vec<f32>> { self.inner.encode(t) }
            fn decode(&self, partial: &[u32], thought: &[f32]) -> anyhow::Result<Vec<Vec<f32>>> {
                self.seen.borrow_mut().push(partial.to_vec());
                self.inner.decode(partial, thought)
            }
        }

        let model   = Recording { inner: ScriptedModel::new(vec![3, 4, 2]), seen: RefCell::new(Vec::new()) };
        let decoder = GreedyDecoder::new(1, 2, 5).unwrap();
        let out     = decoder.decode(&model, &[0.0, 0.0], &Words).unwrap();

        assert_eq!(out.text, "bu bir");
        assert_eq!(
            *model.seen.borrow(),
            vec![vec![1, 0, 0, 0, 0], vec![1, 3, 0, 0, 0], vec![1, 3, 4, 0, 0]]
        );
    }

    #[test]
    fn test_terminates_at_length_cap() {
        // Never emits the end marker
        let model   = ScriptedModel::new(vec![]);
        let decoder = GreedyDecoder::new(1, 2, 4).unwrap();
        let out     = decoder.decode(&model, &[0.0, 0.0], &Words).unwrap();
        assert_eq!(out.stop, StopReason::LengthCap);
        assert_eq!(out.tokens.len(), 4);
        assert_eq!(model.calls.get(), 4);
    }

    #[test]
    fn test_wrong_thought_size_fails_fast() {
        let model   = ScriptedModel::new(vec![2]);
        let decoder = GreedyDecoder::new(1, 2, 4).unwrap();
        let err     = decoder.decode(&model, &[0.0; 3], &Words).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Configuration(ConfigurationError::StateSizeMismatch { expected: 2, actual: 3 })
        ));
        assert_eq!(model.calls.get(), 0);
    }

    #[test]
    fn test_zero_max_length_rejected() {
        assert_eq!(GreedyDecoder::new(1, 2, 0).unwrap_err(), ConfigurationError::ZeroMaxLength);
    }

    #[test]
    fn test_missing_emission_row_is_configuration_error() {
        struct Empty;
        impl Seq2Seq for Empty {
            fn state_size(&self) -> usize { 1 }
            fn encode(&self, _: &[u32]) -> anyhow::Result<Vec<f32>> { Ok(vec![0.0]) }
            fn decode(&self, _: &[u32], _: &[f32]) -> anyhow::Result<Vec<Vec<f32>>> { Ok(Vec::new()) }
        }
        let decoder = GreedyDecoder::new(1, 2, 3).unwrap();
        let err     = decoder.decode(&Empty, &[0.0], &Words).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Configuration(ConfigurationError::MissingEmission { position: 0 })
        ));
    }

    #[test]
    fn test_capability_failure_propagates() {
        struct Broken;
        impl Seq2Seq for Broken {
            fn state_size(&self) -> usize { 1 }
            fn encode(&self, _: &[u32]) -> anyhow::Result<Vec<f32>> { Ok(vec![0.0]) }
            fn decode(&self, _: &[u32], _: &[f32]) -> anyhow::Result<Vec<Vec<f32>>> {
                anyhow::bail!("decoder unavailable")
            }
        }
        let decoder = GreedyDecoder::new(1, 2, 3).unwrap();
        let err     = decoder.decode(&Broken, &[0.0], &Words).unwrap_err();
        assert!(matches!(err, DecodeError::Capability(_)));
        assert!(err.to_string().contains("unavailable"));
    }

    #[test]
    fn test_argmax_prefers_lowest_index_on_ties() {
        assert_eq!(argmax(&[0.5, 0.9, 0.9, 0.1]), Some(1));
        assert_eq!(argmax(&[]), None);
    }
}
