// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// The decoding loop and the use cases program against these
// traits instead of concrete types:
//   - TsvCorpusLoader implements CorpusSource
//   - BurnTranslator implements Seq2Seq (the GRU network)
//   - SequencePreparer implements TokenWords
//   - TranslateUseCase implements Translator
//
// Tests swap in stub implementations (a fixed-output Seq2Seq,
// an in-memory corpus) without touching the code that uses them.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::sentence_pair::SentencePair;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that can produce parallel sentence pairs.
pub trait CorpusSource {
    /// Load every available pair, destination already wrapped in markers.
    fn load_pairs(&self) -> Result<Vec<SentencePair>>;
}

// ─── Seq2Seq ──────────────────────────────────────────────────────────────────
/// The encoder/decoder capability consumed by the greedy decoder.
///
/// The loop only depends on these signatures, never on the network
/// architecture behind them.
pub trait Seq2Seq {
    /// Length of the thought vector the decoder expects.
    fn state_size(&self) -> usize;

    /// Summarise one padded source row into a thought vector.
    fn encode(&self, source_tokens: &[u32]) -> Result<Vec<f32>>;

    /// Score every destination word at every position of `partial_tokens`.
    ///
    /// Returns one row of scores per input position.
    fn decode(&self, partial_tokens: &[u32], thought: &[f32]) -> Result<Vec<Vec<f32>>>;
}

// ─── TokenWords ───────────────────────────────────────────────────────────────
/// Reverse mapping from token id to word.
pub trait TokenWords {
    /// Word for `id`; never fails, unknown ids yield a placeholder.
    fn word_for_token(&self, id: u32) -> &str;
}

// ─── Translator ───────────────────────────────────────────────────────────────
/// Anything that turns a source sentence into a destination sentence.
pub trait Translator {
    fn translate(&self, text: &str) -> Result<String>;
}
