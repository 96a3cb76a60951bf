//! Typed errors for the framework-free core.
//!
//! The application and infra layers use `anyhow`; the sequence
//! preparer and the greedy decoder return these enums so callers
//! can tell a recoverable vocabulary miss from a fatal
//! misconfiguration.

use thiserror::Error;

/// Lookup of a token id that has no word attached.
///
/// Never fatal: `SequencePreparer::word_for_token` substitutes a
/// placeholder word when it sees this error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VocabularyError {
    #[error("token id {id} is outside the vocabulary (ids 1..={max_id})")]
    UnknownToken { id: u32, max_id: u32 },
}

/// Fatal configuration problems surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("cannot build a sequence preparer from an empty corpus")]
    EmptyCorpus,

    #[error("max length is zero; every sequence would be pure padding")]
    ZeroMaxLength,

    #[error("thought vector has {actual} values but the decoder expects {expected}")]
    StateSizeMismatch { expected: usize, actual: usize },

    #[error("decoder returned no emission scores for position {position}")]
    MissingEmission { position: usize },

    #[error("marker word {0:?} is missing from the destination vocabulary")]
    MissingMarker(String),

    #[error("word {0:?} appears more than once in the vocabulary")]
    DuplicateWord(String),
}

/// Errors raised by the greedy decoding loop.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The encoder/decoder capability itself failed.
    #[error(transparent)]
    Capability(#[from] anyhow::Error),
}
