// ============================================================
// Layer 3 - SentencePair Domain Type
// ============================================================
// One line of the parallel corpus: an English source sentence
// and its Turkish destination sentence.
//
// The decoder needs to know where a sentence begins and ends,
// so every destination sentence is wrapped in two marker words
// before the vocabulary is built:
//
//   "Merhaba." → "ssss Merhaba. eeee"
//
// The markers occur once per sentence, which makes them the
// two most frequent words of the destination corpus. They end
// up with ids 1 (start) and 2 (end).

use serde::{Deserialize, Serialize};

/// Word prepended to every destination sentence.
pub const START_MARK: &str = "ssss";

/// Word appended to every destination sentence.
pub const END_MARK: &str = "eeee";

/// A source/destination sentence pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentencePair {
    /// Sentence in the source language (English)
    pub source: String,

    /// Sentence in the destination language (Turkish),
    /// already wrapped in start/end markers when built with
    /// [`SentencePair::with_markers`]
    pub destination: String,
}

impl SentencePair {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source:      source.into(),
            destination: destination.into(),
        }
    }

    /// Build a pair whose destination is wrapped as
    /// `"ssss <destination> eeee"`.
    pub fn with_markers(source: impl Into<String>, destination: &str) -> Self {
        Self::new(source, format!("{START_MARK} {destination} {END_MARK}"))
    }
}
