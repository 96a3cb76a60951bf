// ============================================================
// Layer 4 - Sequence Preparer
// ============================================================
// Turns raw sentences into fixed-width integer rows and back.
//
// Construction (once, over the whole training corpus):
//
//   texts
//     │  Preprocessor::words        "Hi, Tom!" → ["hi", "tom"]
//     ▼
//   Vocabulary::fit               {hi: 1, tom: 2, ...}
//     │
//     ▼
//   encode                        [1, 2]
//     │  reverse? (source side)   [2, 1]
//     ▼
//   max_length_statistic          mean + 2·std of the lengths
//     │
//     ▼
//   pad / truncate                [0, 0, 2, 1]
//
// Why reverse the source?
//   The encoder's final hidden state is most influenced by the
//   tokens it read last. Feeding the sentence tail-first means
//   the beginning of the sentence, which the decoder needs first,
//   is freshest in the thought vector. When reversed, truncation
//   drops tokens from the front of the reversed row, i.e. from the
//   END of the original sentence.
//
// The vocabulary and max length are frozen after construction;
// later calls to `text_to_tokens` reuse them as-is.
//
// Reference: Sutskever et al. (2014), section 3.3 (reversing the source)

use serde::{Deserialize, Serialize};

use crate::data::padding::{max_length_statistic, PaddedSequences, Side};
use crate::data::preprocessor::Preprocessor;
use crate::data::vocabulary::{Vocabulary, PAD_ID};
use crate::domain::error::ConfigurationError;
use crate::domain::sentence_pair::{END_MARK, START_MARK};
use crate::domain::traits::TokenWords;

/// Word returned for token ids the vocabulary does not know.
pub const UNKNOWN_WORD: &str = "<unk>";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StoredPreparer")]
pub struct SequencePreparer {
    vocabulary: Vocabulary,
    max_length: usize,
    padding:    Side,
    reverse:    bool,

    /// The padded training corpus; not persisted
    #[serde(skip)]
    tokens_padded: PaddedSequences,
}

/// On-disk form; loading goes through the same checks as `new`.
#[derive(Deserialize)]
struct StoredPreparer {
    vocabulary: Vocabulary,
    max_length: usize,
    padding:    Side,
    reverse:    bool,
}

impl TryFrom<StoredPreparer> for SequencePreparer {
    type Error = ConfigurationError;

    fn try_from(s: StoredPreparer) -> Result<Self, Self::Error> {
        if s.max_length == 0 {
            return Err(ConfigurationError::ZeroMaxLength);
        }
        Ok(Self {
            vocabulary:    s.vocabulary,
            max_length:    s.max_length,
            padding:       s.padding,
            reverse:       s.reverse,
            tokens_padded: PaddedSequences::default(),
        })
    }
}

impl SequencePreparer {
    /// Build the vocabulary and max length from `texts`, then pad them.
    pub fn new<S: AsRef<str>>(
        texts:     &[S],
        padding:   Side,
        reverse:   bool,
        num_words: Option<usize>,
    ) -> Result<Self, ConfigurationError> {
        if texts.is_empty() {
            return Err(ConfigurationError::EmptyCorpus);
        }

        let preprocessor = Preprocessor::new();
        let words: Vec<Vec<String>> = texts
            .iter()
            .map(|t| preprocessor.words(t.as_ref()))
            .collect();

        let vocabulary = Vocabulary::fit(&words, num_words);

        let mut tokens: Vec<Vec<u32>> = words.iter().map(|w| vocabulary.encode(w)).collect();
        if reverse {
            tokens.iter_mut().for_each(|seq| seq.reverse());
        }

        let lengths: Vec<usize> = tokens.iter().map(Vec::len).collect();
        let max_length = max_length_statistic(&lengths).ok_or(ConfigurationError::EmptyCorpus)?;
        if max_length == 0 {
            return Err(ConfigurationError::ZeroMaxLength);
        }

        let tokens_padded =
            PaddedSequences::from_sequences(&tokens, max_length, padding, truncating_side(reverse));

        tracing::info!(
            "Sequence preparer: {} texts, {} words, max_length={}, padding={}, reverse={}",
            texts.len(),
            vocabulary.len(),
            max_length,
            padding,
            reverse,
        );

        Ok(Self { vocabulary, max_length, padding, reverse, tokens_padded })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Number of ids including the padding sentinel.
    pub fn vocab_size(&self) -> usize {
        self.vocabulary.id_space()
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn padding(&self) -> Side {
        self.padding
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }

    /// The padded construction corpus, `(corpus_size, max_length)`.
    /// Empty after the preparer was reloaded from disk.
    pub fn tokens_padded(&self) -> &PaddedSequences {
        &self.tokens_padded
    }

    /// `" "` for the sentinel, the word otherwise, [`UNKNOWN_WORD`] for
    /// ids outside the vocabulary.
    pub fn word_for_token(&self, id: u32) -> &str {
        if id == PAD_ID {
            return " ";
        }
        match self.vocabulary.word(id) {
            Ok(w) => w,
            Err(e) => {
                tracing::warn!("{e}; substituting {UNKNOWN_WORD}");
                UNKNOWN_WORD
            }
        }
    }

    /// Space-joined words of every non-padding id, in order.
    pub fn tokens_to_text(&self, tokens: &[u32]) -> String {
        tokens
            .iter()
            .filter(|&&id| id != PAD_ID)
            .map(|&id| self.word_for_token(id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Encode one new text with the frozen vocabulary and max length.
    ///
    /// The result always has exactly one row of width `max_length()`.
    pub fn text_to_tokens(&self, text: &str, padding: Side, reverse: bool) -> PaddedSequences {
        let words   = Preprocessor::new().words(text);
        let mut seq = self.vocabulary.encode(&words);
        if reverse {
            seq.reverse();
        }
        PaddedSequences::from_sequences(&[seq], self.max_length, padding, truncating_side(reverse))
    }

    /// [`text_to_tokens`](Self::text_to_tokens) with the padding and
    /// reverse settings this preparer was built with.
    pub fn encode(&self, text: &str) -> PaddedSequences {
        self.text_to_tokens(text, self.padding, self.reverse)
    }

    /// Ids of the start and end marker words.
    pub fn marker_ids(&self) -> Result<(u32, u32), ConfigurationError> {
        let lookup = |mark: &str| {
            self.vocabulary
                .id(mark)
                .ok_or_else(|| ConfigurationError::MissingMarker(mark.to_string()))
        };
        Ok((lookup(START_MARK)?, lookup(END_MARK)?))
    }
}

impl TokenWords for SequencePreparer {
    fn word_for_token(&self, id: u32) -> &str {
        SequencePreparer::word_for_token(self, id)
    }
}

/// Reversed rows drop tokens from the front, forward rows from the back.
fn truncating_side(reverse: bool) -> Side {
    if reverse { Side::Pre } else { Side::Post }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn hi_there() -> SequencePreparer {
        SequencePreparer::new(&["hi", "hi there"], Side::Pre, false, None).unwrap()
    }

    #[test]
    fn test_hi_there_example() {
        let p = hi_there();
        assert_eq!(p.vocabulary().id("hi"), Some(1));
        assert_eq!(p.vocabulary().id("there"), Some(2));
        assert_eq!(p.max_length(), 2);
        assert_eq!(p.tokens_padded().row(0), Some(&[0, 1][..]));
        assert_eq!(p.tokens_padded().row(1), Some(&[1, 2][..]));
        assert_eq!(p.tokens_to_text(&[0, 1]), "hi");
    }

    #[test]
    fn test_reverse_uses_pre_truncation() {
        let texts = ["a b c", "a b c", "a b c d e f g h"];
        let p     = SequencePreparer::new(&texts, Side::Pre, true, None).unwrap();
        // a:3 b:3 c:3 d..h:1 → a=1, b=2, c=3
        let row = p.text_to_tokens("a b c", Side::Pre, true);
        let r   = row.row(0).unwrap();
        assert_eq!(&r[r.len() - 3..], &[3, 2, 1]);

        // max_length is 9 here; an 11-word row keeps the start of the
        // sentence, which sits at the end of the reversed row
        assert_eq!(p.max_length(), 9);
        let long = p.text_to_tokens("a b c d e f g h a b c", Side::Pre, true);
        let r    = long.row(0).unwrap();
        assert_eq!(r.len(), 9);
        assert_eq!(r, &[1, 8, 7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_text_to_tokens_width_is_always_max_length() {
        let p = hi_there();
        for text in ["", "hi", "hi there hi there hi there hi there"] {
            let t = p.text_to_tokens(text, Side::Post, false);
            assert_eq!(t.shape(), (1, p.max_length()));
        }
    }

    #[test]
    fn test_empty_text_is_all_padding() {
        let p = hi_there();
        let t = p.text_to_tokens("", Side::Pre, false);
        assert!(t.row(0).unwrap().iter().all(|&id| id == 0));
    }

    #[test]
    fn test_round_trip_without_reverse() {
        let p    = SequencePreparer::new(&["the cat sat", "the dog ran away"], Side::Post, false, None).unwrap();
        let text = "the cat ran";
        let t    = p.text_to_tokens(text, Side::Post, false);
        assert_eq!(p.tokens_to_text(t.row(0).unwrap()), "the cat ran");
    }

    #[test]
    fn test_unseen_words_map_to_sentinel() {
        let p = hi_there();
        let t = p.text_to_tokens("hello there", Side::Post, false);
        assert_eq!(t.row(0), Some(&[0, 2][..]));
        assert_eq!(p.tokens_to_text(t.row(0).unwrap()), "there");
    }

    #[test]
    fn test_word_for_token_never_fails() {
        let p = hi_there();
        assert_eq!(p.word_for_token(0), " ");
        assert_eq!(p.word_for_token(2), "there");
        assert_eq!(p.word_for_token(999), UNKNOWN_WORD);
    }

    #[test]
    fn test_marker_ids() {
        let texts = ["ssss merhaba eeee", "ssss nasılsın eeee"];
        let p     = SequencePreparer::new(&texts, Side::Post, false, None).unwrap();
        assert_eq!(p.marker_ids(), Ok((1, 2)));
        assert!(hi_there().marker_ids().is_err());
    }

    #[test]
    fn test_empty_corpus_is_rejected() {
        let texts: [&str; 0] = [];
        let err = SequencePreparer::new(&texts, Side::Pre, false, None).unwrap_err();
        assert_eq!(err, ConfigurationError::EmptyCorpus);
    }

    #[test]
    fn test_all_empty_texts_give_zero_max_length_error() {
        let err = SequencePreparer::new(&["", "?!"], Side::Pre, false, None).unwrap_err();
        assert_eq!(err, ConfigurationError::ZeroMaxLength);
    }

    #[test]
    fn test_reversed_row_reads_back_in_order() {
        // a=1 b=2 c=3 d=4, max_length 4
        let p = SequencePreparer::new(&["a b c d", "d c b a"], Side::Pre, true, None).unwrap();
        assert_eq!(p.max_length(), 4);

        for text in ["a", "a b", "b c d", "d a c b"] {
            let words: Vec<&str> = text.split(' ').collect();
            let row = p.text_to_tokens(text, Side::Pre, true);
            let row = row.row(0).unwrap();

            let mut tail = row[row.len() - words.len()..].to_vec();
            tail.reverse();
            assert_eq!(p.tokens_to_text(&tail), text);
            assert!(row[..row.len() - words.len()].iter().all(|&t| t == PAD_ID));
        }
    }

    #[test]
    fn test_zero_max_length_in_json_is_rejected() {
        let json = r#"{"vocabulary":[],"max_length":0,"padding":"pre","reverse":false}"#;
        let err  = serde_json::from_str::<SequencePreparer>(json).unwrap_err();
        assert!(err.to_string().contains("max length is zero"));
    }

    #[test]
    fn test_serde_keeps_vocabulary_and_max_length() {
        let p    = hi_there();
        let json = serde_json::to_string(&p).unwrap();
        let back: SequencePreparer = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_length(), 2);
        assert_eq!(back.vocabulary(), p.vocabulary());
        assert!(back.tokens_padded().is_empty());
        assert_eq!(back.encode("hi"), p.encode("hi"));
    }
}
