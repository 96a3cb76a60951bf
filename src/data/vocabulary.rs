//! Word ↔ token id mapping built once from a training corpus.
//!
//! Id 0 is reserved as the padding / unknown sentinel. Real words get
//! ids from 1 upward in decreasing frequency; equal counts keep the
//! order in which the words were first seen.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::error::{ConfigurationError, VocabularyError};

/// Sentinel id for padding and for words outside the vocabulary.
pub const PAD_ID: u32 = 0;

/// Immutable bidirectional vocabulary.
///
/// Serialised as the plain word list in id order; the reverse index is
/// rebuilt on load and a repeated word is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    /// `words[i]` has id `i + 1`
    words: Vec<String>,
    index: HashMap<String, u32>,
}

impl Vocabulary {
    /// Count words over the tokenised corpus and assign ids.
    ///
    /// `num_words` keeps only that many of the most frequent words.
    pub fn fit<S: AsRef<str>>(texts: &[Vec<S>], num_words: Option<usize>) -> Self {
        // word → (count, first seen position)
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        let mut seen = 0usize;
        for words in texts {
            for w in words {
                let entry = counts.entry(w.as_ref()).or_insert_with(|| {
                    seen += 1;
                    (0, seen)
                });
                entry.0 += 1;
            }
        }

        let mut ranked: Vec<(&str, (usize, usize))> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
        if let Some(cap) = num_words {
            ranked.truncate(cap);
        }

        Self::from_unique(ranked.into_iter().map(|(w, _)| w.to_string()).collect())
    }

    /// `words` must not contain duplicates.
    fn from_unique(words: Vec<String>) -> Self {
        let index = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i as u32 + 1))
            .collect();
        Self { words, index }
    }

    /// Number of real words (sentinel excluded).
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Size of the id space including the sentinel: `len() + 1`.
    /// This is the row count of an embedding table over this vocabulary.
    pub fn id_space(&self) -> usize {
        self.words.len() + 1
    }

    pub fn id(&self, word: &str) -> Option<u32> {
        self.index.get(word).copied()
    }

    /// Strict reverse lookup. The sentinel has no word.
    pub fn word(&self, id: u32) -> Result<&str, VocabularyError> {
        (id as usize)
            .checked_sub(1)
            .and_then(|i| self.words.get(i))
            .map(String::as_str)
            .ok_or(VocabularyError::UnknownToken {
                id,
                max_id: self.words.len() as u32,
            })
    }

    /// Map words to ids; unknown words become [`PAD_ID`].
    pub fn encode<S: AsRef<str>>(&self, words: &[S]) -> Vec<u32> {
        words
            .iter()
            .map(|w| self.id(w.as_ref()).unwrap_or(PAD_ID))
            .collect()
    }

    /// `(id, word)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.words
            .iter()
            .enumerate()
            .map(|(i, w)| (i as u32 + 1, w.as_str()))
    }
}

impl TryFrom<Vec<String>> for Vocabulary {
    type Error = ConfigurationError;

    fn try_from(words: Vec<String>) -> Result<Self, Self::Error> {
        let mut index = HashMap::with_capacity(words.len());
        for (i, w) in words.iter().enumerate() {
            if index.insert(w.clone(), i as u32 + 1).is_some() {
                return Err(ConfigurationError::DuplicateWord(w.clone()));
            }
        }
        Ok(Self { words, index })
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(v: Vocabulary) -> Self {
        v.words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(lines: &[&str]) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|l| l.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_ids_follow_frequency_then_first_occurrence() {
        let v = Vocabulary::fit(&corpus(&["b a", "a c", "c d"]), None);
        // a:2 (seen 2nd), c:2 (seen 3rd), b:1 (seen 1st), d:1
        assert_eq!(v.id("a"), Some(1));
        assert_eq!(v.id("c"), Some(2));
        assert_eq!(v.id("b"), Some(3));
        assert_eq!(v.id("d"), Some(4));
    }

    #[test]
    fn test_markers_get_ids_one_and_two() {
        let v = Vocabulary::fit(&corpus(&["ssss merhaba eeee", "ssss selam eeee"]), None);
        assert_eq!(v.id("ssss"), Some(1));
        assert_eq!(v.id("eeee"), Some(2));
    }

    #[test]
    fn test_num_words_caps_vocabulary() {
        let v = Vocabulary::fit(&corpus(&["a a a b b c"]), Some(2));
        assert_eq!(v.len(), 2);
        assert_eq!(v.id("c"), None);
        assert_eq!(v.encode(&["a", "c", "b"]), vec![1, PAD_ID, 2]);
    }

    #[test]
    fn test_word_lookup_rejects_sentinel_and_out_of_range() {
        let v = Vocabulary::fit(&corpus(&["hi there"]), None);
        assert_eq!(v.word(1), Ok("hi"));
        assert!(v.word(0).is_err());
        assert_eq!(v.word(9), Err(VocabularyError::UnknownToken { id: 9, max_id: 2 }));
    }

    #[test]
    fn test_serde_round_trip_rebuilds_index() {
        let v    = Vocabulary::fit(&corpus(&["hi hi there"]), None);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"["hi","there"]"#);
        let back: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id("there"), Some(2));
        assert_eq!(back, v);
    }

    #[test]
    fn test_duplicate_word_list_is_rejected() {
        let words = vec!["hi".to_string(), "there".to_string(), "hi".to_string()];
        assert_eq!(
            Vocabulary::try_from(words),
            Err(ConfigurationError::DuplicateWord("hi".to_string()))
        );
        assert!(serde_json::from_str::<Vocabulary>(r#"["a","b","a"]"#).is_err());
    }
}
