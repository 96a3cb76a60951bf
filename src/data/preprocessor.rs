// ============================================================
// Layer 4 - Text Preprocessor
// ============================================================
// Splits a raw sentence into lowercase words before it is
// looked up in the vocabulary.
//
// Cleaning steps (applied in order):
//   1. Lowercase the whole sentence (Unicode aware, so Turkish
//      letters like 'Ç' and 'Ş' are handled)
//   2. Replace every punctuation character in FILTERS, tab and
//      newline with a plain space
//   3. Split on whitespace and drop empty pieces
//
// The apostrophe is NOT a filter character: "don't" and
// "Tom'un" stay single words.
//
// Example:
//   "Hi, Tom!  How are you?" → ["hi", "tom", "how", "are", "you"]

/// Characters treated as word separators.
pub const FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

pub struct Preprocessor;

impl Preprocessor {
    /// Create a new Preprocessor instance
    pub fn new() -> Self {
        Self
    }

    /// Split `text` into filtered, lowercase words.
    pub fn words(&self, text: &str) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .map(|c| if FILTERS.contains(c) { ' ' } else { c })
            .collect();

        cleaned
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
