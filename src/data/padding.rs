// ============================================================
// Layer 4 - Padding and Truncation
// ============================================================
// Forces variable-length token sequences into a rectangle of
// width `max_len`.
//
//   Side::Pre  padding:    [5, 7]       → [0, 0, 5, 7]
//   Side::Post padding:    [5, 7]       → [5, 7, 0, 0]
//   Side::Pre  truncating: [1,2,3,4,5]  → [3, 4, 5]     (drop from front)
//   Side::Post truncating: [1,2,3,4,5]  → [1, 2, 3]     (drop from back)
//
// Max length statistic:
//   mean(lengths) + 2 * std(lengths), rounded down.
//   For roughly normal sentence lengths this keeps ~95% of
//   sentences whole while cutting the long tail.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which end of a sequence padding is inserted at / tokens are dropped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Pre,
    Post,
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre"  => Ok(Side::Pre),
            "post" => Ok(Side::Post),
            other  => Err(format!("padding side must be 'pre' or 'post', got '{other}'")),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Pre  => write!(f, "pre"),
            Side::Post => write!(f, "post"),
        }
    }
}

/// Pad or truncate `seq` to exactly `max_len` ids.
pub fn pad_sequence(seq: &[u32], max_len: usize, padding: Side, truncating: Side) -> Vec<u32> {
    let kept: &[u32] = if seq.len() > max_len {
        match truncating {
            Side::Pre  => &seq[seq.len() - max_len..],
            Side::Post => &seq[..max_len],
        }
    } else {
        seq
    };

    let pad = max_len - kept.len();
    let mut out = Vec::with_capacity(max_len);
    match padding {
        Side::Pre => {
            out.resize(pad, 0);
            out.extend_from_slice(kept);
        }
        Side::Post => {
            out.extend_from_slice(kept);
            out.resize(max_len, 0);
        }
    }
    out
}

/// `floor(mean + 2 * std)` of `lengths` (population std).
/// Returns `None` for an empty slice.
pub fn max_length_statistic(lengths: &[usize]) -> Option<usize> {
    if lengths.is_empty() {
        return None;
    }
    let n        = lengths.len() as f64;
    let mean     = lengths.iter().map(|&l| l as f64).sum::<f64>() / n;
    let variance = lengths
        .iter()
        .map(|&l| {
            let d = l as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    Some((mean + 2.0 * variance.sqrt()).floor() as usize)
}

// ─── PaddedSequences ──────────────────────────────────────────────────────────
/// Rectangular `rows × width` array of token ids, stored row-major.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaddedSequences {
    data:  Vec<u32>,
    width: usize,
}

impl PaddedSequences {
    /// Pad/truncate every sequence to `width` and stack them.
    pub fn from_sequences(seqs: &[Vec<u32>], width: usize, padding: Side, truncating: Side) -> Self {
        let mut data = Vec::with_capacity(seqs.len() * width);
        for seq in seqs {
            data.extend(pad_sequence(seq, width, padding, truncating));
        }
        Self { data, width }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        if self.width == 0 { 0 } else { self.data.len() / self.width }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// `(rows, width)`
    pub fn shape(&self) -> (usize, usize) {
        (self.len(), self.width)
    }

    pub fn row(&self, index: usize) -> Option<&[u32]> {
        let start = index.checked_mul(self.width)?;
        self.data.get(start..start + self.width)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        // chunks_exact panics on zero width
        self.data.chunks_exact(self.width.max(1))
    }

    /// Same rows with the last column removed (decoder input).
    pub fn without_last_column(&self) -> Self {
        self.select_columns(0, self.width.saturating_sub(1))
    }

    /// Same rows with the first column removed (decoder target).
    pub fn without_first_column(&self) -> Self {
        self.select_columns(1.min(self.width), self.width)
    }

    fn select_columns(&self, from: usize, to: usize) -> Self {
        let data = self
            .rows()
            .flat_map(|row| row[from..to].iter().copied())
            .collect();
        Self { data, width: to - from }
    }
}
