// ============================================================
// Layer 4 - Pretrained Word Embeddings
// ============================================================
// Reads a GloVe-style text file into a read-only lookup table
// and builds the initial weight matrix of the encoder's
// embedding layer from it.
//
// File format (one word per line, space separated):
//   the 0.418 0.24968 -0.41242 0.1217 ...
//   ,   0.013441 0.23682 -0.16899 0.40951 ...
//
// Matrix construction:
//   1. Fill a (vocab_ids × dim) matrix with uniform noise in [-1, 1)
//   2. Overwrite the row of every vocabulary word that has a
//      pretrained vector
//
// Row 0 (the padding sentinel) always stays random.
//
// Reference: Pennington et al. (2014) GloVe

use anyhow::{bail, Context, Result};
use rand::Rng;
use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::data::vocabulary::Vocabulary;

/// Lower bound of the random initialisation range
pub const INIT_LOW: f32 = -1.0;
/// Upper bound (exclusive) of the random initialisation range
pub const INIT_HIGH: f32 = 1.0;

/// Read-only word → vector lookup.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingTable {
    dim:     usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl EmbeddingTable {
    /// Load a GloVe text file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Cannot open embedding file '{}'", path.display()))?;

        let table = Self::from_reader(BufReader::new(file))
            .with_context(|| format!("Cannot parse embedding file '{}'", path.display()))?;

        tracing::info!(
            "Loaded {} pretrained vectors of dimension {} from '{}'",
            table.len(),
            table.dim(),
            path.display()
        );
        Ok(table)
    }

    /// Parse GloVe lines from any reader. The first vector fixes the
    /// dimension; later lines must match it.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut table = Self::default();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else { continue };

            let vector = fields
                .map(str::parse::<f32>)
                .collect::<std::result::Result<Vec<_>, _>>()
                .with_context(|| format!("Bad number on line {}", line_no + 1))?;

            if table.vectors.is_empty() {
                table.dim = vector.len();
            } else if vector.len() != table.dim {
                bail!(
                    "Line {} has {} values, expected {}",
                    line_no + 1,
                    vector.len(),
                    table.dim
                );
            }
            table.vectors.insert(word.to_string(), vector);
        }

        Ok(table)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<&[f32]> {
        self.vectors.get(word).map(Vec::as_slice)
    }
}

/// Initial embedding weights, row-major `rows × dim`.
#[derive(Debug, Clone)]
pub struct EmbeddingMatrix {
    pub values: Vec<f32>,
    pub rows:   usize,
    pub dim:    usize,
    /// How many rows came from the pretrained table
    pub pretrained_rows: usize,
}

impl EmbeddingMatrix {
    pub fn row(&self, id: usize) -> &[f32] {
        &self.values[id * self.dim..(id + 1) * self.dim]
    }
}

/// Build the `vocab.id_space() × dim` matrix for `vocab`.
///
/// `table` may be `None` (purely random init); otherwise its
/// dimension must equal `dim`.
pub fn embedding_matrix<R: Rng>(
    vocab: &Vocabulary,
    table: Option<&EmbeddingTable>,
    dim:   usize,
    rng:   &mut R,
) -> Result<EmbeddingMatrix> {
    if let Some(t) = table {
        if !t.is_empty() && t.dim() != dim {
            bail!("Embedding file has dimension {} but the model uses {}", t.dim(), dim);
        }
    }

    let rows = vocab.id_space();
    let mut values: Vec<f32> = (0..rows * dim)
        .map(|_| rng.gen_range(INIT_LOW..INIT_HIGH))
        .collect();

    let mut pretrained_rows = 0usize;
    if let Some(table) = table {
        for (id, word) in vocab.iter() {
            if let Some(vec) = table.get(word) {
                let start = id as usize * dim;
                values[start..start + dim].copy_from_slice(vec);
                pretrained_rows += 1;
            }
        }
    }

    tracing::info!(
        "Embedding matrix {}x{}: {} of {} words pretrained",
        rows,
        dim,
        pretrained_rows,
        vocab.len()
    );

    Ok(EmbeddingMatrix { values, rows, dim, pretrained_rows })
}
