// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// The `train` and `translate` subcommands and their flags.
// Defaults reproduce the reference training run: GloVe 100d,
// three GRU layers of 256, RMSprop at 1e-3, batch 128, 15 epochs.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::{TrainConfig, DEFAULT_EMBEDDINGS};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the translation model on sentence pairs
    Train(TrainArgs),

    /// Translate one sentence with a trained checkpoint
    Translate(TranslateArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Tab-separated file: English<TAB>Turkish per line
    #[arg(long, default_value = "data/tur.txt")]
    pub corpus: String,

    /// GloVe text file for the source embeddings
    #[arg(long, default_value = DEFAULT_EMBEDDINGS)]
    pub embeddings: Option<String>,

    /// Where weights, configs, preparers and metrics are written
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    #[arg(long, default_value_t = 15)]
    pub epochs: usize,

    #[arg(long, default_value_t = 128)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Must match the embedding file's dimension
    #[arg(long, default_value_t = 100)]
    pub embed_dim: usize,

    /// GRU hidden size, also the thought vector length
    #[arg(long, default_value_t = 256)]
    pub state_size: usize,

    /// Keep only the N most frequent words per language
    #[arg(long)]
    pub num_words: Option<usize>,

    /// Read at most N pairs from the corpus
    #[arg(long)]
    pub max_pairs: Option<usize>,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            corpus_path:     a.corpus,
            embeddings_path: a.embeddings,
            checkpoint_dir:  a.checkpoint_dir,
            epochs:          a.epochs,
            batch_size:      a.batch_size,
            lr:              a.lr,
            embed_dim:       a.embed_dim,
            state_size:      a.state_size,
            num_words:       a.num_words,
            max_pairs:       a.max_pairs,
        }
    }
}

#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// English sentence to translate
    #[arg(long)]
    pub text: String,

    /// Directory written by `train`
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}
