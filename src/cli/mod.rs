// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses command line arguments with `clap` and hands off to
// Layer 2 (application).
//
//   1. `train`     - fits preparers and trains the GRU model
//                    on a tab-separated sentence pair file
//   2. `translate` - loads the checkpoint and translates one
//                    English sentence into Turkish
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, TrainArgs, TranslateArgs};

use crate::domain::traits::Translator;

#[derive(Parser, Debug)]
#[command(
    name = "nmt-seq2seq",
    version = "0.1.0",
    about = "Train a GRU encoder/decoder on English-Turkish pairs, then translate."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)     => run_train(args),
            Commands::Translate(args) => run_translate(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on corpus: {}", args.corpus);

    let use_case = TrainUseCase::new(args.into());
    use_case.execute()?;

    println!("Training complete. Checkpoint saved.");
    Ok(())
}

fn run_translate(args: TranslateArgs) -> Result<()> {
    use crate::application::translate_use_case::TranslateUseCase;

    let use_case    = TranslateUseCase::new(&args.checkpoint_dir)?;
    let translation = use_case.translate(&args.text)?;

    println!("Input text:");
    println!("{}", args.text);
    println!();
    println!("Translated text:");
    println!("{}", translation);
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_translate() {
        let cli = Cli::try_parse_from(["nmt-seq2seq", "translate", "--text", "How are you?"]).unwrap();
        match cli.command {
            Commands::Translate(args) => {
                assert_eq!(args.text, "How are you?");
                assert_eq!(args.checkpoint_dir, "checkpoints");
            }
            other => panic!("expected translate, got {other:?}"),
        }
    }

    #[test]
    fn test_translate_requires_text() {
        assert!(Cli::try_parse_from(["nmt-seq2seq", "translate"]).is_err());
    }
}
