// ============================================================
// Layer 5 - GRU Encoder / Decoder
// ============================================================
//   source ids [B, S] → Embedding → GRU ×3 → last step → thought [B, H]
//   dest ids   [B, T] → Embedding → GRU ×3 (h0 = thought) → Linear → [B, T, V]
//
// Reference: Cho et al. (2014), Sutskever et al. (2014)

use burn::{
    module::Param,
    nn::{
        gru::{Gru, GruConfig},
        loss::CrossEntropyLossConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::TensorData,
};

use crate::data::embeddings::EmbeddingMatrix;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct Seq2SeqConfig {
    /// Source id space (vocabulary words + padding sentinel)
    pub source_vocab_size: usize,
    /// Destination id space (vocabulary words + padding sentinel)
    pub target_vocab_size: usize,
    pub embed_dim:         usize,
    /// GRU hidden size, also the thought vector length
    pub state_size:        usize,
}

impl Seq2SeqConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Seq2SeqModel<B> {
        let encoder = Encoder {
            embedding: EmbeddingConfig::new(self.source_vocab_size, self.embed_dim).init(device),
            gru1:      GruConfig::new(self.embed_dim, self.state_size, true).init(device),
            gru2:      GruConfig::new(self.state_size, self.state_size, true).init(device),
            gru3:      GruConfig::new(self.state_size, self.state_size, true).init(device),
        };
        let decoder = Decoder {
            embedding: EmbeddingConfig::new(self.target_vocab_size, self.embed_dim).init(device),
            gru1:      GruConfig::new(self.embed_dim, self.state_size, true).init(device),
            gru2:      GruConfig::new(self.state_size, self.state_size, true).init(device),
            gru3:      GruConfig::new(self.state_size, self.state_size, true).init(device),
            dense:     LinearConfig::new(self.state_size, self.target_vocab_size).init(device),
        };
        Seq2SeqModel { encoder, decoder }
    }
}

/// Three stacked GRUs; the last hidden state of the top layer is
/// the thought vector.
#[derive(Module, Debug)]
pub struct Encoder<B: Backend> {
    pub embedding: Embedding<B>,
    pub gru1:      Gru<B>,
    pub gru2:      Gru<B>,
    pub gru3:      Gru<B>,
}

impl<B: Backend> Encoder<B> {
    /// tokens: [batch, seq_len] → thought: [batch, state_size]
    pub fn forward(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let x = self.embedding.forward(tokens);
        let x = self.gru1.forward(x, None);
        let x = self.gru2.forward(x, None);
        let x = self.gru3.forward(x, None); // [batch, seq_len, state_size]

        let [batch_size, seq_len, state_size] = x.dims();
        x.slice([0..batch_size, seq_len - 1..seq_len, 0..state_size])
            .reshape([batch_size, state_size])
    }
}

/// Three stacked GRUs, each seeded with the thought vector, followed
/// by a linear projection onto the destination vocabulary.
#[derive(Module, Debug)]
pub struct Decoder<B: Backend> {
    pub embedding: Embedding<B>,
    pub gru1:      Gru<B>,
    pub gru2:      Gru<B>,
    pub gru3:      Gru<B>,
    pub dense:     Linear<B>,
}

impl<B: Backend> Decoder<B> {
    /// tokens: [batch, seq_len], thought: [batch, state_size]
    /// → logits: [batch, seq_len, target_vocab_size]
    pub fn forward(&self, tokens: Tensor<B, 2, Int>, thought: Tensor<B, 2>) -> Tensor<B, 3> {
        let x = self.embedding.forward(tokens);
        let x = self.gru1.forward(x, Some(thought.clone()));
        let x = self.gru2.forward(x, Some(thought.clone()));
        let x = self.gru3.forward(x, Some(thought));
        self.dense.forward(x)
    }
}

#[derive(Module, Debug)]
pub struct Seq2SeqModel<B: Backend> {
    pub encoder: Encoder<B>,
    pub decoder: Decoder<B>,
}

impl<B: Backend> Seq2SeqModel<B> {
    /// Replace the encoder's embedding weights with `matrix`.
    pub fn with_source_embeddings(mut self, matrix: &EmbeddingMatrix, device: &B::Device) -> Self {
        let weight = Tensor::<B, 2>::from_data(
            TensorData::new(matrix.values.clone(), [matrix.rows, matrix.dim]),
            device,
        );
        self.encoder.embedding.weight = Param::from_tensor(weight);
        self
    }

    /// Teacher-forced forward pass → logits [batch, target_len, vocab]
    pub fn forward(
        &self,
        encoder_input: Tensor<B, 2, Int>,
        decoder_input: Tensor<B, 2, Int>,
    ) -> Tensor<B, 3> {
        let thought = self.encoder.forward(encoder_input);
        self.decoder.forward(decoder_input, thought)
    }

    /// Mean sparse cross-entropy over every decoder position,
    /// padding positions included.
    pub fn forward_loss(
        &self,
        encoder_input:  Tensor<B, 2, Int>,
        decoder_input:  Tensor<B, 2, Int>,
        decoder_target: Tensor<B, 2, Int>,
    ) -> Tensor<B, 1> {
        let logits = self.forward(encoder_input, decoder_input);
        let [batch_size, seq_len, vocab] = logits.dims();

        let logits  = logits.reshape([batch_size * seq_len, vocab]);
        let targets = decoder_target.reshape([batch_size * seq_len]);

        let ce = CrossEntropyLossConfig::new().init(&logits.device());
        ce.forward(logits, targets)
    }
}
