// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust structs, enums and traits describing what the
// translation system works with.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, traits and the greedy
//     decoding state machine, which only talks to the model
//     through the Seq2Seq trait
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A parallel (source, destination) sentence pair
pub mod sentence_pair;

// Core abstractions (traits) that other layers implement
pub mod traits;

// Typed errors for vocabulary, configuration and decoding
pub mod error;

// Greedy autoregressive decoding loop
pub mod greedy_decoder;
