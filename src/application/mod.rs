// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Orchestrates the other layers for one goal each:
// training a model, or translating a sentence with one.
//
// Rules for this layer:
//   - No model code here (that's Layer 5)
//   - No argument parsing (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// The translation workflow
pub mod translate_use_case;
