//! Markup tokenizer module.
//!
//! A streaming, error-tolerant subset of
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization).

/// Character reference decoding inside attribute values.
mod character_reference;
/// Helper methods for tokenizer state transitions.
mod helpers;
/// Lenient UTF-8 character source.
mod input;
/// Tokenizer state machine implementation.
pub mod machine;
/// Named character reference lookup table.
mod named_character_references;
/// Token types produced by the tokenizer.
pub mod token;

pub use machine::{MarkupTokenizer, TokenizerState};
pub use token::{Attribute, QualifiedName, Token, attribute_value, fold_eq};
