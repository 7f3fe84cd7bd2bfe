//! Lenient markup tokenizer for go-import metadata discovery.
//!
//! # Scope
//!
//! This crate implements a forgiving, streaming tokenizer modelled on the
//! [WHATWG tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! state machine, trimmed to what is needed to find `<meta>` tags:
//! - Start and end tags with namespace-aware names
//! - Attribute parsing (quoted, unquoted, valueless) with character references
//! - Comments, declarations, CDATA and processing instructions are skipped
//! - Element content is scanned as-is, so an unclosed element hides nothing
//! - `<?xml encoding="..."?>` declarations are routed through the charset adapter
//!
//! Only element boundaries are emitted. Text content is never surfaced.

/// Error type produced by the tokenizer.
pub mod error;
/// Markup tokenizer for converting a byte stream into tag tokens.
pub mod tokenizer;

pub use error::TokenizeError;
pub use tokenizer::{Attribute, MarkupTokenizer, QualifiedName, Token, attribute_value, fold_eq};
