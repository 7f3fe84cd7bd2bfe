//! Common utilities for go-import metadata discovery.
//!
//! This crate provides shared infrastructure used by the tokenizer and the
//! discovery layer:
//! - **Warning System** - deduplicated, colored diagnostics on stderr
//! - **Charset Adapter** - maps a declared document encoding to a readable stream

pub mod charset;
pub mod warning;

pub use charset::{UnsupportedCharsetError, charset_reader};
