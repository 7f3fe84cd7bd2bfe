use std::io;

use gometa_common::UnsupportedCharsetError;
use thiserror::Error;

/// A failure that stops the tokenizer from reading any further.
///
/// Malformed markup is never reported here; the tokenizer recovers from it.
#[derive(Debug, Error)]
pub enum TokenizeError {
    /// The document declared an encoding that cannot be decoded.
    #[error(transparent)]
    UnsupportedCharset(#[from] UnsupportedCharsetError),

    /// The underlying reader failed.
    #[error("read error: {0}")]
    Io(#[from] io::Error),
}
