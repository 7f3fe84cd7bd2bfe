//! Charset adapter for documents that declare an explicit encoding.
//!
//! Discovery documents are read as UTF-8. When a document carries an
//! `<?xml ... encoding="..."?>` declaration naming something else, the
//! tokenizer hands its input to [`charset_reader`] to obtain a stream it can
//! keep reading as UTF-8.

use std::io::Read;

use thiserror::Error;

/// The document declared an encoding we have no decoder for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("can't decode XML document using charset {charset:?}")]
pub struct UnsupportedCharsetError {
    /// The encoding name exactly as the document declared it.
    pub charset: String,
}

/// Return a reader whose bytes can be consumed as UTF-8 text.
///
/// `"ascii"` (any case) is accepted and the input is returned untouched.
/// Bytes above 0x7F are not rejected here; the tokenizer decodes them
/// leniently.
///
/// # Errors
///
/// Returns [`UnsupportedCharsetError`] carrying `charset` for any other name.
pub fn charset_reader<R: Read>(charset: &str, input: R) -> Result<R, UnsupportedCharsetError> {
    if charset.eq_ignore_ascii_case("ascii") {
        Ok(input)
    } else {
        Err(UnsupportedCharsetError {
            charset: charset.to_string(),
        })
    }
}
