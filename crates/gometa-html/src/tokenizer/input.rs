//! Character source for the tokenizer.
//!
//! Decodes UTF-8 one code point at a time from a buffered reader. Invalid
//! sequences decode to U+FFFD instead of failing, so documents that are only
//! mostly UTF-8 (or ASCII with stray high bytes) still tokenize.

use std::io::{self, BufRead, BufReader, ErrorKind, Read};

use gometa_common::{UnsupportedCharsetError, charset_reader};

pub(super) struct CharReader<R> {
    /// `None` once the charset adapter refused the stream.
    inner: Option<BufReader<R>>,
    pushback: Option<u8>,
}

impl<R: Read> CharReader<R> {
    pub(super) fn new(input: R) -> Self {
        Self {
            inner: Some(BufReader::new(input)),
            pushback: None,
        }
    }

    /// Route the remaining input through the charset adapter for `charset`.
    ///
    /// On failure the source is dropped and every later read reports EOF.
    pub(super) fn reencode(&mut self, charset: &str) -> Result<(), UnsupportedCharsetError> {
        if let Some(inner) = self.inner.take() {
            self.inner = Some(charset_reader(charset, inner)?);
        }
        Ok(())
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(byte) = self.pushback.take() {
            return Ok(Some(byte));
        }
        let Some(inner) = self.inner.as_mut() else {
            return Ok(None);
        };
        loop {
            match inner.fill_buf() {
                Ok(buf) => {
                    let byte = buf.first().copied();
                    if byte.is_some() {
                        inner.consume(1);
                    }
                    return Ok(byte);
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
    }

    /// Read the next code point, or `None` at end of input.
    pub(super) fn next_char(&mut self) -> io::Result<Option<char>> {
        let Some(lead) = self.next_byte()? else {
            return Ok(None);
        };
        let width = match lead {
            0x00..=0x7F => return Ok(Some(char::from(lead))),
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return Ok(Some(char::REPLACEMENT_CHARACTER)),
        };

        let mut buf = [lead, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            match self.next_byte()? {
                Some(byte) if byte & 0xC0 == 0x80 => *slot = byte,
                Some(byte) => {
                    // Not a continuation byte; it starts the next character.
                    self.pushback = Some(byte);
                    return Ok(Some(char::REPLACEMENT_CHARACTER));
                }
                None => return Ok(Some(char::REPLACEMENT_CHARACTER)),
            }
        }

        Ok(std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .or(Some(char::REPLACEMENT_CHARACTER)))
    }
}
