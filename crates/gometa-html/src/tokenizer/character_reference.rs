//! Character reference helpers for the markup tokenizer.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! References are only decoded inside attribute values, which is where a
//! `content` attribute may carry `&amp;` or `&#32;`.

use std::io::Read;

use super::machine::{MarkupTokenizer, TokenizerState};
use super::named_character_references::lookup_entity;

/// Longest reference we keep collecting before giving up on it.
const MAX_REFERENCE_LEN: usize = 32;

impl<R: Read> MarkupTokenizer<R> {
    /// "Set the temporary buffer to the empty string. Append a U+0026
    /// AMPERSAND (&) character to the temporary buffer."
    pub(super) fn begin_character_reference(&mut self) {
        self.temporary_buffer.clear();
        self.temporary_buffer.push('&');
        self.switch_to(TokenizerState::CharacterReference);
    }

    pub(super) fn reference_has_room(&self) -> bool {
        self.temporary_buffer.len() < MAX_REFERENCE_LEN
    }

    /// "Flush code points consumed as a character reference"
    ///
    /// Appends the decoded reference to the current attribute value, or the
    /// raw text when it does not resolve (or `decode` is false).
    pub(super) fn flush_character_reference(&mut self, decode: bool) {
        let buffer = std::mem::take(&mut self.temporary_buffer);
        let decoded = if decode {
            decode_character_reference(&buffer)
        } else {
            None
        };
        if decoded.is_none() && decode && buffer.len() > 1 {
            self.log_parse_error();
        }
        for c in decoded.as_deref().unwrap_or(buffer.as_str()).chars() {
            self.append_to_attribute_value(c);
        }
    }
}

/// Resolve `&name;`, `&#123;` or `&#x7B;` (trailing semicolon optional).
///
/// Numeric references to NUL or outside the Unicode range decode to
/// U+FFFD. Returns None for anything unrecognised.
pub(super) fn decode_character_reference(reference: &str) -> Option<String> {
    let body = reference.strip_prefix('&')?;
    if let Some(number) = body.strip_prefix('#') {
        let number = number.strip_suffix(';').unwrap_or(number);
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        let c = char::from_u32(code)
            .filter(|c| *c != '\0')
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        return Some(c.to_string());
    }
    lookup_entity(body).map(str::to_string)
}
