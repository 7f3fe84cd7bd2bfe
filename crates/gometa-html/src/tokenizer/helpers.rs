//! Helper functions for the markup tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("Switch to", "Reconsume in")
//! - Input/character handling ("Consume the next input character")
//! - Token emission ("Emit the current token")
//! - XML declaration handling

use std::io::Read;

use gometa_common::warning::warn_once;

use super::machine::{MarkupTokenizer, TokenizerState};
use super::token::{TagBuilder, Token, fold_eq};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl<R: Read> MarkupTokenizer<R> {
    /// "Switch to the X state"
    ///
    /// The next character will be consumed on the next step.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// The same character will be processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl<R: Read> MarkupTokenizer<R> {
    /// Pull one character from the reader. A read error is parked in
    /// `read_error` and reported as end of input.
    fn read_char(&mut self) -> Option<char> {
        if self.read_error.is_some() {
            return None;
        }
        match self.input.next_char() {
            Ok(c) => c,
            Err(err) => {
                self.read_error = Some(err);
                None
            }
        }
    }

    /// "Consume the next input character"
    ///
    /// Returns None at the end of input.
    pub(super) fn consume(&mut self) -> Option<char> {
        self.lookahead.pop_front().or_else(|| self.read_char())
    }

    /// Peek at a codepoint at the given offset from the current position
    /// without consuming it. Reads ahead from the input as needed.
    pub(super) fn peek_codepoint(&mut self, offset: usize) -> Option<char> {
        while self.lookahead.len() <= offset {
            let c = self.read_char()?;
            self.lookahead.push_back(c);
        }
        self.lookahead.get(offset).copied()
    }

    /// "If the next few characters are..."
    pub(super) fn next_few_characters_are(&mut self, target: &str) -> bool {
        target
            .chars()
            .enumerate()
            .all(|(i, expected)| self.peek_codepoint(i) == Some(expected))
    }

    /// "ASCII case-insensitive match for the word 'DOCTYPE'"
    pub(super) fn next_few_characters_are_case_insensitive(&mut self, target: &str) -> bool {
        target.chars().enumerate().all(|(i, expected)| {
            self.peek_codepoint(i)
                .is_some_and(|c| c.eq_ignore_ascii_case(&expected))
        })
    }

    /// Consume the given string from the input.
    /// Caller must have already verified the characters are present.
    pub(super) fn consume_string(&mut self, target: &str) {
        for _ in target.chars() {
            let _ = self.consume();
        }
    }

    /// [ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    ///
    /// CR is included since the input is not newline-normalized.
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C' | '\r')
    }
}

// =============================================================================
// Tag Construction Helpers
// =============================================================================

impl<R: Read> MarkupTokenizer<R> {
    /// "Append the current input character to the current tag token's tag name."
    pub(super) fn append_to_tag_name(&mut self, c: char) {
        if let Some(tag) = self.current_tag.as_mut() {
            tag.name.push(c);
        }
    }

    /// "Append the current input character to the current attribute's name."
    pub(super) fn append_to_attribute_name(&mut self, c: char) {
        if let Some(tag) = self.current_tag.as_mut() {
            tag.append_to_current_attribute_name(c);
        }
    }

    /// "Append the current input character to the current attribute's value."
    pub(super) fn append_to_attribute_value(&mut self, c: char) {
        if let Some(tag) = self.current_tag.as_mut() {
            tag.append_to_current_attribute_value(c);
        }
    }

    /// "When the user agent leaves the attribute name state ... if there is
    /// already an attribute on the token with the exact same name, then this
    /// is a duplicate-attribute parse error and the new attribute must be
    /// removed from the token."
    pub(super) fn check_duplicate_attribute(&mut self) {
        let duplicate = self
            .current_tag
            .as_mut()
            .is_some_and(TagBuilder::mark_duplicate_attribute);
        if duplicate {
            self.log_parse_error();
        }
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl<R: Read> MarkupTokenizer<R> {
    /// "Switch to the data state. Emit the current tag token."
    ///
    /// Every element's content goes back through the data state, so an
    /// unclosed `<title>` or `<script>` never hides the tags after it.
    pub(super) fn emit_current_tag(&mut self) {
        self.switch_to(TokenizerState::Data);
        if let Some(tag) = self.current_tag.take() {
            self.pending.push_back(tag.into_token());
        }
    }

    /// "Emit an end-of-file token."
    ///
    /// A parked read error is emitted in its place. Any tag still under
    /// construction is dropped.
    pub(super) fn emit_eof_token(&mut self) {
        self.current_tag = None;
        let token = self
            .read_error
            .take()
            .map_or(Token::EndOfFile, |err| Token::Error(err.into()));
        self.pending.push_back(token);
        self.at_eof = true;
    }
}

// =============================================================================
// XML Declaration Handling
// =============================================================================

impl<R: Read> MarkupTokenizer<R> {
    /// Act on a completed `<?target data?>`.
    ///
    /// Only `<?xml ...?>` matters: a declared encoding other than UTF-8 is
    /// handed to the charset adapter, and a refusal ends the stream with an
    /// error.
    pub(super) fn process_instruction(&mut self, instruction: &str) {
        let (target, data) = instruction
            .split_once(Self::is_whitespace_char)
            .unwrap_or((instruction, ""));
        if !fold_eq(target, "xml") {
            return;
        }
        let Some(charset) = declared_encoding(data) else {
            return;
        };
        if fold_eq(charset, "utf-8") || fold_eq(charset, "utf8") {
            return;
        }
        if let Err(err) = self.input.reencode(charset) {
            warn_once("Markup Tokenizer", &err.to_string());
            self.lookahead.clear();
            self.current_tag = None;
            self.pending.push_back(Token::Error(err.into()));
            self.at_eof = true;
        }
    }

    /// Logs a parse error. Parse errors are never fatal; the tokenizer
    /// recovers and continues.
    ///
    /// Reported once per state, like the other `warn_once` call sites.
    pub(super) fn log_parse_error(&self) {
        let state = self.state;
        warn_once("Markup Tokenizer", &format!("parse error in {state} state"));
    }
}

/// Extract the `encoding` pseudo-attribute from the body of an XML declaration.
fn declared_encoding(data: &str) -> Option<&str> {
    let mut rest = data;
    while let Some(at) = rest.find("encoding") {
        let after = rest[at + "encoding".len()..].trim_start();
        rest = &rest[at + "encoding".len()..];
        let Some(after) = after.strip_prefix('=') else {
            continue;
        };
        let after = after.trim_start();
        let quote = after.chars().next().filter(|q| *q == '"' || *q == '\'')?;
        let value = &after[1..];
        return value.find(quote).map(|end| &value[..end]);
    }
    None
}
