use std::collections::VecDeque;
use std::io::{self, Read};

use strum_macros::Display;

use super::input::CharReader;
use super::token::{TagBuilder, Token};

/// The tokenizer state machine.
///
/// Tag and attribute states follow
/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization);
/// everything that cannot contain a `<meta>` tag collapses into a skipping state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    AttributeValueDoubleQuoted,
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    AttributeValueSingleQuoted,
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    ///
    /// Also used for `<!DOCTYPE ...>` and other `<!...>` declarations.
    BogusComment,
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    MarkupDeclarationOpen,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    Comment,
    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    CDATASection,
    /// `<?target data?>`, collected so an XML declaration can switch charsets.
    ProcessingInstruction,
    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    CharacterReference,
}

/// A lenient, streaming markup tokenizer.
///
/// Characters are pulled from the reader only as the state machine needs
/// them, so the scan can stop at `<body>` without reading the rest of the
/// document. Malformed markup is logged and recovered from; the only
/// [`Token::Error`]s come from the reader or the charset adapter.
pub struct MarkupTokenizer<R> {
    pub(super) state: TokenizerState,
    pub(super) return_state: Option<TokenizerState>,
    pub(super) input: CharReader<R>,
    pub(super) lookahead: VecDeque<char>,
    pub(super) current_input_character: Option<char>,
    pub(super) current_tag: Option<TagBuilder>,
    pub(super) pending: VecDeque<Token>,
    // When true, the next step will not consume a new character.
    // "Reconsume in the X state" sets this flag.
    pub(super) reconsume: bool,
    pub(super) at_eof: bool,
    /// Set once the terminal token has been handed out.
    pub(super) finished: bool,
    pub(super) read_error: Option<io::Error>,

    /// Holds a character reference or processing instruction while it is
    /// being collected.
    pub(super) temporary_buffer: String,
}

impl<R: Read> MarkupTokenizer<R> {
    /// Create a new tokenizer reading from `input`.
    ///
    /// The input is assumed to be UTF-8 until an XML declaration says
    /// otherwise.
    pub fn new(input: R) -> Self {
        Self {
            state: TokenizerState::Data,
            return_state: None,
            input: CharReader::new(input),
            lookahead: VecDeque::new(),
            current_input_character: None,
            current_tag: None,
            pending: VecDeque::new(),
            reconsume: false,
            at_eof: false,
            finished: false,
            read_error: None,
            temporary_buffer: String::new(),
        }
    }

    /// Produce the next token.
    ///
    /// The stream ends with one `EndOfFile` or `Error`; any call after that
    /// returns `EndOfFile`.
    pub fn next_token(&mut self) -> Token {
        loop {
            if let Some(token) = self.pending.pop_front() {
                if token.is_terminal() {
                    self.finished = true;
                }
                return token;
            }
            if self.finished || self.at_eof {
                self.finished = true;
                return Token::EndOfFile;
            }
            self.step();
        }
    }

    /// Run one iteration of the state machine.
    fn step(&mut self) {
        // Each state begins by consuming the next input character,
        // unless we're reconsuming from a previous state transition.
        if self.reconsume {
            self.reconsume = false;
        } else {
            self.current_input_character = self.consume();
        }

        match self.state {
            TokenizerState::Data => self.handle_data_state(),
            TokenizerState::TagOpen => self.handle_tag_open_state(),
            TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
            TokenizerState::TagName => self.handle_tag_name_state(),
            TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
            TokenizerState::AttributeName => self.handle_attribute_name_state(),
            TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
            TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
            TokenizerState::AttributeValueDoubleQuoted => {
                self.handle_attribute_value_quoted_state('"');
            }
            TokenizerState::AttributeValueSingleQuoted => {
                self.handle_attribute_value_quoted_state('\'');
            }
            TokenizerState::AttributeValueUnquoted => self.handle_attribute_value_unquoted_state(),
            TokenizerState::AfterAttributeValueQuoted => {
                self.handle_after_attribute_value_quoted_state();
            }
            TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
            TokenizerState::BogusComment => self.handle_bogus_comment_state(),
            TokenizerState::MarkupDeclarationOpen => self.handle_markup_declaration_open_state(),
            TokenizerState::Comment => self.handle_comment_state(),
            TokenizerState::CDATASection => self.handle_cdata_section_state(),
            TokenizerState::ProcessingInstruction => self.handle_processing_instruction_state(),
            TokenizerState::CharacterReference => self.handle_character_reference_state(),
        }
    }

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    ///
    /// Text is not surfaced, so only `<` and EOF matter here.
    fn handle_data_state(&mut self) {
        match self.current_input_character {
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            None => self.emit_eof_token(),
            Some(_) => {}
        }
    }

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open_state(&mut self) {
        match self.current_input_character {
            // "U+0021 EXCLAMATION MARK (!) - Switch to the markup declaration open state."
            // NOTE: Reconsume so MarkupDeclarationOpen can peek ahead without
            // the main loop consuming a character first.
            Some('!') => self.reconsume_in(TokenizerState::MarkupDeclarationOpen),
            // "U+002F SOLIDUS (/) - Switch to the end tag open state."
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            // "ASCII alpha - Create a new start tag token. Reconsume in the tag name state."
            // XML names may also start with an underscore or a non-ASCII letter.
            Some(c) if c.is_alphabetic() || c == '_' => {
                self.current_tag = Some(TagBuilder::start());
                self.reconsume_in(TokenizerState::TagName);
            }
            Some('?') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ProcessingInstruction);
            }
            // "EOF - This is an eof-before-tag-name parse error."
            None => {
                self.log_parse_error();
                self.emit_eof_token();
            }
            // "Anything else - This is an invalid-first-character-of-tag-name
            // parse error. Reconsume in the data state."
            Some(_) => {
                self.log_parse_error();
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_alphabetic() || c == '_' => {
                self.current_tag = Some(TagBuilder::end());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-end-tag-name
            // parse error. Switch to the data state."
            Some('>') => {
                self.log_parse_error();
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.log_parse_error();
                self.emit_eof_token();
            }
            // "Anything else - This is an invalid-first-character-of-tag-name
            // parse error. Reconsume in the bogus comment state."
            Some(_) => {
                self.log_parse_error();
                self.reconsume_in(TokenizerState::BogusComment);
            }
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    ///
    /// Names keep their source case; matching is case-insensitive downstream.
    fn handle_tag_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => self.emit_current_tag(),
            Some('\0') => {
                self.log_parse_error();
                self.append_to_tag_name(char::REPLACEMENT_CHARACTER);
            }
            // "EOF - This is an eof-in-tag parse error. Emit an end-of-file token."
            None => {
                self.log_parse_error();
                self.emit_eof_token();
            }
            Some(c) => self.append_to_tag_name(c),
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            // "U+003D EQUALS SIGN (=) - This is an unexpected-equals-sign-before-attribute-name
            // parse error. Start a new attribute whose name is the current input character."
            Some('=') => {
                self.log_parse_error();
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.start_new_attribute();
                    tag.append_to_current_attribute_name('=');
                }
                self.switch_to(TokenizerState::AttributeName);
            }
            Some(_) => {
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.start_new_attribute();
                }
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn handle_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.check_duplicate_attribute();
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('/' | '>') | None => {
                self.check_duplicate_attribute();
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('=') => {
                self.check_duplicate_attribute();
                self.switch_to(TokenizerState::BeforeAttributeValue);
            }
            Some('\0') => {
                self.log_parse_error();
                self.append_to_attribute_name(char::REPLACEMENT_CHARACTER);
            }
            // "U+0022 QUOTATION MARK, U+0027 APOSTROPHE, U+003C LESS-THAN SIGN -
            // This is an unexpected-character-in-attribute-name parse error.
            // Treat it as per the 'anything else' entry below."
            Some(c @ ('"' | '\'' | '<')) => {
                self.log_parse_error();
                self.append_to_attribute_name(c);
            }
            Some(c) => self.append_to_attribute_name(c),
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn handle_after_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => self.emit_current_tag(),
            None => {
                self.log_parse_error();
                self.emit_eof_token();
            }
            Some(_) => {
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.start_new_attribute();
                }
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn handle_before_attribute_value_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('"') => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
            Some('\'') => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-attribute-value
            // parse error. Emit the current tag token."
            Some('>') => {
                self.log_parse_error();
                self.emit_current_tag();
            }
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// [§ 13.2.5.36](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    /// and [§ 13.2.5.37](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state),
    /// which differ only in the closing quote.
    fn handle_attribute_value_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            Some('&') => {
                self.return_state = Some(self.state);
                self.begin_character_reference();
            }
            Some('\0') => {
                self.log_parse_error();
                self.append_to_attribute_value(char::REPLACEMENT_CHARACTER);
            }
            None => {
                self.log_parse_error();
                self.emit_eof_token();
            }
            Some(c) => self.append_to_attribute_value(c),
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    ///
    /// Unlike HTML, a `/` directly before `>` closes the tag, so
    /// `<meta name=go-import/>` keeps the value `go-import`.
    fn handle_attribute_value_unquoted_state(&mut self) {
        let current = self.current_input_character;
        match current {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') if self.next_few_characters_are(">") => {
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            Some('&') => {
                self.return_state = Some(TokenizerState::AttributeValueUnquoted);
                self.begin_character_reference();
            }
            Some('>') => self.emit_current_tag(),
            Some('\0') => {
                self.log_parse_error();
                self.append_to_attribute_value(char::REPLACEMENT_CHARACTER);
            }
            Some(c @ ('"' | '\'' | '<' | '=' | '`')) => {
                self.log_parse_error();
                self.append_to_attribute_value(c);
            }
            None => {
                self.log_parse_error();
                self.emit_eof_token();
            }
            Some(c) => self.append_to_attribute_value(c),
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn handle_after_attribute_value_quoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => self.emit_current_tag(),
            None => {
                self.log_parse_error();
                self.emit_eof_token();
            }
            // "Anything else - This is a missing-whitespace-between-attributes
            // parse error. Reconsume in the before attribute name state."
            Some(_) => {
                self.log_parse_error();
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn handle_self_closing_start_tag_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.self_closing = !tag.is_end;
                }
                self.emit_current_tag();
            }
            None => {
                self.log_parse_error();
                self.emit_eof_token();
            }
            Some(_) => {
                self.log_parse_error();
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    fn handle_markup_declaration_open_state(&mut self) {
        // "If the next two characters are both U+002D HYPHEN-MINUS characters (-),
        // consume those two characters ... and switch to the comment start state."
        if self.next_few_characters_are("--") {
            self.consume_string("--");
            self.switch_to(TokenizerState::Comment);
        }
        // "Otherwise, if the next seven characters are an ASCII case-insensitive
        // match for the word 'DOCTYPE'". Nothing in a DOCTYPE matters here.
        else if self.next_few_characters_are_case_insensitive("DOCTYPE") {
            self.consume_string("DOCTYPE");
            self.switch_to(TokenizerState::BogusComment);
        } else if self.next_few_characters_are("[CDATA[") {
            self.consume_string("[CDATA[");
            self.switch_to(TokenizerState::CDATASection);
        }
        // "Otherwise, this is an incorrectly-opened-comment parse error."
        else {
            self.log_parse_error();
            self.switch_to(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    fn handle_bogus_comment_state(&mut self) {
        match self.current_input_character {
            Some('>') => self.switch_to(TokenizerState::Data),
            None => self.emit_eof_token(),
            Some(_) => {}
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    fn handle_comment_state(&mut self) {
        let current = self.current_input_character;
        match current {
            Some('-') if self.next_few_characters_are("->") => {
                self.consume_string("->");
                self.switch_to(TokenizerState::Data);
            }
            // "EOF - This is an eof-in-comment parse error."
            None => {
                self.log_parse_error();
                self.emit_eof_token();
            }
            Some(_) => {}
        }
    }

    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    fn handle_cdata_section_state(&mut self) {
        let current = self.current_input_character;
        match current {
            Some(']') if self.next_few_characters_are("]>") => {
                self.consume_string("]>");
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.log_parse_error();
                self.emit_eof_token();
            }
            Some(_) => {}
        }
    }

    /// Collect `<?target data?>` and act on an XML declaration.
    fn handle_processing_instruction_state(&mut self) {
        let current = self.current_input_character;
        match current {
            Some('?') if self.next_few_characters_are(">") => {
                self.consume_string(">");
                self.switch_to(TokenizerState::Data);
                let instruction = std::mem::take(&mut self.temporary_buffer);
                self.process_instruction(&instruction);
            }
            None => {
                self.log_parse_error();
                self.emit_eof_token();
            }
            Some(c) => self.temporary_buffer.push(c),
        }
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    ///
    /// Only reached from attribute values; the reference is collected into
    /// the temporary buffer and resolved once it ends.
    fn handle_character_reference_state(&mut self) {
        match self.current_input_character {
            Some(c) if (c.is_ascii_alphanumeric() || c == '#') && self.reference_has_room() => {
                self.temporary_buffer.push(c);
            }
            Some(';') => {
                self.temporary_buffer.push(';');
                self.flush_character_reference(true);
                let return_state = self.take_return_state();
                self.switch_to(return_state);
            }
            next => {
                // "If the character reference was consumed as part of an attribute
                // ... and the next input character is either a U+003D EQUALS SIGN
                // character (=) or an ASCII alphanumeric, then, for historical
                // reasons, flush code points consumed as a character reference."
                let decode = next != Some('=');
                self.flush_character_reference(decode);
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
        }
    }

    fn take_return_state(&mut self) -> TokenizerState {
        self.return_state
            .take()
            .unwrap_or(TokenizerState::AttributeValueUnquoted)
    }
}

impl<R: Read> Iterator for MarkupTokenizer<R> {
    type Item = Token;

    /// Yields every token up to and including the terminal one.
    fn next(&mut self) -> Option<Token> {
        if self.finished {
            None
        } else {
            Some(self.next_token())
        }
    }
}
