//! Integration tests for the markup tokenizer.

use std::io::{self, Read};

use gometa_common::warning::was_warned;
use gometa_html::{MarkupTokenizer, Token, TokenizeError, attribute_value, fold_eq};

/// Helper to tokenize bytes and return every token, including the terminal one
fn tokenize_bytes(input: &[u8]) -> Vec<Token> {
    MarkupTokenizer::new(input).collect()
}

fn tokenize(input: &str) -> Vec<Token> {
    tokenize_bytes(input.as_bytes())
}

/// Render tokens compactly so whole streams can be compared at once
fn render(tokens: &[Token]) -> Vec<String> {
    tokens.iter().map(ToString::to_string).collect()
}

/// A reader that serves `data` and then fails
struct FailingReader<'a> {
    data: &'a [u8],
}

impl Read for FailingReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.data.is_empty() {
            return Err(io::Error::other("connection reset"));
        }
        self.data.read(buf)
    }
}

/// A reader that is interrupted before every successful read
struct InterruptingReader<'a> {
    data: &'a [u8],
    interrupt_next: bool,
}

impl Read for InterruptingReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.interrupt_next = !self.interrupt_next;
        if self.interrupt_next {
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }
        let one = buf.len().min(1);
        self.data.read(&mut buf[..one])
    }
}

#[test]
fn test_empty_input() {
    let tokens = tokenize("");
    assert_eq!(tokens.len(), 1);
    assert!(matches!(tokens[0], Token::EndOfFile));
}

#[test]
fn test_text_is_not_emitted() {
    let tokens = tokenize("Hello, world");
    assert_eq!(tokens.len(), 1);
    assert!(matches!(tokens[0], Token::EndOfFile));
}

#[test]
fn test_start_tag() {
    let tokens = tokenize("<div>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name.local, "div");
            assert_eq!(name.prefix, None);
            assert!(!self_closing);
            assert!(attributes.is_empty());
        }
        other => panic!("Expected StartTag token, got {other}"),
    }
    assert!(matches!(tokens[1], Token::EndOfFile));
}

#[test]
fn test_end_tag() {
    let tokens = tokenize("</head>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::EndTag { name } => assert!(name.is("head")),
        other => panic!("Expected EndTag token, got {other}"),
    }
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize(r#"<meta name="a"/>"#);
    match &tokens[0] {
        Token::StartTag {
            name, self_closing, ..
        } => {
            assert_eq!(name.local, "meta");
            assert!(self_closing);
        }
        other => panic!("Expected self-closing StartTag token, got {other}"),
    }
}

#[test]
fn test_name_case_is_preserved() {
    let tokens = tokenize("<META><Body>");
    assert_eq!(render(&tokens), vec!["<META>", "<Body>", "EOF"]);
    match &tokens[0] {
        Token::StartTag { name, .. } => assert!(name.is("meta")),
        other => panic!("Expected StartTag token, got {other}"),
    }
}

#[test]
fn test_attribute_quoting_styles() {
    let tokens = tokenize(r#"<meta name="go-import" content='a b c' data=x>"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 3);
            assert_eq!(attributes[0].name.local, "name");
            assert_eq!(attributes[0].value, "go-import");
            assert_eq!(attributes[1].value, "a b c");
            assert_eq!(attributes[2].name.local, "data");
            assert_eq!(attributes[2].value, "x");
        }
        other => panic!("Expected StartTag token, got {other}"),
    }
}

#[test]
fn test_valueless_attribute() {
    let tokens = tokenize("<input disabled>");
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 1);
            assert_eq!(attributes[0].name.local, "disabled");
            assert_eq!(attributes[0].value, "");
        }
        other => panic!("Expected StartTag token, got {other}"),
    }
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    let tokens = tokenize(r#"<meta name="first" name="second" content="c">"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 2);
            assert_eq!(attributes[0].value, "first");
            assert_eq!(attributes[1].name.local, "content");
            assert_eq!(attributes[1].value, "c");
        }
        other => panic!("Expected StartTag token, got {other}"),
    }
}

#[test]
fn test_differently_cased_attributes_are_both_kept() {
    let tokens = tokenize(r#"<meta NAME="upper" name="lower">"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 2);
            assert_eq!(attribute_value(attributes, "name"), Some("upper"));
        }
        other => panic!("Expected StartTag token, got {other}"),
    }
}

#[test]
fn test_namespaced_names() {
    let tokens = tokenize(r#"<og:meta xml:lang="en" :odd="1">"#);
    match &tokens[0] {
        Token::StartTag {
            name, attributes, ..
        } => {
            assert_eq!(name.prefix.as_deref(), Some("og"));
            assert_eq!(name.local, "meta");
            assert_eq!(attributes[0].name.prefix.as_deref(), Some("xml"));
            assert_eq!(attributes[0].name.local, "lang");
            assert_eq!(attributes[1].name.prefix, None);
            assert_eq!(attributes[1].name.local, ":odd");
        }
        other => panic!("Expected StartTag token, got {other}"),
    }
    assert_eq!(render(&tokens)[0], r#"<og:meta xml:lang="en" :odd="1">"#);
}

#[test]
fn test_attribute_lookup_ignores_case_and_prefix() {
    let tokens = tokenize(r#"<meta x:Content="v" other="o">"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attribute_value(attributes, "content"), Some("v"));
            assert_eq!(attribute_value(attributes, "CONTENT"), Some("v"));
            assert_eq!(attribute_value(attributes, "missing"), None);
        }
        other => panic!("Expected StartTag token, got {other}"),
    }
}

#[test]
fn test_comments_and_declarations_are_skipped() {
    let tokens = tokenize(
        "<!DOCTYPE html><!-- <meta name=\"hidden\"> --><![CDATA[<b>]]><!weird><p>",
    );
    assert_eq!(render(&tokens), vec!["<p>", "EOF"]);
}

#[test]
fn test_empty_comment() {
    let tokens = tokenize("<!----><p>");
    assert_eq!(render(&tokens), vec!["<p>", "EOF"]);
}

#[test]
fn test_unclosed_title_does_not_hide_later_tags() {
    let tokens = tokenize(r#"<head><title>pkg<meta name="go-import" content="a git b"></head>"#);
    assert_eq!(
        render(&tokens),
        vec![
            "<head>",
            "<title>",
            r#"<meta name="go-import" content="a git b">"#,
            "</head>",
            "EOF"
        ]
    );
}

#[test]
fn test_script_content_is_tokenized_leniently() {
    let tokens = tokenize("<script>if (a < b && c) {}</script><p>");
    assert_eq!(render(&tokens), vec!["<script>", "</script>", "<p>", "EOF"]);
}

#[test]
fn test_unquoted_value_before_self_closing_slash() {
    let tokens = tokenize("<meta name=go-import/><a href=x/y>");
    assert_eq!(
        render(&tokens),
        vec![r#"<meta name="go-import" />"#, r#"<a href="x/y">"#, "EOF"]
    );
}

#[test]
fn test_parse_errors_are_reported_once_per_state() {
    let _ = tokenize("<head> < a < b < c </head>");
    assert!(was_warned("Markup Tokenizer", "parse error in TagOpen state"));
}

#[test]
fn test_character_references_in_attribute_values() {
    let tokens = tokenize(r#"<meta content="a&amp;b &#x2F; &#47; &lt &bogus; & z">"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes[0].value, "a&b / / < &bogus; & z");
        }
        other => panic!("Expected StartTag token, got {other}"),
    }
}

#[test]
fn test_legacy_reference_before_equals_is_literal() {
    let tokens = tokenize("<a href=x?a&amp=1>");
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes[0].value, "x?a&amp=1");
        }
        other => panic!("Expected StartTag token, got {other}"),
    }
}

#[test]
fn test_stray_less_than_is_tolerated() {
    let tokens = tokenize("a < b <= c </ > <p>");
    assert_eq!(render(&tokens), vec!["<p>", "EOF"]);
}

#[test]
fn test_unterminated_tag_is_dropped() {
    let tokens = tokenize(r#"<head><meta name="go-import" content="a b c"#);
    assert_eq!(render(&tokens), vec!["<head>", "EOF"]);
}

#[test]
fn test_invalid_utf8_becomes_replacement_character() {
    let tokens = tokenize_bytes(b"<p data=\"\xff\xc3(\">");
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes[0].value, "\u{FFFD}\u{FFFD}(");
        }
        other => panic!("Expected StartTag token, got {other}"),
    }
}

#[test]
fn test_multibyte_utf8_is_decoded() {
    let tokens = tokenize("<p data=\"héllo ✓\">");
    match &tokens[0] {
        Token::StartTag { attributes, .. } => assert_eq!(attributes[0].value, "héllo ✓"),
        other => panic!("Expected StartTag token, got {other}"),
    }
}

#[test]
fn test_nul_in_names_and_values() {
    let tokens = tokenize("<p\0 a=\"\0\">");
    match &tokens[0] {
        Token::StartTag {
            name, attributes, ..
        } => {
            assert_eq!(name.local, "p\u{FFFD}");
            assert_eq!(attributes[0].value, "\u{FFFD}");
        }
        other => panic!("Expected StartTag token, got {other}"),
    }
}

#[test]
fn test_ascii_declaration_is_accepted() {
    let tokens = tokenize_bytes(b"<?xml version=\"1.0\" encoding=\"ASCII\"?><p data=\"\xe9\">");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => assert_eq!(attributes[0].value, "\u{FFFD}"),
        other => panic!("Expected StartTag token, got {other}"),
    }
}

#[test]
fn test_utf8_declaration_is_accepted() {
    let tokens = tokenize("<?xml version='1.0' encoding='UTF-8'?><p>");
    assert_eq!(render(&tokens), vec!["<p>", "EOF"]);
}

#[test]
fn test_unsupported_declaration_ends_stream_with_error() {
    let tokens = tokenize("<?xml version=\"1.0\" encoding=\"iso-8859-1\"?><p>");
    assert_eq!(tokens.len(), 1);
    match &tokens[0] {
        Token::Error(TokenizeError::UnsupportedCharset(err)) => {
            assert_eq!(err.charset, "iso-8859-1");
        }
        other => panic!("Expected charset error, got {other}"),
    }
}

#[test]
fn test_other_processing_instructions_are_ignored() {
    let tokens = tokenize("<?php echo encoding=\"latin1\" ?><?xml version=\"1.0\"?><p>");
    assert_eq!(render(&tokens), vec!["<p>", "EOF"]);
}

#[test]
fn test_read_error_after_tokens() {
    let reader = FailingReader {
        data: b"<head><meta name=\"x\"><p",
    };
    let tokens: Vec<Token> = MarkupTokenizer::new(reader).collect();
    assert_eq!(tokens.len(), 3);
    assert_eq!(render(&tokens[..2]), vec!["<head>", "<meta name=\"x\">"]);
    assert!(matches!(tokens[2], Token::Error(TokenizeError::Io(_))));
}

#[test]
fn test_interrupted_reads_are_retried() {
    let reader = InterruptingReader {
        data: b"<head></head>",
        interrupt_next: false,
    };
    let tokens: Vec<Token> = MarkupTokenizer::new(reader).collect();
    assert_eq!(render(&tokens), vec!["<head>", "</head>", "EOF"]);
}

#[test]
fn test_stream_stays_finished() {
    let mut tokenizer = MarkupTokenizer::new(&b"<p>"[..]);
    assert!(matches!(tokenizer.next_token(), Token::StartTag { .. }));
    assert!(matches!(tokenizer.next_token(), Token::EndOfFile));
    assert!(matches!(tokenizer.next_token(), Token::EndOfFile));
    assert!(tokenizer.next().is_none());
}

#[test]
fn test_fold_eq() {
    assert!(fold_eq("META", "meta"));
    assert!(fold_eq("Go-Import", "go-import"));
    assert!(fold_eq("ÉTÉ", "été"));
    assert!(!fold_eq("meta", "metas"));
    assert!(!fold_eq("", "a"));
}
