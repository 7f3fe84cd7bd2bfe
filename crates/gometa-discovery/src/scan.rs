use std::io::Read;

use gometa_common::warning::warn_once;
use gometa_html::{Attribute, MarkupTokenizer, Token, TokenizeError, attribute_value, fold_eq};

use crate::meta_import::MetaImport;

/// The `name` attribute value that marks a discovery tag.
const GO_IMPORT: &str = "go-import";

/// Collect every well-formed go-import tag in the document's `<head>`.
///
/// Scanning stops at the first `<body>` start tag, the first `</head>` end
/// tag, or the end of input. Entries are returned in document order with
/// `mod` entries included; [`resolve_meta_imports`](crate::resolve_meta_imports)
/// decides what to do with them.
///
/// A failed read ends the scan with whatever was collected so far, possibly
/// nothing.
///
/// # Errors
///
/// Returns [`TokenizeError::UnsupportedCharset`] if the document declares a
/// charset the adapter refuses before any entry was collected. Once at
/// least one entry has been found, the refusal is logged and the entries
/// are returned.
pub fn scan_meta_imports<R: Read>(input: R) -> Result<Vec<MetaImport>, TokenizeError> {
    let mut tokenizer = MarkupTokenizer::new(input);
    let mut imports = Vec::new();

    loop {
        match tokenizer.next_token() {
            Token::EndOfFile => break,
            Token::Error(err @ TokenizeError::UnsupportedCharset(_)) if imports.is_empty() => {
                return Err(err);
            }
            Token::Error(err) => {
                warn_once("Meta Scanner", &format!("scan stopped early: {err}"));
                break;
            }
            Token::StartTag { name, .. } if name.is("body") => break,
            Token::EndTag { name } if name.is("head") => break,
            Token::StartTag {
                name, attributes, ..
            } if name.is("meta") => {
                if let Some(import) = meta_import_from_attributes(&attributes) {
                    imports.push(import);
                }
            }
            Token::StartTag { .. } | Token::EndTag { .. } => {}
        }
    }

    Ok(imports)
}

/// Turn a `<meta>` tag's attributes into a discovery record, if it is one.
///
/// The tag must carry `name="go-import"` and a `content` of exactly three
/// fields; anything else is not an error, just not a record.
#[must_use]
pub fn meta_import_from_attributes(attributes: &[Attribute]) -> Option<MetaImport> {
    let name = attribute_value(attributes, "name")?;
    if !fold_eq(name, GO_IMPORT) {
        return None;
    }
    let content = attribute_value(attributes, "content").unwrap_or_default();
    let import = MetaImport::from_content(content);
    if import.is_none() {
        let fields = content.split_whitespace().count();
        warn_once("Meta Scanner", &format!("ignoring go-import tag with {fields} fields"));
    }
    import
}
