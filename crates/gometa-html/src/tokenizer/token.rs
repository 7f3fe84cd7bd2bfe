use std::fmt;

use crate::error::TokenizeError;

/// Compare two names the way discovery compares element names, attribute
/// names and the `go-import` marker: equal after lowercase folding.
#[must_use]
pub fn fold_eq(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// An element or attribute name, split into an optional namespace prefix and
/// a local part.
///
/// `og:title` has prefix `og` and local name `title`. A colon at either end
/// does not split, so `:x` and `x:` are local names in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    /// The namespace prefix before the first colon, if any.
    pub prefix: Option<String>,
    /// The local (unprefixed) name.
    pub local: String,
}

impl QualifiedName {
    /// Split a raw name as it appeared in the markup.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() => Self {
                prefix: Some(prefix.to_string()),
                local: local.to_string(),
            },
            _ => Self {
                prefix: None,
                local: raw.to_string(),
            },
        }
    }

    /// Returns true if the local name fold-equals `local`.
    #[must_use]
    pub fn is(&self, local: &str) -> bool {
        fold_eq(&self.local, local)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}:{}", self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

/// An attribute on a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The attribute name.
    pub name: QualifiedName,
    /// The attribute value with character references decoded.
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given raw name and value.
    #[must_use]
    pub fn new(name: &str, value: String) -> Self {
        Self {
            name: QualifiedName::parse(name),
            value,
        }
    }
}

/// Look up an attribute by local name, ignoring case. The first match wins.
#[must_use]
pub fn attribute_value<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|attr| attr.name.is(name))
        .map(|attr| attr.value.as_str())
}

/// The tokens the tokenizer emits.
///
/// Only element boundaries are surfaced; a stream always ends with exactly
/// one `EndOfFile` or `Error`.
#[derive(Debug)]
pub enum Token {
    /// `<name attr=value ...>` or `<name ... />`.
    StartTag {
        /// The tag name.
        name: QualifiedName,
        /// Attributes in source order, exact-name duplicates removed.
        attributes: Vec<Attribute>,
        /// Set when the tag ended with `/>`.
        self_closing: bool,
    },

    /// `</name>`.
    EndTag {
        /// The tag name.
        name: QualifiedName,
    },

    /// The input was exhausted.
    EndOfFile,

    /// Reading stopped on an unrecoverable failure.
    Error(TokenizeError),
}

impl Token {
    /// Returns true if this token terminates the stream.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::EndOfFile | Self::Error(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                write!(f, "<{name}")?;
                for attr in attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name } => write!(f, "</{name}>"),
            Self::EndOfFile => write!(f, "EOF"),
            Self::Error(err) => write!(f, "ERROR({err})"),
        }
    }
}

/// A tag under construction. Converted into a [`Token`] when emitted.
#[derive(Debug, Default)]
pub(super) struct TagBuilder {
    pub(super) is_end: bool,
    pub(super) name: String,
    pub(super) self_closing: bool,
    pub(super) attributes: Vec<(String, String)>,
    current_is_duplicate: bool,
}

impl TagBuilder {
    pub(super) fn start() -> Self {
        Self::default()
    }

    pub(super) fn end() -> Self {
        Self {
            is_end: true,
            ..Self::default()
        }
    }

    pub(super) fn start_new_attribute(&mut self) {
        self.drop_duplicate_attribute();
        self.attributes.push((String::new(), String::new()));
    }

    pub(super) fn append_to_current_attribute_name(&mut self, c: char) {
        if let Some((name, _)) = self.attributes.last_mut() {
            name.push(c);
        }
    }

    pub(super) fn append_to_current_attribute_value(&mut self, c: char) {
        if let Some((_, value)) = self.attributes.last_mut() {
            value.push(c);
        }
    }

    /// "if there is already an attribute on the token with the exact same
    /// name, then this is a duplicate-attribute parse error and the new
    /// attribute must be removed from the token."
    ///
    /// The attribute is only marked here; its value still has to be consumed
    /// and is discarded when the next attribute starts or the tag is emitted.
    /// Returns true if the current attribute is a duplicate.
    pub(super) fn mark_duplicate_attribute(&mut self) -> bool {
        let Some(((current, _), earlier)) = self.attributes.split_last() else {
            return false;
        };
        self.current_is_duplicate = earlier.iter().any(|(name, _)| name == current);
        self.current_is_duplicate
    }

    fn drop_duplicate_attribute(&mut self) {
        if std::mem::take(&mut self.current_is_duplicate) {
            let _ = self.attributes.pop();
        }
    }

    pub(super) fn into_token(mut self) -> Token {
        self.drop_duplicate_attribute();
        let name = QualifiedName::parse(&self.name);
        if self.is_end {
            Token::EndTag { name }
        } else {
            Token::StartTag {
                name,
                attributes: self
                    .attributes
                    .into_iter()
                    .map(|(name, value)| Attribute::new(&name, value))
                    .collect(),
                self_closing: self.self_closing,
            }
        }
    }
}
