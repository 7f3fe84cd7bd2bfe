//! go-import discovery for vanity import paths.
//!
//! A vanity import path is served by a host that does not run a VCS itself.
//! Instead its HTML carries
//! `<meta name="go-import" content="prefix vcs repo-root">` tags pointing at
//! the real repository, or at a module proxy when `vcs` is `mod`.
//!
//! [`parse_meta_go_imports`] scans a document's `<head>` for those tags and
//! resolves `mod` entries against legacy VCS entries according to a
//! [`ModuleMode`].
//!
//! # Example
//! ```
//! use gometa_discovery::{ModuleMode, parse_meta_go_imports};
//!
//! let html = br#"<html><head>
//!   <meta name="go-import" content="example.org/pkg git https://code.example.org/pkg">
//! </head></html>"#;
//!
//! let imports = parse_meta_go_imports(&html[..], ModuleMode::IgnoreMod).unwrap();
//! assert_eq!(imports.len(), 1);
//! assert_eq!(imports[0].repo_root(), "https://code.example.org/pkg");
//! ```

/// Errors surfaced to callers.
pub mod error;
/// The discovery record and the mode flag.
pub mod meta_import;
/// Precedence pass between `mod` and VCS entries.
pub mod resolve;
/// Collection of go-import tags from a token stream.
pub mod scan;

use std::io::Read;

pub use error::DiscoveryError;
pub use meta_import::{MetaImport, ModuleMode};
pub use resolve::resolve_meta_imports;
pub use scan::scan_meta_imports;

/// Scan `input` for go-import meta tags and apply `mode`'s precedence rules.
///
/// An empty result without an error means the document carried no usable
/// go-import metadata.
///
/// # Errors
///
/// Returns [`DiscoveryError::Decode`] when the document declares an
/// unsupported charset before any go-import tag was found. Malformed markup
/// and failed reads are never errors; they end the scan early.
pub fn parse_meta_go_imports<R: Read>(
    input: R,
    mode: ModuleMode,
) -> Result<Vec<MetaImport>, DiscoveryError> {
    let candidates = scan_meta_imports(input)?;
    Ok(resolve_meta_imports(candidates, mode))
}
