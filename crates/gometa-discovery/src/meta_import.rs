use std::fmt;

use strum_macros::{Display, EnumString};

/// The VCS marker that redirects a prefix to a module proxy.
pub const MOD_VCS: &str = "mod";

/// One `<meta name="go-import">` entry.
///
/// Immutable once built; the fields mirror the three words of the tag's
/// `content` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetaImport {
    prefix: String,
    vcs: String,
    repo_root: String,
}

impl MetaImport {
    /// Build a record from its three fields.
    #[must_use]
    pub fn new(
        prefix: impl Into<String>,
        vcs: impl Into<String>,
        repo_root: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            vcs: vcs.into(),
            repo_root: repo_root.into(),
        }
    }

    /// Parse a `content` attribute value: exactly three whitespace-separated
    /// fields, `prefix vcs repo-root`.
    #[must_use]
    pub fn from_content(content: &str) -> Option<Self> {
        let mut fields = content.split_whitespace();
        match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(prefix), Some(vcs), Some(repo_root), None) => {
                Some(Self::new(prefix, vcs, repo_root))
            }
            _ => None,
        }
    }

    /// The import-path prefix this entry applies to.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The VCS scheme, or `"mod"` for a module proxy.
    #[must_use]
    pub fn vcs(&self) -> &str {
        &self.vcs
    }

    /// Where to fetch from.
    #[must_use]
    pub fn repo_root(&self) -> &str {
        &self.repo_root
    }

    /// Returns true for module-proxy entries.
    #[must_use]
    pub fn is_mod(&self) -> bool {
        self.vcs == MOD_VCS
    }
}

impl fmt::Display for MetaImport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.prefix, self.vcs, self.repo_root)
    }
}

/// Whether `mod` entries are understood by the caller.
///
/// Parses from and displays as `ignore-mod` / `prefer-mod`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ModuleMode {
    /// Legacy behavior: `mod` entries are dropped from the result.
    #[default]
    IgnoreMod,
    /// `mod` entries are returned first and suppress VCS entries that share
    /// their prefix.
    PreferMod,
}
