use std::collections::HashSet;

use crate::meta_import::{MetaImport, ModuleMode};

/// Apply `mod` precedence to scanned candidates.
///
/// With [`ModuleMode::PreferMod`], every `mod` entry is kept (in scan
/// order) and claims its prefix; VCS entries for a claimed prefix are
/// dropped. With [`ModuleMode::IgnoreMod`], `mod` entries are dropped.
/// Unclaimed VCS entries always follow, in scan order. Nothing is
/// deduplicated or re-sorted.
#[must_use]
pub fn resolve_meta_imports(candidates: Vec<MetaImport>, mode: ModuleMode) -> Vec<MetaImport> {
    let (mods, legacy): (Vec<_>, Vec<_>) = candidates.into_iter().partition(MetaImport::is_mod);

    let mut claimed = HashSet::new();
    let mut resolved = Vec::with_capacity(mods.len() + legacy.len());

    if mode == ModuleMode::PreferMod {
        for import in mods {
            let _ = claimed.insert(import.prefix().to_string());
            resolved.push(import);
        }
    }

    resolved.extend(
        legacy
            .into_iter()
            .filter(|import| !claimed.contains(import.prefix())),
    );
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import(prefix: &str, vcs: &str, repo_root: &str) -> MetaImport {
        MetaImport::new(prefix, vcs, repo_root)
    }

    #[test]
    fn test_prefer_mod_claims_prefix() {
        let candidates = vec![import("p", "mod", "r1"), import("p", "git", "r2")];
        let resolved = resolve_meta_imports(candidates, ModuleMode::PreferMod);
        assert_eq!(resolved, vec![import("p", "mod", "r1")]);
    }

    #[test]
    fn test_ignore_mod_drops_mod_entries() {
        let candidates = vec![import("p", "mod", "r1"), import("p", "git", "r2")];
        let resolved = resolve_meta_imports(candidates, ModuleMode::IgnoreMod);
        assert_eq!(resolved, vec![import("p", "git", "r2")]);
    }

    #[test]
    fn test_mod_entries_come_first() {
        let candidates = vec![import("a", "git", "ra"), import("b", "mod", "rb")];
        let resolved = resolve_meta_imports(candidates, ModuleMode::PreferMod);
        assert_eq!(resolved, vec![import("b", "mod", "rb"), import("a", "git", "ra")]);
    }

    #[test]
    fn test_duplicates_are_retained_in_scan_order() {
        let candidates = vec![
            import("p", "mod", "m1"),
            import("q", "git", "g1"),
            import("p", "mod", "m2"),
            import("p", "hg", "h1"),
            import("q", "svn", "s1"),
        ];
        let resolved = resolve_meta_imports(candidates.clone(), ModuleMode::PreferMod);
        assert_eq!(
            resolved,
            vec![
                import("p", "mod", "m1"),
                import("p", "mod", "m2"),
                import("q", "git", "g1"),
                import("q", "svn", "s1"),
            ]
        );

        let resolved = resolve_meta_imports(candidates, ModuleMode::IgnoreMod);
        assert_eq!(
            resolved,
            vec![
                import("q", "git", "g1"),
                import("p", "hg", "h1"),
                import("q", "svn", "s1"),
            ]
        );
    }

    #[test]
    fn test_claims_match_prefix_exactly() {
        let candidates = vec![
            import("example.org/a", "mod", "m"),
            import("example.org/a/b", "git", "g"),
            import("example.org/A", "git", "G"),
        ];
        let resolved = resolve_meta_imports(candidates, ModuleMode::PreferMod);
        assert_eq!(resolved.len(), 3);
    }

    #[test]
    fn test_empty_candidates() {
        assert!(resolve_meta_imports(Vec::new(), ModuleMode::PreferMod).is_empty());
        assert!(resolve_meta_imports(Vec::new(), ModuleMode::IgnoreMod).is_empty());
    }
}
