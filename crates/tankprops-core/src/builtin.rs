//! Primary ("BuiltIn") dataset resolution.
//!
//! Each author's tables chain by ascending game version: a version starts
//! from the previous version's resolved rows and overlays its own, so a tank
//! absent from the newer file is still carried forward. Authors never
//! inherit from each other here.

use crate::diagnostic::Diagnostic;
use crate::record::{PrimaryFile, PrimaryKey, TankRow};
use std::collections::{BTreeMap, HashMap};

/// A resolved primary dataset: tank id to typed descriptor row.
pub type PrimaryTable = HashMap<String, TankRow>;

/// Merge all primary files into one resolved table per (author, game version).
///
/// Multiple revisions at one (author, game version) fold in ascending
/// revision order, higher revisions winning per tank. An author with no file
/// for some version simply produces no entry for that version.
pub fn merge_primary(
    files: Vec<PrimaryFile>,
    diagnostics: &mut Vec<Diagnostic>,
) -> BTreeMap<PrimaryKey, PrimaryTable> {
    let mut groups: BTreeMap<PrimaryKey, Vec<PrimaryFile>> = BTreeMap::new();
    for file in files {
        let key = PrimaryKey {
            author: file.author.clone(),
            game_version: file.game_version.clone(),
        };
        groups.entry(key).or_default().push(file);
    }

    let mut resolved: BTreeMap<PrimaryKey, PrimaryTable> = BTreeMap::new();
    // Group keys iterate author-first, then ascending game version, which is
    // exactly the author-local chain order.
    let mut latest_by_author: HashMap<String, PrimaryKey> = HashMap::new();
    for (key, group) in groups {
        let group = dedup_revisions(group, diagnostics);

        let mut table: PrimaryTable = latest_by_author
            .get(&key.author)
            .and_then(|prev| resolved.get(prev))
            .cloned()
            .unwrap_or_default();
        for file in &group {
            for (id, row) in &file.rows {
                table.insert(id.clone(), row.clone());
            }
        }

        latest_by_author.insert(key.author.clone(), key.clone());
        resolved.insert(key, table);
    }
    resolved
}

/// Sort one (author, game version) group by revision and drop duplicate
/// revisions, keeping the file that sorts last by source name.
fn dedup_revisions(
    mut group: Vec<PrimaryFile>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<PrimaryFile> {
    group.sort_by(|a, b| {
        a.revision
            .cmp(&b.revision)
            .then_with(|| a.source.cmp(&b.source))
    });
    let mut deduped: Vec<PrimaryFile> = Vec::with_capacity(group.len());
    for file in group {
        if deduped
            .last()
            .is_some_and(|prev| prev.revision == file.revision)
        {
            if let Some(dropped) = deduped.pop() {
                diagnostics.push(Diagnostic::DuplicateRevision {
                    file: dropped.source,
                    kept: file.source.clone(),
                    revision: file.revision,
                });
            }
        }
        deduped.push(file);
    }
    deduped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Category, Class, Country};
    use crate::version::GameVersion;

    fn v(s: &str) -> GameVersion {
        s.parse().unwrap()
    }

    fn row(tier: u8) -> TankRow {
        TankRow {
            country: Country::Ussr,
            class: Class::Medium,
            category: Category::Normal,
            tier,
        }
    }

    fn file(author: &str, version: &str, revision: u32, rows: &[(&str, u8)]) -> PrimaryFile {
        PrimaryFile {
            author: author.to_string(),
            game_version: v(version),
            revision,
            rows: rows
                .iter()
                .map(|(id, tier)| (id.to_string(), row(*tier)))
                .collect(),
            source: format!("Data-BuiltIn-{author}-{version}-{revision}.csv"),
        }
    }

    fn key(author: &str, version: &str) -> PrimaryKey {
        PrimaryKey {
            author: author.to_string(),
            game_version: v(version),
        }
    }

    // -----------------------------------------------------------------------
    // Version chaining
    // -----------------------------------------------------------------------

    #[test]
    fn later_version_inherits_and_overrides() {
        let mut diags = Vec::new();
        let resolved = merge_primary(
            vec![
                file("X", "1.0", 1, &[("t34", 5)]),
                file("X", "1.1", 1, &[("t34", 6), ("kv1", 5)]),
            ],
            &mut diags,
        );

        let v10 = &resolved[&key("X", "1.0")];
        assert_eq!(v10.len(), 1);
        assert_eq!(v10["t34"].tier, 5);

        let v11 = &resolved[&key("X", "1.1")];
        assert_eq!(v11.len(), 2);
        assert_eq!(v11["t34"].tier, 6, "newer version's own row wins");
        assert_eq!(v11["kv1"].tier, 5);
        assert!(diags.is_empty());
    }

    #[test]
    fn entities_absent_from_newer_version_are_retained() {
        let mut diags = Vec::new();
        let resolved = merge_primary(
            vec![
                file("X", "0.7", 1, &[("is4", 9), ("maus", 10)]),
                file("X", "0.8", 1, &[("is4", 10)]),
            ],
            &mut diags,
        );

        let v08 = &resolved[&key("X", "0.8")];
        assert_eq!(v08["maus"].tier, 10, "untouched tank carried forward");
        assert_eq!(v08["is4"].tier, 10);
    }

    #[test]
    fn chain_skips_missing_versions_without_synthesizing() {
        let mut diags = Vec::new();
        let resolved = merge_primary(
            vec![
                file("X", "0.7", 1, &[("a", 1)]),
                file("X", "0.9", 1, &[("b", 2)]),
            ],
            &mut diags,
        );

        assert!(!resolved.contains_key(&key("X", "0.8")));
        let v09 = &resolved[&key("X", "0.9")];
        assert_eq!(v09.len(), 2, "0.9 chains onto 0.7, the latest earlier version");
    }

    #[test]
    fn authors_are_isolated() {
        let mut diags = Vec::new();
        let resolved = merge_primary(
            vec![
                file("Alice", "1.0", 1, &[("a", 1)]),
                file("Bob", "1.1", 1, &[("b", 2)]),
            ],
            &mut diags,
        );

        let bob = &resolved[&key("Bob", "1.1")];
        assert_eq!(bob.len(), 1, "Bob must not inherit Alice's rows");
        assert!(bob.contains_key("b"));
    }

    // -----------------------------------------------------------------------
    // Revision folding within a group
    // -----------------------------------------------------------------------

    #[test]
    fn revisions_fold_in_ascending_order() {
        let mut diags = Vec::new();
        let resolved = merge_primary(
            vec![
                file("X", "1.0", 2, &[("a", 2)]),
                file("X", "1.0", 1, &[("a", 1), ("b", 1)]),
            ],
            &mut diags,
        );

        let table = &resolved[&key("X", "1.0")];
        assert_eq!(table["a"].tier, 2, "higher revision wins");
        assert_eq!(table["b"].tier, 1, "rows only in the lower revision survive");
    }

    #[test]
    fn duplicate_revision_keeps_one_and_warns() {
        let mut diags = Vec::new();
        // "... (copy).csv" sorts before "...1.csv", so the plain file wins.
        let mut dup = file("X", "1.0", 1, &[("a", 7)]);
        dup.source = "Data-BuiltIn-X-1.0-1 (copy).csv".to_string();
        let resolved = merge_primary(vec![file("X", "1.0", 1, &[("a", 3)]), dup], &mut diags);

        assert_eq!(diags.len(), 1);
        match &diags[0] {
            Diagnostic::DuplicateRevision {
                file, kept, revision,
            } => {
                assert_eq!(*revision, 1);
                assert_eq!(file, "Data-BuiltIn-X-1.0-1 (copy).csv");
                assert_eq!(kept, "Data-BuiltIn-X-1.0-1.csv");
            }
            other => panic!("expected DuplicateRevision, got {other:?}"),
        }
        assert_eq!(resolved[&key("X", "1.0")]["a"].tier, 3);
    }

    // -----------------------------------------------------------------------
    // Degenerate inputs
    // -----------------------------------------------------------------------

    #[test]
    fn empty_input_yields_empty_output() {
        let mut diags = Vec::new();
        let resolved = merge_primary(Vec::new(), &mut diags);
        assert!(resolved.is_empty());
        assert!(diags.is_empty());
    }
}
