//! Tree-to-tree diff between two snapshots.
//!
//! Works purely on [`TreeSnapshot`]s, so it needs no repository access and
//! behaves identically for every [`GitRepo`](modscope_git::GitRepo) backend.

use std::collections::{BTreeMap, BTreeSet};

use modscope_git::{ChangeType, GitOid};
use tracing::instrument;

use crate::change::{ChangeOrigin, ChangeRecord};
use crate::commit::{SnapshotEntry, TreeSnapshot};

/// Compare `old` against `new` and return one record per differing path,
/// ordered by path.
///
/// Exact renames (a deleted path whose content reappears under an added
/// path) are folded into a single [`ChangeType::Renamed`] record at the new
/// path. Snapshots of the same commit short-circuit to an empty diff.
#[instrument(skip_all, fields(old = %old.commit(), new = %new.commit()))]
pub fn diff(old: &TreeSnapshot, new: &TreeSnapshot) -> Vec<ChangeRecord> {
    if old.commit() == new.commit() {
        tracing::debug!("same commit, skipping tree comparison");
        return Vec::new();
    }

    let mut added: BTreeMap<&str, &SnapshotEntry> = BTreeMap::new();
    let mut deleted: BTreeMap<&str, &SnapshotEntry> = BTreeMap::new();
    let mut records = Vec::new();

    for (path, new_entry) in new.entries() {
        match old.entries().get(path) {
            None => {
                added.insert(path, new_entry);
            }
            Some(old_entry) if !old_entry.mode.same_kind(new_entry.mode) => {
                records.push(record(path, ChangeType::TypeChange));
            }
            Some(old_entry) if old_entry != new_entry => {
                records.push(record(path, ChangeType::Modified));
            }
            Some(_) => {}
        }
    }
    for (path, old_entry) in old.entries() {
        if !new.entries().contains_key(path) {
            deleted.insert(path, old_entry);
        }
    }

    let renames = pair_renames(&added, &deleted);
    let rename_sources: BTreeSet<&str> = renames.values().copied().collect();

    for path in added.keys() {
        let kind = renames.get(path).map_or(ChangeType::Added, |from| {
            ChangeType::Renamed {
                from: (*from).to_owned(),
            }
        });
        records.push(record(path, kind));
    }
    for path in deleted.keys() {
        if !rename_sources.contains(path) {
            records.push(record(path, ChangeType::Deleted));
        }
    }

    records.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::info!(files = records.len(), "history diff computed");
    records
}

/// Pair each added path with a deleted path of identical content.
///
/// Both sides are walked in path order and each deleted path is used at most
/// once, so the pairing is deterministic. Returns `new path → old path`.
fn pair_renames<'a>(
    added: &BTreeMap<&'a str, &SnapshotEntry>,
    deleted: &BTreeMap<&'a str, &SnapshotEntry>,
) -> BTreeMap<&'a str, &'a str> {
    let mut by_content: BTreeMap<GitOid, Vec<&'a str>> = BTreeMap::new();
    for (path, entry) in deleted {
        by_content.entry(entry.oid).or_default().push(path);
    }
    // Pop from the front: reverse once so `pop` yields the smallest path.
    for candidates in by_content.values_mut() {
        candidates.reverse();
    }

    let mut renames = BTreeMap::new();
    for (path, entry) in added {
        if let Some(from) = by_content.get_mut(&entry.oid).and_then(Vec::pop) {
            renames.insert(*path, from);
        }
    }
    renames
}

fn record(path: &str, kind: ChangeType) -> ChangeRecord {
    ChangeRecord {
        path: path.to_owned(),
        kind,
        origin: ChangeOrigin::History,
    }
}

#[cfg(test)]
mod tests {
    use modscope_git::EntryMode;
    use proptest::prelude::*;

    use super::*;

    fn oid(n: u8) -> GitOid {
        GitOid::from_bytes([n; 20])
    }

    fn snapshot(commit: u8, files: &[(&str, u8)]) -> TreeSnapshot {
        snapshot_with_mode(commit, files, EntryMode::Blob)
    }

    fn snapshot_with_mode(commit: u8, files: &[(&str, u8)], mode: EntryMode) -> TreeSnapshot {
        TreeSnapshot::new(
            oid(commit),
            files.iter().map(|(path, content)| {
                (
                    (*path).to_owned(),
                    SnapshotEntry {
                        mode,
                        oid: oid(*content),
                    },
                )
            }),
        )
    }

    fn summary(records: &[ChangeRecord]) -> Vec<String> {
        records.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn same_commit_short_circuits() {
        let old = snapshot(1, &[("a/src/X.java", 10)]);
        let mut new = snapshot(1, &[("a/src/X.java", 11)]);
        assert!(diff(&old, &new).is_empty());
        new = snapshot(2, &[("a/src/X.java", 11)]);
        assert_eq!(diff(&old, &new).len(), 1);
    }

    #[test]
    fn added_modified_deleted() {
        let old = snapshot(1, &[("a/src/X.java", 10), ("c/src/Z.java", 30), ("keep", 1)]);
        let new = snapshot(2, &[("a/src/X.java", 11), ("b/src/Y.java", 20), ("keep", 1)]);
        assert_eq!(
            summary(&diff(&old, &new)),
            ["[M] a/src/X.java", "[A] b/src/Y.java", "[D] c/src/Z.java"]
        );
    }

    #[test]
    fn exact_rename_is_one_record_at_new_path() {
        let old = snapshot(1, &[("a/src/Moved.java", 10)]);
        let new = snapshot(2, &[("b/src/Moved.java", 10)]);
        let records = diff(&old, &new);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "b/src/Moved.java");
        assert_eq!(
            records[0].kind,
            ChangeType::Renamed {
                from: "a/src/Moved.java".to_owned()
            }
        );
    }

    #[test]
    fn rename_pairing_uses_each_source_once() {
        let old = snapshot(1, &[("old1", 10), ("old2", 10)]);
        let new = snapshot(2, &[("new1", 10), ("new2", 10), ("new3", 10)]);
        assert_eq!(
            summary(&diff(&old, &new)),
            ["[R] old1 -> new1", "[R] old2 -> new2", "[A] new3"]
        );
    }

    #[test]
    fn kind_change_is_type_change() {
        let old = snapshot_with_mode(1, &[("link", 10)], EntryMode::Blob);
        let new = snapshot_with_mode(2, &[("link", 10)], EntryMode::Link);
        assert_eq!(summary(&diff(&old, &new)), ["[T] link"]);
    }

    #[test]
    fn executable_bit_is_a_modification() {
        let old = snapshot_with_mode(1, &[("run.sh", 10)], EntryMode::Blob);
        let new = snapshot_with_mode(2, &[("run.sh", 10)], EntryMode::BlobExecutable);
        assert_eq!(summary(&diff(&old, &new)), ["[M] run.sh"]);
    }

    fn tree_strategy() -> impl Strategy<Value = BTreeMap<String, u8>> {
        prop::collection::btree_map("[a-d]/[a-d]", 0u8..4, 0..10)
    }

    proptest! {
        /// Reported paths (plus rename sources) are exactly the paths whose
        /// content or existence differs.
        #[test]
        fn reports_exactly_the_differing_paths(old in tree_strategy(), new in tree_strategy()) {
            let to_snapshot = |commit: u8, files: &BTreeMap<String, u8>| {
                TreeSnapshot::new(
                    oid(commit),
                    files.iter().map(|(p, c)| {
                        (p.clone(), SnapshotEntry { mode: EntryMode::Blob, oid: oid(*c) })
                    }),
                )
            };
            let records = diff(&to_snapshot(1, &old), &to_snapshot(2, &new));

            let mut reported = BTreeSet::new();
            for rec in &records {
                for path in rec.affected_paths() {
                    prop_assert!(reported.insert(path.to_owned()), "{} reported twice", path);
                }
            }

            let expected: BTreeSet<String> = old
                .keys()
                .chain(new.keys())
                .filter(|p| old.get(*p) != new.get(*p))
                .cloned()
                .collect();
            prop_assert_eq!(reported, expected);
        }
    }
}
