//! Descent graph construction over secondary records.
//!
//! All records live in one slotmap arena; parent and descendant relations are
//! kept in secondary maps keyed by [`RecordId`], never as references between
//! records. A record has up to three immediate parents, found by three
//! independent rules:
//!
//! 1. the latest earlier revision of the same file at the same game version,
//! 2. the latest revision at the highest earlier game version of the same
//!    file,
//! 3. the declared explicit inheritance target, if any.
//!
//! Records whose explicit target cannot be matched are removed before parent
//! computation, iterating to a fixpoint because each removal can orphan
//! another record's target. After parents are known, the transitive
//! descendant sets are computed and any record that descends from itself is
//! removed wholesale.

use crate::diagnostic::{Diagnostic, InheritFailure};
use crate::record::SecondaryFile;
use slotmap::{SecondaryMap, SlotMap, new_key_type};
use std::collections::{HashSet, VecDeque};

new_key_type! {
    /// Identifies a secondary record in the resolution arena.
    pub struct RecordId;
}

/// The descent graph over all surviving secondary records.
pub struct DependencyGraph {
    records: SlotMap<RecordId, SecondaryFile>,
    parents: SecondaryMap<RecordId, Vec<RecordId>>,
    descendants: SecondaryMap<RecordId, HashSet<RecordId>>,
}

impl DependencyGraph {
    /// Build the graph: deduplicate revisions, drop records with
    /// unresolvable explicit targets (to a fixpoint), compute immediate
    /// parents and transitive descendants.
    ///
    /// Cycles are still present afterwards; call [`remove_cycles`] before
    /// merging.
    ///
    /// [`remove_cycles`]: DependencyGraph::remove_cycles
    pub fn build(mut files: Vec<SecondaryFile>, diagnostics: &mut Vec<Diagnostic>) -> Self {
        // Arena order is fully determined by the record metadata, so the
        // discovery order of the input never leaks into tie-breaks.
        files.sort_by(|a, b| {
            a.property
                .cmp(&b.property)
                .then_with(|| a.language.cmp(&b.language))
                .then_with(|| a.author.cmp(&b.author))
                .then_with(|| a.game_version.cmp(&b.game_version))
                .then_with(|| a.revision.cmp(&b.revision))
                .then_with(|| a.source.cmp(&b.source))
        });
        let files = dedup_revisions(files, diagnostics);

        let mut records: SlotMap<RecordId, SecondaryFile> = SlotMap::with_key();
        for file in files {
            records.insert(file);
        }

        remove_unresolvable(&mut records, diagnostics);

        let parents = compute_parents(&records);
        let descendants = compute_descendants(&records, &parents);
        Self {
            records,
            parents,
            descendants,
        }
    }

    /// Remove every record that is its own transitive descendant, emitting
    /// one diagnostic per removed record. Afterwards the descent relation is
    /// a DAG; surviving records that named a removed record as a parent keep
    /// their other parents.
    pub fn remove_cycles(&mut self, diagnostics: &mut Vec<Diagnostic>) {
        let looped: Vec<RecordId> = self
            .records
            .iter()
            .filter(|&(id, _)| self.descendants.get(id).is_some_and(|d| d.contains(&id)))
            .map(|(id, _)| id)
            .collect();

        for id in looped {
            if let Some(record) = self.records.remove(id) {
                diagnostics.push(Diagnostic::CircularDependency {
                    file: record.source,
                });
            }
            self.parents.remove(id);
            self.descendants.remove(id);
        }

        // Strip edges that point at removed records.
        let records = &self.records;
        for (_, list) in self.parents.iter_mut() {
            list.retain(|p| records.contains_key(*p));
        }
        for (_, set) in self.descendants.iter_mut() {
            set.retain(|d| records.contains_key(*d));
        }
    }

    /// Iterate all surviving records in arena order.
    pub fn records(&self) -> impl Iterator<Item = (RecordId, &SecondaryFile)> {
        self.records.iter()
    }

    /// Look up one record.
    pub fn record(&self, id: RecordId) -> Option<&SecondaryFile> {
        self.records.get(id)
    }

    /// The immediate parents of a record, in rule order (earlier revision,
    /// earlier game version, explicit target).
    pub fn parents(&self, id: RecordId) -> &[RecordId] {
        self.parents.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `descendant` transitively descends from `ancestor`.
    pub fn is_transitive_descendant(&self, ancestor: RecordId, descendant: RecordId) -> bool {
        self.descendants
            .get(ancestor)
            .is_some_and(|d| d.contains(&descendant))
    }

    /// Number of surviving records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the graph holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Drop duplicate (identity, revision) files from a sorted list, keeping the
/// one that sorts last by source name.
fn dedup_revisions(
    files: Vec<SecondaryFile>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<SecondaryFile> {
    let mut deduped: Vec<SecondaryFile> = Vec::with_capacity(files.len());
    for file in files {
        let duplicate = deduped.last().is_some_and(|prev| {
            prev.property == file.property
                && prev.language == file.language
                && prev.author == file.author
                && prev.game_version == file.game_version
                && prev.revision == file.revision
        });
        if duplicate {
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

/// Remove records whose declared explicit target matches nothing, until a
/// pass removes no further record. A worklist keeps this incremental:
/// removing a record only re-checks records that declared its property.
fn remove_unresolvable(
    records: &mut SlotMap<RecordId, SecondaryFile>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut queue: VecDeque<RecordId> = records
        .iter()
        .filter(|(_, r)| r.inherits.is_some())
        .map(|(id, _)| id)
        .collect();
    let mut queued: HashSet<RecordId> = queue.iter().copied().collect();

    while let Some(id) = queue.pop_front() {
        queued.remove(&id);
        if !records.contains_key(id) {
            continue;
        }
        let Some(failure) = inherit_failure(records, id) else {
            continue;
        };
        let Some(record) = records.remove(id) else {
            continue;
        };
        let declared = record
            .inherits
            .as_ref()
            .map(|t| t.property.clone())
            .unwrap_or_default();
        diagnostics.push(Diagnostic::UnresolvableInherit {
            file: record.source.clone(),
            property: declared,
            reason: failure,
        });

        // Anything that declared this record's property may now be orphaned.
        for (other, other_record) in records.iter() {
            let depends = other_record
                .inherits
                .as_ref()
                .is_some_and(|t| t.property == record.property);
            if depends && queued.insert(other) {
                queue.push_back(other);
            }
        }
    }
}

/// Check one record's explicit target against the current arena. Returns the
/// stage that found no candidate, or `None` when the target is resolvable
/// (or the record declares none). The record itself is never a candidate.
fn inherit_failure(
    records: &SlotMap<RecordId, SecondaryFile>,
    id: RecordId,
) -> Option<InheritFailure> {
    let record = records.get(id)?;
    let target = record.inherits.as_ref()?;

    let mut candidates: Vec<&SecondaryFile> = records
        .iter()
        .filter(|&(cid, c)| cid != id && c.property == target.property)
        .map(|(_, c)| c)
        .collect();
    if candidates.is_empty() {
        return Some(InheritFailure::NoSuchProperty);
    }
    if let Some(language) = &target.language {
        candidates.retain(|c| &c.language == language);
        if candidates.is_empty() {
            return Some(InheritFailure::NoSuchLanguage);
        }
    }
    candidates.retain(|c| c.game_version <= record.game_version);
    if candidates.is_empty() {
        return Some(InheritFailure::NoVersionAtOrBelow);
    }
    None
}

/// Compute the immediate parents of every record, in rule order.
fn compute_parents(
    records: &SlotMap<RecordId, SecondaryFile>,
) -> SecondaryMap<RecordId, Vec<RecordId>> {
    let mut parents: SecondaryMap<RecordId, Vec<RecordId>> = SecondaryMap::new();
    for (id, record) in records {
        let mut found: Vec<RecordId> = Vec::new();

        // Rule 1: latest earlier revision of the same file.
        let earlier_revision = records
            .iter()
            .filter(|&(cid, c)| {
                cid != id
                    && c.property == record.property
                    && c.language == record.language
                    && c.author == record.author
                    && c.game_version == record.game_version
                    && c.revision < record.revision
            })
            .max_by_key(|(_, c)| c.revision)
            .map(|(cid, _)| cid);
        if let Some(parent) = earlier_revision {
            found.push(parent);
        }

        // Rule 2: latest revision at the highest earlier game version.
        let earlier_version = records
            .iter()
            .filter(|(_, c)| {
                c.property == record.property
                    && c.language == record.language
                    && c.author == record.author
                    && c.game_version < record.game_version
            })
            .max_by(|(_, a), (_, b)| {
                a.game_version
                    .cmp(&b.game_version)
                    .then_with(|| a.revision.cmp(&b.revision))
            })
            .map(|(cid, _)| cid);
        if let Some(parent) = earlier_version {
            found.push(parent);
        }

        // Rule 3: declared explicit target. The fixpoint above guarantees at
        // least one candidate here. An exact author match is preferred; the
        // fallback order is author, then newest game version, then newest
        // revision.
        if let Some(target) = &record.inherits {
            let mut candidates: Vec<(RecordId, &SecondaryFile)> = records
                .iter()
                .filter(|&(cid, c)| {
                    cid != id
                        && c.property == target.property
                        && c.game_version <= record.game_version
                        && target.language.as_ref().is_none_or(|l| &c.language == l)
                })
                .collect();
            candidates.sort_by(|(_, a), (_, b)| {
                a.author
                    .cmp(&b.author)
                    .then_with(|| b.game_version.cmp(&a.game_version))
                    .then_with(|| b.revision.cmp(&a.revision))
                    .then_with(|| a.source.cmp(&b.source))
            });
            let chosen = target
                .author
                .as_ref()
                .and_then(|want| candidates.iter().find(|(_, c)| &c.author == want))
                .or_else(|| candidates.first())
                .map(|&(cid, _)| cid);
            if let Some(parent) = chosen {
                found.push(parent);
            }
        }

        parents.insert(id, found);
    }
    parents
}

/// Compute every record's transitive descendant set by walking child edges
/// outward from each record.
fn compute_descendants(
    records: &SlotMap<RecordId, SecondaryFile>,
    parents: &SecondaryMap<RecordId, Vec<RecordId>>,
) -> SecondaryMap<RecordId, HashSet<RecordId>> {
    let mut children: SecondaryMap<RecordId, Vec<RecordId>> = SecondaryMap::new();
    for (id, _) in records {
        children.insert(id, Vec::new());
    }
    for (id, _) in records {
        if let Some(list) = parents.get(id) {
            for &parent in list {
                if let Some(child_list) = children.get_mut(parent) {
                    child_list.push(id);
                }
            }
        }
    }

    let mut descendants: SecondaryMap<RecordId, HashSet<RecordId>> = SecondaryMap::new();
    for (id, _) in records {
        let mut seen: HashSet<RecordId> = HashSet::new();
        let mut queue: VecDeque<RecordId> =
            children.get(id).into_iter().flatten().copied().collect();
        while let Some(next) = queue.pop_front() {
            if seen.insert(next) {
                queue.extend(children.get(next).into_iter().flatten().copied());
            }
        }
        descendants.insert(id, seen);
    }
    descendants
}
