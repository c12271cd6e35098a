//! Ancestors-first row materialization and revision collapse.
//!
//! Once the descent graph is a DAG, every record's table is produced by
//! folding its parents' already-resolved tables and overlaying the record's
//! own rows. Kahn's algorithm over the parent-to-child edges guarantees each
//! parent resolves before any of its children.

use crate::inherit::{DependencyGraph, RecordId};
use crate::record::SecondaryKey;
use slotmap::SecondaryMap;
use std::collections::{BTreeMap, HashMap, VecDeque};

/// A resolved secondary dataset: tank id to property value.
pub type SecondaryTable = HashMap<String, String>;

/// Resolve every surviving record's rows, then collapse each logical file
/// identity down to its highest revision.
///
/// Expects a graph with cycles already removed; see
/// [`DependencyGraph::remove_cycles`].
pub fn merge_secondary(graph: &DependencyGraph) -> BTreeMap<SecondaryKey, SecondaryTable> {
    let resolved = resolve_tables(graph);
    collapse_revisions(graph, resolved)
}

/// Materialize one table per record, parents first.
///
/// Parents fold in rule order, so when two parents disagree on a tank the
/// explicit inheritance target beats the automatic version lineage; the
/// record's own rows always win last.
fn resolve_tables(graph: &DependencyGraph) -> SecondaryMap<RecordId, SecondaryTable> {
    let mut in_degree: SecondaryMap<RecordId, usize> = SecondaryMap::new();
    let mut children: SecondaryMap<RecordId, Vec<RecordId>> = SecondaryMap::new();
    for (id, _) in graph.records() {
        in_degree.insert(id, 0);
        children.insert(id, Vec::new());
    }
    for (id, _) in graph.records() {
        for &parent in graph.parents(id) {
            if let Some(degree) = in_degree.get_mut(id) {
                *degree += 1;
            }
            if let Some(list) = children.get_mut(parent) {
                list.push(id);
            }
        }
    }

    let mut queue: VecDeque<RecordId> = graph
        .records()
        .filter(|&(id, _)| in_degree.get(id) == Some(&0))
        .map(|(id, _)| id)
        .collect();
    let mut resolved: SecondaryMap<RecordId, SecondaryTable> = SecondaryMap::new();

    while let Some(id) = queue.pop_front() {
        let mut table = SecondaryTable::new();
        for &parent in graph.parents(id) {
            if let Some(parent_table) = resolved.get(parent) {
                for (tank, value) in parent_table {
                    table.insert(tank.clone(), value.clone());
                }
            }
        }
        if let Some(record) = graph.record(id) {
            for (tank, value) in &record.rows {
                table.insert(tank.clone(), value.clone());
            }
        }
        resolved.insert(id, table);

        if let Some(list) = children.get(id) {
            for &child in list {
                if let Some(degree) = in_degree.get_mut(child) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(child);
                    }
                }
            }
        }
    }

    resolved
}

/// Keep only the highest-revision resolved table per logical file identity.
fn collapse_revisions(
    graph: &DependencyGraph,
    mut resolved: SecondaryMap<RecordId, SecondaryTable>,
) -> BTreeMap<SecondaryKey, SecondaryTable> {
    let mut newest: BTreeMap<SecondaryKey, (u32, RecordId)> = BTreeMap::new();
    for (id, record) in graph.records() {
        let key = record.key();
        match newest.get(&key) {
            Some(&(revision, _)) if revision >= record.revision => {}
            _ => {
                newest.insert(key, (record.revision, id));
            }
        }
    }
    newest
        .into_iter()
        .map(|(key, (_, id))| (key, resolved.remove(id).unwrap_or_default()))
        .collect()
}
