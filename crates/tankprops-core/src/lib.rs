//! tankprops-core -- resolution engine for versioned tank property files.
//!
//! Independently authored data files each carry values for one property,
//! scoped to an author, a language, and a game version, and may override an
//! earlier revision of themselves or declare inheritance from another
//! author's file. This crate turns the full set of parsed files into one
//! consistent dataset per key, in five steps:
//!
//! 1. **Primary merge** -- per author, chain the "BuiltIn" tables by
//!    ascending game version ([`builtin::merge_primary`]).
//! 2. **Graph build** -- compute every secondary record's immediate parents
//!    and transitive descendants, dropping records with unresolvable
//!    explicit targets ([`inherit::DependencyGraph::build`]).
//! 3. **Cycle removal** -- drop every record that descends from itself
//!    ([`inherit::DependencyGraph::remove_cycles`]).
//! 4. **Topological merge** -- materialize each record's rows, ancestors
//!    first ([`merge::merge_secondary`]).
//! 5. **Revision collapse** -- keep the highest revision per logical file.
//!
//! The whole pass is a pure function from descriptors to [`Resolution`]; it
//! holds no state between runs, never prints, and never fails on bad data --
//! problem files are dropped and reported in [`Resolution::diagnostics`].
//! Callers that need a responsive surface run [`resolve`] on a worker and
//! publish the result atomically when it finishes.

pub mod builtin;
pub mod diagnostic;
pub mod inherit;
pub mod merge;
pub mod record;
pub mod version;

pub use builtin::PrimaryTable;
pub use diagnostic::Diagnostic;
pub use merge::SecondaryTable;

use record::{PrimaryFile, PrimaryKey, SecondaryFile, SecondaryKey};
use std::collections::BTreeMap;

/// The fully resolved output of one resolution pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Resolved primary dataset per (author, game version).
    pub primary: BTreeMap<PrimaryKey, PrimaryTable>,
    /// Resolved, revision-collapsed secondary dataset per
    /// (property, language, author, game version).
    pub secondary: BTreeMap<SecondaryKey, SecondaryTable>,
    /// One entry per excluded or suspect file, in discovery order of the
    /// pipeline stages.
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolve all parsed data files into the final datasets.
pub fn resolve(primary: Vec<PrimaryFile>, secondary: Vec<SecondaryFile>) -> Resolution {
    let mut diagnostics = Vec::new();
    let primary = builtin::merge_primary(primary, &mut diagnostics);
    let mut graph = inherit::DependencyGraph::build(secondary, &mut diagnostics);
    graph.remove_cycles(&mut diagnostics);
    let secondary = merge::merge_secondary(&graph);
    Resolution {
        primary,
        secondary,
        diagnostics,
    }
}
