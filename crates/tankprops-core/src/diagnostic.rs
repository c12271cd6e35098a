//! Per-file problems discovered during resolution.
//!
//! The engine never prints and never fails for data-quality reasons: every
//! problem drops the offending record and is reported as a value in the
//! returned diagnostics list, for the caller to log or display.

use std::fmt;
use thiserror::Error;

/// Which stage of explicit-inheritance matching found no candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InheritFailure {
    /// No data file exists for the declared property at all.
    NoSuchProperty,
    /// Files for the property exist, but none in the declared language.
    NoSuchLanguage,
    /// Files match property and language, but none at or below the
    /// inheriting file's game version.
    NoVersionAtOrBelow,
}

impl fmt::Display for InheritFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            InheritFailure::NoSuchProperty => "there are no data files for the inherited property",
            InheritFailure::NoSuchLanguage => {
                "no data files for the inherited property are in the declared language"
            }
            InheritFailure::NoVersionAtOrBelow => {
                "no data files for the inherited property are at or below this file's game version"
            }
        };
        f.write_str(text)
    }
}

/// One excluded or suspect source file, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// The file declared inheritance from a property that cannot be matched;
    /// the file is excluded from the dataset.
    #[error("skipping \"{file}\": {reason} \"{property}\"")]
    UnresolvableInherit {
        file: String,
        property: String,
        reason: InheritFailure,
    },

    /// The file participates in a circular descent chain; it is excluded.
    #[error("skipping \"{file}\" due to a circular dependency")]
    CircularDependency { file: String },

    /// Two files share an identity and a revision number. One is kept
    /// deterministically; this is a warning, not an exclusion of the group.
    #[error("ignoring \"{file}\": duplicate revision {revision} (keeping \"{kept}\")")]
    DuplicateRevision {
        file: String,
        kept: String,
        revision: u32,
    },
}
