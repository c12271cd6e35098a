//! Source-file descriptors and the typed primary row payload.
//!
//! Descriptors are constructed once (by the file loader or by tests) and are
//! never mutated afterwards; the resolution engine treats them as read-only
//! inputs and produces new tables as output.

use crate::version::GameVersion;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Typed primary payload
// ---------------------------------------------------------------------------

/// Nation a tank belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    Ussr,
    Germany,
    Usa,
    France,
    China,
}

/// Combat class of a tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Class {
    Light,
    Medium,
    Heavy,
    Destroyer,
    Artillery,
}

/// Availability category of a tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Normal,
    Premium,
    Special,
}

/// One tank's descriptor row in the primary dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankRow {
    pub country: Country,
    pub class: Class,
    pub category: Category,
    /// Battle tier, 1 through 10.
    pub tier: u8,
}

// ---------------------------------------------------------------------------
// File descriptors
// ---------------------------------------------------------------------------

/// A parsed primary ("BuiltIn") data file: the authoritative tank table one
/// author published for one game version, at one revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryFile {
    pub author: String,
    pub game_version: GameVersion,
    pub revision: u32,
    /// Tank id to typed descriptor row.
    pub rows: HashMap<String, TankRow>,
    /// Originating filename. Used only in diagnostics.
    pub source: String,
}

/// A declared explicit inheritance target.
///
/// An omitted author means "best match"; an omitted language means
/// "any language".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritRef {
    pub property: String,
    pub language: Option<String>,
    pub author: Option<String>,
}

/// A parsed secondary (property overlay) data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryFile {
    pub property: String,
    /// 2-letter language code, validated by the loader.
    pub language: String,
    pub author: String,
    pub game_version: GameVersion,
    pub revision: u32,
    /// Tank id to property value.
    pub rows: HashMap<String, String>,
    pub inherits: Option<InheritRef>,
    /// Originating filename. Used only in diagnostics.
    pub source: String,
}

impl SecondaryFile {
    /// The logical file identity, ignoring the revision number.
    pub fn key(&self) -> SecondaryKey {
        SecondaryKey {
            property: self.property.clone(),
            language: self.language.clone(),
            author: self.author.clone(),
            game_version: self.game_version.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output keys
// ---------------------------------------------------------------------------

/// Identifies one resolved primary dataset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrimaryKey {
    pub author: String,
    pub game_version: GameVersion,
}

/// Identifies one resolved, revision-collapsed secondary dataset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SecondaryKey {
    pub property: String,
    pub language: String,
    pub author: String,
    pub game_version: GameVersion,
}
