//! Directory discovery and CSV body loading.
//!
//! `discover` scans a directory for `Data-*.csv` files, parses their names,
//! reads their bodies, and returns the descriptors for resolution. Only the
//! directory scan itself can fail hard; every per-file problem skips that
//! file with a [`LoadDiagnostic`].
//!
//! Body formats:
//!
//! - BuiltIn files: `id,country,class,category,tier`, one row per tank.
//! - Property files: `id,value`. A leading comment line
//!   `# inherit: <property>[, <language>[, <author>]]` declares explicit
//!   inheritance from another author's property.

use crate::filename::{ParsedName, SkipReason, parse_file_name};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tankprops_core::record::{
    Category, Class, Country, InheritRef, PrimaryFile, SecondaryFile, TankRow,
};
use thiserror::Error;

// ===========================================================================
// Errors and diagnostics
// ===========================================================================

/// Hard failure while scanning the data directory.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A file skipped during discovery, with the reason. Collected, not printed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadDiagnostic {
    #[error("skipping \"{file}\" because {reason}")]
    BadFileName { file: String, reason: SkipReason },
    #[error("skipping \"{file}\" because its body could not be read: {detail}")]
    BadBody { file: String, detail: String },
}

// ===========================================================================
// CSV row schema
// ===========================================================================

/// One row of a BuiltIn file body.
#[derive(Debug, Deserialize)]
struct BuiltInRow {
    id: String,
    country: Country,
    class: Class,
    category: Category,
    tier: u8,
}

/// One row of a property file body.
#[derive(Debug, Deserialize)]
struct PropertyRow {
    id: String,
    value: String,
}

// ===========================================================================
// Discovery
// ===========================================================================

/// Everything found in one scan of a data directory.
#[derive(Debug, Default)]
pub struct DiscoveredData {
    pub primary: Vec<PrimaryFile>,
    pub secondary: Vec<SecondaryFile>,
    pub diagnostics: Vec<LoadDiagnostic>,
}

/// Scan `dir` for `Data-*.csv` files and load them all.
///
/// Files are processed in filename order so the returned lists (and any
/// diagnostics) do not depend on directory enumeration order.
pub fn discover(dir: &Path) -> Result<DiscoveredData, LoadError> {
    let mut names: Vec<String> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with("Data-") && name.ends_with(".csv") {
            names.push(name);
        }
    }
    names.sort();

    let mut data = DiscoveredData::default();
    for name in names {
        let path = dir.join(&name);
        match parse_file_name(&name) {
            Err(reason) => data
                .diagnostics
                .push(LoadDiagnostic::BadFileName { file: name, reason }),
            Ok(ParsedName::BuiltIn {
                author,
                game_version,
                revision,
            }) => match read_builtin_body(&path) {
                Ok(rows) => data.primary.push(PrimaryFile {
                    author,
                    game_version,
                    revision,
                    rows,
                    source: name,
                }),
                Err(detail) => data
                    .diagnostics
                    .push(LoadDiagnostic::BadBody { file: name, detail }),
            },
            Ok(ParsedName::Property {
                property,
                language,
                author,
                game_version,
                revision,
            }) => match read_property_body(&path) {
                Ok((rows, inherits)) => data.secondary.push(SecondaryFile {
                    property,
                    language,
                    author,
                    game_version,
                    revision,
                    rows,
                    inherits,
                    source: name,
                }),
                Err(detail) => data
                    .diagnostics
                    .push(LoadDiagnostic::BadBody { file: name, detail }),
            },
        }
    }
    Ok(data)
}

// ===========================================================================
// Body parsing
// ===========================================================================

fn read_builtin_body(path: &Path) -> Result<HashMap<String, TankRow>, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .from_reader(content.as_bytes());

    let mut rows = HashMap::new();
    for record in reader.deserialize::<BuiltInRow>() {
        let record = record.map_err(|e| e.to_string())?;
        rows.insert(
            record.id,
            TankRow {
                country: record.country,
                class: record.class,
                category: record.category,
                tier: record.tier,
            },
        );
    }
    Ok(rows)
}

fn read_property_body(
    path: &Path,
) -> Result<(HashMap<String, String>, Option<InheritRef>), String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;

    let mut inherits = None;
    if let Some(first) = content.lines().next()
        && let Some(comment) = first.trim().strip_prefix('#')
        && let Some(directive) = comment.trim().strip_prefix("inherit:")
    {
        inherits = Some(parse_inherit_target(directive).ok_or("malformed inherit directive")?);
    }

    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .from_reader(content.as_bytes());

    let mut rows = HashMap::new();
    for record in reader.deserialize::<PropertyRow>() {
        let record = record.map_err(|e| e.to_string())?;
        rows.insert(record.id, record.value);
    }
    Ok((rows, inherits))
}

/// Parse the positional inherit target: `<property>[, <language>[, <author>]]`.
fn parse_inherit_target(directive: &str) -> Option<InheritRef> {
    let mut parts = directive.split(',').map(str::trim);
    let property = parts.next()?;
    if property.is_empty() {
        return None;
    }
    let language = parts.next().filter(|p| !p.is_empty()).map(str::to_string);
    let author = parts.next().filter(|p| !p.is_empty()).map(str::to_string);
    Some(InheritRef {
        property: property.to_string(),
        language,
        author,
    })
}

// ===========================================================================
// Tests
// ===========================================================================
