//! tankprops-data -- discovery and parsing of `Data-*.csv` files.
//!
//! Turns a directory of data files into the descriptors that
//! `tankprops_core::resolve` consumes. Filenames carry the record metadata
//! (property, language, author, game version, revision); bodies carry the
//! per-tank rows. Malformed files are skipped and reported, never fatal.

pub mod filename;
pub mod loader;

pub use loader::{DiscoveredData, LoadDiagnostic, LoadError, discover};
