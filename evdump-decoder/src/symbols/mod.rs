//! Dump header parsing and symbol tables
//!
//! This module turns the self-describing dump header into lookup tables
//! mapping numeric event identifiers to their names.

pub mod header;
pub mod tables;

// Re-export key types for convenience
pub use header::parse_header;
pub use tables::{PropertyMap, SymbolStats, SymbolTables};
