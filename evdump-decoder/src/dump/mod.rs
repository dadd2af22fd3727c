//! Dump text handling
//!
//! Loading the raw text into lines, the match-and-consume cursor used by the
//! header parser, and normalization of data lines into event records.

pub mod lines;
pub mod records;

// Re-export reader types
pub use lines::{load_file, load_lines, DumpLines, LineCursor, LineMatch};
pub use records::{normalize, parse_data_line, parse_event_tuple, Channels, EventTable};
