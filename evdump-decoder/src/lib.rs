//! Input Event Dump Decoder Library
//!
//! A stateless, reusable library for decoding textual dumps of kernel
//! input-device events and deriving a pointer position versus pressure trace.
//!
//! # Architecture
//!
//! The pipeline runs in one synchronous pass:
//! - Loads the dump and drops everything before the header
//! - Parses the nested header into type/code/property symbol tables
//! - Normalizes `- [sec, usec, type, code, value] # ...` records into named events
//! - Partitions events into per-code channel series
//! - Aligns the X, Y and pressure channels onto a common time index
//! - Maps each row to a color value by pressure trend
//!
//! The library does NOT:
//! - Render plots or choose colormaps
//! - Parse command-line arguments or configuration files
//!
//! Those are handled by the application layer (evdump-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use evdump_decoder::{ColorDriver, ColorScale, Decoder, TraceConfig};
//! use std::path::Path;
//!
//! let config = TraceConfig::new()
//!     .with_color(ColorScale::new().with_driver(ColorDriver::Pressure));
//! let decoder = Decoder::with_config(config);
//!
//! let trace = decoder.decode_file(Path::new("session.yml")).unwrap();
//! for point in trace.points() {
//!     println!("{:.6} x={} y={} p={} color={:.3}", point.t, point.x, point.y, point.pressure, point.color);
//! }
//! ```

// Public modules
pub mod align;
pub mod color;
pub mod config;
pub mod decoder;
pub mod dump;
pub mod symbols;
pub mod types;

// Re-export main types for convenience
pub use align::{AlignedFrame, FrameRow};
pub use config::{AlignConfig, ColorDriver, ColorScale, TimeAxis, TraceConfig};
pub use decoder::{Decoder, ParsedDump, PressureTrace, TracePoint};
pub use dump::{Channels, EventTable};
pub use symbols::{PropertyMap, SymbolStats, SymbolTables};
pub use types::{ChannelSeries, DumpError, EventRecord, RawEvent, Result, Sample};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: an empty header-only dump parses to empty tables
        let dump = Decoder::new().parse_str("# Event type 0 (EV_SYN)\n").unwrap();
        assert_eq!(dump.symbols.stats().num_types, 1);
        assert!(dump.events.is_empty());
        assert!(dump.channels.is_empty());
    }
}
