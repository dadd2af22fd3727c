//! Main decoder API
//!
//! This module provides the primary interface for the decoder library.
//! The Decoder struct runs the whole pipeline: load lines, parse the header
//! into symbol tables, normalize the data records, partition them into
//! channels and, on request, align and color the pressure trace.

use crate::align::{align, AlignedFrame};
use crate::config::{AlignConfig, TraceConfig};
use crate::dump::{load_file, load_lines, normalize, Channels, DumpLines, EventTable};
use crate::symbols::{parse_header, SymbolTables};
use crate::types::Result;
use serde::Serialize;
use std::path::Path;

/// The main decoder struct - entry point for all decoding operations
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    /// Settings used by [`Decoder::decode_file`] and [`Decoder::decode_str`]
    config: TraceConfig,
}

impl Decoder {
    /// Create a decoder with default trace settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with the given trace settings
    pub fn with_config(config: TraceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Parse a dump held in memory
    ///
    /// # Example
    /// ```
    /// use evdump_decoder::Decoder;
    ///
    /// let text = "# Event type 3 (EV_ABS)\n# Event code 0 (ABS_X)\n- [1, 0, 3, 0, 42] # ABS_X\n";
    /// let dump = Decoder::new().parse_str(text).unwrap();
    /// assert_eq!(dump.events.len(), 1);
    /// ```
    pub fn parse_str(&self, text: &str) -> Result<ParsedDump> {
        parse_dump(&load_lines(text)?)
    }

    /// Parse a dump file
    ///
    /// # Example
    /// ```no_run
    /// use evdump_decoder::Decoder;
    /// use std::path::Path;
    ///
    /// let dump = Decoder::new().parse_file(Path::new("session.yml")).unwrap();
    /// println!("{} records", dump.events.len());
    /// ```
    pub fn parse_file(&self, path: &Path) -> Result<ParsedDump> {
        let lines = load_file(path)?;
        let dump = parse_dump(&lines)?;
        log::info!("Dump file decoded successfully: {:?}", path);
        Ok(dump)
    }

    /// Parse a dump held in memory and build its pressure trace
    pub fn decode_str(&self, text: &str) -> Result<PressureTrace> {
        self.parse_str(text)?.trace(&self.config)
    }

    /// Parse a dump file and build its pressure trace
    pub fn decode_file(&self, path: &Path) -> Result<PressureTrace> {
        self.parse_file(path)?.trace(&self.config)
    }
}

fn parse_dump(lines: &DumpLines) -> Result<ParsedDump> {
    let mut cursor = lines.cursor();
    let symbols = parse_header(&mut cursor);
    let events = normalize(cursor.into_remaining(), &symbols)?;
    let channels = events.partition();

    Ok(ParsedDump {
        symbols,
        events,
        channels,
    })
}

/// Everything read from one dump
#[derive(Debug, Clone)]
pub struct ParsedDump {
    /// Type, code and property tables from the header
    pub symbols: SymbolTables,
    /// Named records in dump order
    pub events: EventTable,
    /// Records partitioned per observed code
    pub channels: Channels,
}

impl ParsedDump {
    /// Align the configured position and pressure channels
    pub fn align(&self, config: &AlignConfig) -> Result<AlignedFrame> {
        let x = self.channels.require(&config.x_channel)?;
        let y = self.channels.require(&config.y_channel)?;
        let pressure = self.channels.require(&config.pressure_channel)?;
        align(x, y, pressure, config.time_axis)
    }

    /// Align the channels and color every row
    pub fn trace(&self, config: &TraceConfig) -> Result<PressureTrace> {
        let frame = self.align(&config.align)?;
        let colors = frame.colors(&config.color)?;
        let max_pressure = frame.max_pressure().unwrap_or(0.0);

        Ok(PressureTrace {
            frame,
            colors,
            max_pressure,
        })
    }
}

/// Aligned frame plus one color value per row
#[derive(Debug, Clone, PartialEq)]
pub struct PressureTrace {
    pub frame: AlignedFrame,
    pub colors: Vec<f64>,
    /// Largest pressure in the session
    pub max_pressure: f64,
}

/// A single point of a pressure trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TracePoint {
    pub t: f64,
    pub x: f64,
    pub y: f64,
    pub pressure: f64,
    pub dpdt: f64,
    pub color: f64,
}

impl PressureTrace {
    pub fn len(&self) -> usize {
        self.frame.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.is_empty()
    }

    /// Iterate over points in time order
    pub fn points(&self) -> impl Iterator<Item = TracePoint> + '_ {
        self.frame
            .rows()
            .zip(&self.colors)
            .map(|(row, &color)| TracePoint {
                t: row.t,
                x: row.x,
                y: row.y,
                pressure: row.pressure,
                dpdt: row.dpdt,
                color,
            })
    }
}
