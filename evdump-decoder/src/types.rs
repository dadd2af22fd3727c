//! Core types for the input-event dump decoder
//!
//! This module defines the fundamental values the decoder produces while
//! reading a dump: raw event tuples, named event records and the per-code
//! channel series built from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DumpError>;

/// Errors that can occur while decoding a dump
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No event type declaration found in dump")]
    NoHeader,

    #[error("Unknown event type {type_id} on line {line}")]
    UnknownEventType { type_id: i64, line: usize },

    #[error("Unknown event code {code_id} (type {type_id}) on line {line}")]
    UnknownEventCode {
        type_id: i64,
        code_id: i64,
        line: usize,
    },

    #[error("Required channel not present in dump: {0}")]
    MissingChannel(String),

    #[error("Invalid color scale: {0}")]
    InvalidColorScale(String),

    #[error("Degenerate session: {0}")]
    DegenerateSession(String),
}

/// Event tuple exactly as written on a data line: `[sec, usec, type, code, value]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    /// Whole seconds
    pub seconds: i64,
    /// Microseconds within the second
    pub micros: i64,
    /// Numeric event type (EV_*)
    pub type_id: i64,
    /// Numeric event code, scoped by type
    pub code_id: i64,
    /// Event value
    pub value: i64,
}

impl RawEvent {
    /// Build from the five decoded tuple fields
    pub fn from_fields(fields: [i64; 5]) -> Self {
        let [seconds, micros, type_id, code_id, value] = fields;
        Self {
            seconds,
            micros,
            type_id,
            code_id,
            value,
        }
    }

    /// Timestamp in fractional seconds
    pub fn timestamp(&self) -> f64 {
        timestamp_from_parts(self.seconds, self.micros)
    }
}

/// Combine a (seconds, microseconds) pair into fractional seconds
pub fn timestamp_from_parts(seconds: i64, micros: i64) -> f64 {
    seconds as f64 + micros as f64 / 1_000_000.0
}

/// A named input event, the row type of the event table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Timestamp in seconds
    pub timestamp: f64,
    /// Event type name (e.g. "EV_ABS")
    pub type_name: String,
    /// Event code name (e.g. "ABS_X")
    pub code_name: String,
    /// Raw event value
    pub value: i64,
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.6}] {} {} {}",
            self.timestamp, self.type_name, self.code_name, self.value
        )
    }
}

/// One sample of a channel series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: f64,
    pub value: i64,
}

/// All samples of a single (type, code) pair, in dump order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSeries {
    /// Owning event type name
    pub type_name: String,
    /// Event code name, which is also the channel name
    pub code_name: String,
    /// True if the header declared this code under this type
    pub declared: bool,
    /// Samples in the order they appeared in the dump
    pub samples: Vec<Sample>,
}

impl ChannelSeries {
    /// Create an empty series
    pub fn new(type_name: impl Into<String>, code_name: impl Into<String>, declared: bool) -> Self {
        Self {
            type_name: type_name.into(),
            code_name: code_name.into(),
            declared,
            samples: Vec::new(),
        }
    }

    /// Create a series from (timestamp, value) pairs
    ///
    /// The series is marked as declared by its type, as if the code had been
    /// listed under that type's header block.
    pub fn from_pairs(
        type_name: impl Into<String>,
        code_name: impl Into<String>,
        pairs: &[(f64, i64)],
    ) -> Self {
        let mut series = Self::new(type_name, code_name, true);
        for &(timestamp, value) in pairs {
            series.push(timestamp, value);
        }
        series
    }

    pub fn push(&mut self, timestamp: f64, value: i64) {
        self.samples.push(Sample { timestamp, value });
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Time span covered by this series, if it has any samples
    pub fn time_range(&self) -> Option<(f64, f64)> {
        let first = self.samples.iter().map(|s| s.timestamp).reduce(f64::min)?;
        let last = self.samples.iter().map(|s| s.timestamp).reduce(f64::max)?;
        Some((first, last))
    }
}
