//! Event table normalization
//!
//! Scans the lines after the header for data records of the form
//! `- [sec, usec, type, code, value] # comment`, names each record through the
//! symbol tables and partitions the result into per-code channel series.

use crate::symbols::SymbolTables;
use crate::types::{ChannelSeries, DumpError, EventRecord, RawEvent, Result};
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

/// List marker, bracketed tuple, trailing comment
static DATA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-\s+\[([^\]]*)\]\s*#.*$").expect("valid data line regex")
});

/// Parse the inside of a tuple bracket as exactly five signed integers
pub fn parse_event_tuple(body: &str) -> Option<[i64; 5]> {
    let mut fields = [0i64; 5];
    let mut parts = body.split(',');
    for slot in fields.iter_mut() {
        *slot = parts.next()?.trim().parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(fields)
}

/// Parse a data line, returning `None` for any line that is not a record
pub fn parse_data_line(line: &str) -> Option<RawEvent> {
    let caps = DATA_LINE.captures(line)?;
    let fields = parse_event_tuple(caps.get(1)?.as_str())?;
    Some(RawEvent::from_fields(fields))
}

/// All named records of a dump, in dump order
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    records: Vec<EventRecord>,
    /// (type, code) pairs whose code name came from the type's own header block
    declared_pairs: HashSet<(String, String)>,
    skipped_lines: usize,
}

impl EventTable {
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of post-header lines that were not data records
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// Split the records into one series per observed (type, code) pair
    pub fn partition(&self) -> Channels {
        let mut series: BTreeMap<(String, String), ChannelSeries> = BTreeMap::new();

        for record in &self.records {
            let key = (record.type_name.clone(), record.code_name.clone());
            series
                .entry(key)
                .or_insert_with_key(|(type_name, code_name)| {
                    let declared = self
                        .declared_pairs
                        .contains(&(type_name.clone(), code_name.clone()));
                    ChannelSeries::new(type_name.as_str(), code_name.as_str(), declared)
                })
                .push(record.timestamp, record.value);
        }

        let channels = Channels { series };
        for code_name in channels.shared_code_names() {
            let kept = channels.get(code_name).map(|s| s.type_name.as_str());
            log::warn!(
                "Code {} observed under several types, lookups by name use {}",
                code_name,
                kept.unwrap_or("?")
            );
        }

        log::debug!(
            "Partitioned {} records into {} series",
            self.records.len(),
            channels.len()
        );
        channels
    }
}

/// Decode every data line in `lines` into named event records
///
/// `lines` yields `(line number, text)` pairs, typically the remainder of the
/// cursor after the header. Lines that are not data records are skipped. A
/// record whose type or code id has no symbol is an error.
pub fn normalize<'a>(
    lines: impl IntoIterator<Item = (usize, &'a str)>,
    symbols: &SymbolTables,
) -> Result<EventTable> {
    let mut table = EventTable::default();

    for (line_no, line) in lines {
        let Some(raw) = parse_data_line(line) else {
            log::trace!("Skipping non-record line {}: {}", line_no, line);
            table.skipped_lines += 1;
            continue;
        };

        let type_name = u32::try_from(raw.type_id)
            .ok()
            .and_then(|id| symbols.type_name(id))
            .ok_or(DumpError::UnknownEventType {
                type_id: raw.type_id,
                line: line_no,
            })?;

        let (code_name, declared) = u32::try_from(raw.type_id)
            .ok()
            .zip(u32::try_from(raw.code_id).ok())
            .and_then(|(type_id, code_id)| symbols.resolve_code(type_id, code_id))
            .ok_or(DumpError::UnknownEventCode {
                type_id: raw.type_id,
                code_id: raw.code_id,
                line: line_no,
            })?;

        if declared {
            table
                .declared_pairs
                .insert((type_name.to_string(), code_name.to_string()));
        }

        let record = EventRecord {
            timestamp: raw.timestamp(),
            type_name: type_name.to_string(),
            code_name: code_name.to_string(),
            value: raw.value,
        };
        log::trace!("Line {}: {}", line_no, record);
        table.records.push(record);
    }

    log::info!(
        "Normalized {} event records ({} other lines skipped)",
        table.records.len(),
        table.skipped_lines
    );
    Ok(table)
}

/// Channel series keyed by (type name, code name)
#[derive(Debug, Clone, Default)]
pub struct Channels {
    series: BTreeMap<(String, String), ChannelSeries>,
}

impl Channels {
    /// Number of series
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Look up the series for a code name
    ///
    /// If the name was observed under several types, the series whose type
    /// declared the code in the header is returned.
    pub fn get(&self, code_name: &str) -> Option<&ChannelSeries> {
        let mut candidates = self
            .series
            .values()
            .filter(|series| series.code_name == code_name);
        let first = candidates.next()?;
        if first.declared {
            return Some(first);
        }
        Some(candidates.find(|series| series.declared).unwrap_or(first))
    }

    /// Look up the series for a code name, failing if it never occurred
    pub fn require(&self, code_name: &str) -> Result<&ChannelSeries> {
        self.get(code_name)
            .ok_or_else(|| DumpError::MissingChannel(code_name.to_string()))
    }

    /// Look up the series for an exact (type, code) pair
    pub fn get_pair(&self, type_name: &str, code_name: &str) -> Option<&ChannelSeries> {
        self.series
            .get(&(type_name.to_string(), code_name.to_string()))
    }

    /// All series, ordered by type name then code name
    pub fn iter(&self) -> impl Iterator<Item = &ChannelSeries> {
        self.series.values()
    }

    /// Distinct observed code names, sorted
    pub fn code_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.series.values().map(|s| s.code_name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Code names observed under more than one type, sorted
    pub fn shared_code_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.series.values().map(|s| s.code_name.as_str()).collect();
        names.sort_unstable();
        let mut shared: Vec<&str> = names
            .windows(2)
            .filter(|pair| pair[0] == pair[1])
            .map(|pair| pair[0])
            .collect();
        shared.dedup();
        shared
    }
}
