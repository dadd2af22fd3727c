//! Dump header parser
//!
//! The header declares event types, the codes of each type and optional
//! integer properties of each code, nested three levels deep:
//!
//! ```text
//! # Event type 3 (EV_ABS)
//! #   Event code 0 (ABS_X)
//! #     Min 0
//! #     Max 8000
//! #   Event code 24 (ABS_PRESSURE)
//! #     Max 255
//! ```
//!
//! Each level is consumed with [`LineCursor::take_parsed`]; a failed match at
//! one level hands control back to the enclosing level, and the whole header
//! ends when no further type line is found at the head of the cursor.

use crate::dump::lines::LineCursor;
use crate::symbols::tables::SymbolTables;
use regex::Regex;
use std::sync::LazyLock;

/// `# Event type <id> (<name>)`
static EVENT_TYPE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#\s+Event\s+type\s+(\d+)\s+\(([^)]+)\)$").expect("valid event type regex")
});

/// `# Event code <id> (<name>)`
static EVENT_CODE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#\s+Event\s+code\s+(\d+)\s+\(([^)]+)\)$").expect("valid event code regex")
});

/// `# <property> <signed integer>`
static EVENT_PROPERTY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#\s+(\w+)\s+(-?\d+)$").expect("valid event property regex")
});

/// True if `line` declares an event type
pub fn is_event_type_line(line: &str) -> bool {
    EVENT_TYPE_LINE.is_match(line)
}

fn parse_id_name<'a>([id, name]: [&'a str; 2]) -> Option<(u32, &'a str)> {
    Some((id.parse().ok()?, name))
}

fn parse_property<'a>([name, value]: [&'a str; 2]) -> Option<(&'a str, i64)> {
    Some((name, value.parse().ok()?))
}

/// Consume the header from `cursor` and build the symbol tables
///
/// Lines that fit none of the three shapes are left in place; the first such
/// line at type level ends the header.
pub fn parse_header(cursor: &mut LineCursor<'_>) -> SymbolTables {
    let mut tables = SymbolTables::new();
    let start = cursor.position();

    while let Some((type_id, type_name)) = cursor.take_parsed(&EVENT_TYPE_LINE, parse_id_name) {
        tables.add_type(type_id, type_name);

        while let Some((code_id, code_name)) =
            cursor.take_parsed(&EVENT_CODE_LINE, parse_id_name)
        {
            tables.add_code(type_id, code_id, code_name);

            while let Some((property, value)) =
                cursor.take_parsed(&EVENT_PROPERTY_LINE, parse_property)
            {
                tables.add_property(code_name, property, value);
            }
        }
    }

    let stats = tables.stats();
    log::info!(
        "Parsed dump header: {} lines, {} types, {} codes, {} properties",
        cursor.position() - start,
        stats.num_types,
        stats.num_codes,
        stats.num_properties
    );

    tables
}
