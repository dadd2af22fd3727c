//! Line loading and the match-and-consume cursor
//!
//! A dump is loaded once into an immutable list of trimmed lines. Parsing
//! stages then walk it through a [`LineCursor`], which only ever looks at
//! the head line and advances by exactly one line per successful match.

use crate::symbols::header::is_event_type_line;
use crate::types::{DumpError, Result};
use regex::Regex;
use std::path::Path;

/// The trimmed lines of a dump, starting at the first event type declaration
#[derive(Debug, Clone)]
pub struct DumpLines {
    lines: Vec<String>,
    /// Number of lines dropped before the header
    skipped_prefix: usize,
}

impl DumpLines {
    /// Number of retained lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of leading lines discarded before the header
    pub fn skipped_prefix(&self) -> usize {
        self.skipped_prefix
    }

    /// Retained lines
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Cursor positioned at the first retained line
    pub fn cursor(&self) -> LineCursor<'_> {
        LineCursor::with_offset(&self.lines, self.skipped_prefix)
    }
}

/// Load a dump from text
///
/// Every line is trimmed and everything before the first event type
/// declaration is discarded.
pub fn load_lines(text: &str) -> Result<DumpLines> {
    let trimmed: Vec<&str> = text.lines().map(str::trim).collect();

    let first_header = trimmed
        .iter()
        .position(|line| is_event_type_line(line))
        .ok_or(DumpError::NoHeader)?;

    log::debug!("Discarding {} lines before dump header", first_header);

    Ok(DumpLines {
        lines: trimmed[first_header..].iter().map(|l| l.to_string()).collect(),
        skipped_prefix: first_header,
    })
}

/// Load a dump from a UTF-8 file
pub fn load_file(path: &Path) -> Result<DumpLines> {
    log::info!("Loading dump file: {:?}", path);
    let text = std::fs::read_to_string(path)?;
    load_lines(&text)
}

/// Outcome of a single match-and-consume attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMatch<'a, const N: usize> {
    /// The head line matched; it has been consumed
    Matched([&'a str; N]),
    /// The head line did not match (or there was none); nothing consumed
    NoMatch,
}

impl<'a, const N: usize> LineMatch<'a, N> {
    pub fn is_match(&self) -> bool {
        matches!(self, LineMatch::Matched(_))
    }

    /// Captured groups, if the line matched
    pub fn captures(self) -> Option<[&'a str; N]> {
        match self {
            LineMatch::Matched(groups) => Some(groups),
            LineMatch::NoMatch => None,
        }
    }
}

/// Read position over an immutable sequence of lines
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    lines: &'a [String],
    pos: usize,
    /// Added to positions when reporting 1-based line numbers
    line_offset: usize,
}

impl<'a> LineCursor<'a> {
    /// Cursor at the start of `lines`
    pub fn new(lines: &'a [String]) -> Self {
        Self::with_offset(lines, 0)
    }

    fn with_offset(lines: &'a [String], line_offset: usize) -> Self {
        Self {
            lines,
            pos: 0,
            line_offset,
        }
    }

    /// The head line, without consuming it
    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).map(String::as_str)
    }

    /// Number of lines consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of lines not yet consumed
    pub fn remaining(&self) -> usize {
        self.lines.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// 1-based line number of the head line in the original text
    pub fn line_number(&self) -> usize {
        self.line_offset + self.pos + 1
    }

    /// Try to consume the head line with `pattern`
    ///
    /// The line is consumed only if the pattern matches and exactly `N`
    /// capture groups participate in the match. Lines after the head are
    /// never inspected.
    pub fn take<const N: usize>(&mut self, pattern: &Regex) -> LineMatch<'a, N> {
        let Some(head) = self.peek() else {
            return LineMatch::NoMatch;
        };
        let Some(caps) = pattern.captures(head) else {
            return LineMatch::NoMatch;
        };
        if caps.len() - 1 != N {
            return LineMatch::NoMatch;
        }

        let mut groups = [""; N];
        for (slot, group) in groups.iter_mut().zip(caps.iter().skip(1)) {
            match group {
                Some(m) => *slot = m.as_str(),
                None => return LineMatch::NoMatch,
            }
        }

        self.pos += 1;
        LineMatch::Matched(groups)
    }

    /// Like [`take`](Self::take), but the line is only consumed when `parse`
    /// also turns the captures into a value
    pub fn take_parsed<const N: usize, T>(
        &mut self,
        pattern: &Regex,
        parse: impl FnOnce([&'a str; N]) -> Option<T>,
    ) -> Option<T> {
        let start = self.pos;
        let value = self.take::<N>(pattern).captures().and_then(parse);
        if value.is_none() {
            self.pos = start;
        }
        value
    }

    /// Consume the cursor, yielding the remaining lines with their 1-based
    /// line numbers
    pub fn into_remaining(self) -> impl Iterator<Item = (usize, &'a str)> {
        let first = self.line_number();
        let lines: &'a [String] = self.lines;
        lines[self.pos..]
            .iter()
            .enumerate()
            .map(move |(i, line)| (first + i, line.as_str()))
    }
}
