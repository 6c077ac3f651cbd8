//! Delimited-text parsing for capture result files.
//!
//! This is a line splitter, not a CSV grammar: a separator inside a quoted
//! field still splits the field, and escaped quotes are not unescaped.
//! Capture output never quotes separators, so that limitation is accepted.

use fare_core::RawRecord;

/// Field separator of a result file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Comma,
    Semicolon,
}

impl Separator {
    /// Sniff the separator from a header line: semicolon if present, else comma.
    pub fn detect(header_line: &str) -> Self {
        if header_line.contains(';') {
            Separator::Semicolon
        } else {
            Separator::Comma
        }
    }

    /// The separator character.
    #[inline]
    pub fn as_char(self) -> char {
        match self {
            Separator::Comma => ',',
            Separator::Semicolon => ';',
        }
    }
}

/// Non-blank lines of a text, in order. A leading byte-order mark is dropped.
pub fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.strip_prefix('\u{feff}')
        .unwrap_or(text)
        .lines()
        .filter(|line| !line.trim().is_empty())
}

/// Trim a cell and strip one pair of surrounding double quotes.
pub fn clean_cell(cell: &str) -> &str {
    let cell = cell.trim();
    if cell.len() >= 2 && cell.starts_with('"') && cell.ends_with('"') {
        &cell[1..cell.len() - 1]
    } else {
        cell
    }
}

/// Split a line on `sep` and clean every cell.
pub fn split_line(line: &str, sep: Separator) -> Vec<&str> {
    line.split(sep.as_char()).map(clean_cell).collect()
}

/// Parse a result file into records keyed by its header row.
///
/// Short rows are padded with empty strings; cells past the header are ignored.
pub fn parse_records(text: &str) -> Vec<RawRecord> {
    let mut lines = content_lines(text);
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };

    let sep = Separator::detect(header_line);
    let header = split_line(header_line, sep);

    lines
        .map(|line| {
            let cells = split_line(line, sep);
            header
                .iter()
                .enumerate()
                .map(|(i, &name)| (name, cells.get(i).copied().unwrap_or("")))
                .collect()
        })
        .collect()
}
