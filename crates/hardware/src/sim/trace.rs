//! Text trace reader.
//!
//! One reference per line:
//!
//! ```text
//! <core> <kind> <address> <pc> [size]
//! ```
//!
//! `kind` is a mnemonic accepted by [`AccessKind`]'s `FromStr` impl or a raw
//! code 0-4. Addresses and pcs are decimal or `0x`-prefixed hex. Blank lines
//! and lines starting with `#` are skipped.

use std::io::{self, BufRead};

use thiserror::Error;

use crate::common::{AccessKind, CacheError, Reference};

/// Errors raised while reading a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The underlying reader failed.
    #[error("failed to read trace: {0}")]
    Io(#[from] io::Error),

    /// A line did not have the expected shape.
    #[error("line {line}: {message}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    /// The access kind column named no known kind.
    #[error("line {line}: {source}")]
    Kind {
        /// 1-based line number.
        line: usize,
        /// The rejected kind.
        #[source]
        source: CacheError,
    },
}

/// Parses a decimal or `0x`-prefixed hexadecimal integer.
fn parse_u64(field: &str) -> Option<u64> {
    match field.strip_prefix("0x").or_else(|| field.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => field.parse().ok(),
    }
}

/// Parses one trace line.
///
/// Returns `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// Returns [`TraceError::Malformed`] for missing or unparsable fields and
/// [`TraceError::Kind`] for an unknown access kind.
pub fn parse_line(text: &str, line: usize, default_size: u32) -> Result<Option<Reference>, TraceError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let malformed = |message: String| TraceError::Malformed { line, message };
    let fields: Vec<&str> = text.split_whitespace().collect();
    if !(4..=5).contains(&fields.len()) {
        return Err(malformed(format!(
            "expected `<core> <kind> <address> <pc> [size]`, got {} fields",
            fields.len()
        )));
    }

    let core = fields[0]
        .parse::<usize>()
        .map_err(|_| malformed(format!("bad core `{}`", fields[0])))?;
    let kind = fields[1]
        .parse::<AccessKind>()
        .map_err(|source| TraceError::Kind { line, source })?;
    let address =
        parse_u64(fields[2]).ok_or_else(|| malformed(format!("bad address `{}`", fields[2])))?;
    let pc = parse_u64(fields[3]).ok_or_else(|| malformed(format!("bad pc `{}`", fields[3])))?;
    let size = match fields.get(4) {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| malformed(format!("bad size `{raw}`")))?,
        None => default_size,
    };

    Ok(Some(Reference::new(address, pc, size, kind, core)))
}

/// Iterator over the references of a text trace.
#[derive(Debug)]
pub struct TraceReader<R> {
    lines: io::Lines<R>,
    line: usize,
    default_size: u32,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered reader. `default_size` fills in a missing size column.
    pub fn new(reader: R, default_size: u32) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            default_size,
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<Reference, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;
            match parse_line(&text, self.line, self.default_size) {
                Ok(Some(reference)) => return Some(Ok(reference)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
