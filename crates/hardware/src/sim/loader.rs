//! Stimulus trace loader.
//!
//! A trace is one clock cycle per line. Blank lines and `#` comments are
//! skipped. Two line formats may be mixed freely:
//!
//! ```text
//! # op  address     data
//! X                         # reset
//! W     0x0000_0040 0xAAAA  # write
//! R     0x40                # read
//! RW    64          7       # both enables; behaves as a write
//! I                         # idle cycle
//! {"Request": {"address": 64, "read_en": true}}
//! "Reset"
//! ```
//!
//! Numbers are decimal or `0x`-prefixed hex and may contain `_` separators.
//! A line starting with `{` or `"` is parsed as a JSON [`Stimulus`].

use std::fs;
use std::path::Path;

use super::Stimulus;
use crate::cache::Request;
use crate::common::error::TraceError;

/// Reads and parses a trace file.
///
/// # Errors
///
/// Returns [`TraceError::Io`] if the file cannot be read, or the parse error
/// of the first malformed line.
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<Stimulus>, TraceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_trace(&text)
}

/// Parses trace text.
///
/// # Errors
///
/// Returns the error of the first malformed line, with its 1-based number.
pub fn parse_trace(text: &str) -> Result<Vec<Stimulus>, TraceError> {
    let mut trace = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        if let Some(stimulus) = parse_line(raw, index + 1)? {
            trace.push(stimulus);
        }
    }
    Ok(trace)
}

fn parse_line(raw: &str, line: usize) -> Result<Option<Stimulus>, TraceError> {
    let text = raw.trim();
    if text.starts_with('{') || text.starts_with('"') {
        return serde_json::from_str(text)
            .map(Some)
            .map_err(|source| TraceError::Json { line, source });
    }

    let text = text.split('#').next().unwrap_or_default().trim();
    if text.is_empty() {
        return Ok(None);
    }

    let syntax = |reason: String| TraceError::Syntax { line, reason };
    let mut fields = text.split_whitespace();
    let op = fields.next().unwrap_or_default().to_ascii_uppercase();
    let args: Vec<&str> = fields.collect();

    let expect_args = |n: usize| {
        if args.len() == n {
            Ok(())
        } else {
            Err(syntax(format!(
                "'{op}' takes {n} operand(s), found {}",
                args.len()
            )))
        }
    };
    let number = |s: &str| parse_number(s).ok_or_else(|| syntax(format!("bad number '{s}'")));

    let stimulus = match op.as_str() {
        "R" => {
            expect_args(1)?;
            Stimulus::Request(Request::read(number(args[0])?))
        }
        "W" => {
            expect_args(2)?;
            Stimulus::Request(Request::write(number(args[0])?, number(args[1])?))
        }
        "RW" | "WR" => {
            expect_args(2)?;
            Stimulus::Request(Request::read_write(number(args[0])?, number(args[1])?))
        }
        "I" => {
            expect_args(0)?;
            Stimulus::Request(Request::idle())
        }
        "X" => {
            expect_args(0)?;
            Stimulus::Reset
        }
        _ => return Err(syntax(format!("unknown operation '{op}'"))),
    };
    Ok(Some(stimulus))
}

/// Parses a decimal or `0x`-prefixed hexadecimal number.
pub fn parse_number(text: &str) -> Option<u64> {
    let cleaned = text.replace('_', "");
    match cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => cleaned.parse().ok(),
    }
}
