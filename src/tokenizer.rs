//! Splits a single GEDCOM line into its semantic tokens.
//!
//! The grammar, from [GEDCOM Standard Release
//! 5.5.1](https://gedcom.io/specifications/ged551.pdf) p.11, is
//! `gedcom_line: level + delim + [optional_xref_ID] + tag +
//! [optional_line_value] + terminator`. The lexer here works on one logical
//! line at a time, with the terminator and surrounding whitespace already
//! stripped by the caller, and borrows every token from the input rather
//! than copying it.
//!
//! Whitespace is exactly `' '` and `'\t'`.

use std::fmt;

/// The tokens of one lexed GEDCOM line, borrowed from the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LexedLine<'a> {
    /// Nesting depth; level 0 opens a new record.
    pub level: u8,
    /// The cross-reference identifier, including its `@` delimiters.
    pub xref: Option<&'a str>,
    /// The tag naming the line's meaning, compared case-sensitively.
    pub tag: &'a str,
    /// The remainder of the line, verbatim. Empty when absent.
    pub value: &'a str,
}

/// Why a physical line failed to lex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LexError {
    /// The line was empty after trimming.
    EmptyLine,
    /// The level slot held something other than ASCII digits.
    InvalidLevel,
    /// An xref was present but no tag followed it.
    MissingTag,
    /// The line ran out before a tag appeared.
    InsufficientParts,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            LexError::EmptyLine => "empty line",
            LexError::InvalidLevel => "level is not a non-negative integer",
            LexError::MissingTag => "cross-reference without a tag",
            LexError::InsufficientParts => "line has too few tokens",
        };
        f.write_str(message)
    }
}

impl std::error::Error for LexError {}

#[inline]
fn is_delim(byte: u8) -> bool {
    byte == b' ' || byte == b'\t'
}

/// Position of the next delimiter at or after `from`, or the line's end.
#[inline]
fn find_delim(line: &str, from: usize) -> usize {
    line.as_bytes()[from..]
        .iter()
        .position(|&b| is_delim(b))
        .map_or(line.len(), |i| from + i)
}

/// Position of the next non-delimiter at or after `from`, or the line's end.
#[inline]
fn skip_delims(line: &str, from: usize) -> usize {
    line.as_bytes()[from..]
        .iter()
        .position(|&b| !is_delim(b))
        .map_or(line.len(), |i| from + i)
}

/// Lexes one logical GEDCOM line.
///
/// The input must already be trimmed of its terminator and surrounding
/// whitespace. On success every token is a slice of `line`; the value is
/// preserved verbatim, internal whitespace included. No allocation happens
/// on either path.
///
/// # Errors
///
/// Returns a [`LexError`] describing the first structural problem found.
pub fn lex(line: &str) -> Result<LexedLine<'_>, LexError> {
    if line.is_empty() {
        return Err(LexError::EmptyLine);
    }

    // Level: a run of ASCII digits up to the first delimiter.
    let level_end = find_delim(line, 0);
    let level_str = &line[..level_end];
    if level_str.is_empty() || !level_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LexError::InvalidLevel);
    }
    let level: u8 = level_str.parse().map_err(|_| LexError::InvalidLevel)?;

    let mut cursor = skip_delims(line, level_end);
    if cursor >= line.len() {
        return Err(LexError::InsufficientParts);
    }

    // Optional xref: `@` up to and including the closing `@`.
    let mut xref = None;
    if line.as_bytes()[cursor] == b'@' {
        let Some(close) = line[cursor + 1..].find('@') else {
            return Err(LexError::InsufficientParts);
        };
        let end = cursor + 1 + close + 1;
        xref = Some(&line[cursor..end]);
        cursor = skip_delims(line, end);
        if cursor >= line.len() {
            return Err(LexError::MissingTag);
        }
    }

    // Tag: the next delimiter-free run.
    let tag_end = find_delim(line, cursor);
    let tag = &line[cursor..tag_end];

    // Value: everything after a single delimiter, verbatim.
    let value = if tag_end < line.len() {
        &line[tag_end + 1..]
    } else {
        ""
    };

    Ok(LexedLine {
        level,
        xref,
        tag,
        value,
    })
}
