//! The line-to-tree construction algorithm.
//!
//! One pass over the decoded source drives four pieces: the line lexer,
//! the parent stack that finds each line's ancestor, the continuation
//! accumulator that folds `CONC`/`CONT` into the value they extend, and
//! the record factory invoked at every level-0 boundary. The same loop
//! serves the batch parser and the streaming driver; they differ only in
//! the sink each completed record is handed to.
//!
//! The parser is deliberately hard to kill: a malformed line, an orphaned
//! line, or an illegal continuation is a warning and a skip, never an
//! abort. Hard failures are reserved for I/O and empty input.

use std::io::BufRead;
use std::mem;

use tracing::debug;

use crate::diagnostics::{Context, ErrorCollector};
use crate::encoding;
use crate::line::{LineArena, LineId, LineNode};
use crate::records::{is_well_formed_xref, Record};
use crate::tokenizer::{lex, LexedLine};
use crate::tree::Tree;
use crate::GedcomError;

/// The open ancestor chain while a record is under construction.
///
/// Levels are strictly increasing bottom to top; the stack is cleared at
/// every new level-0 record.
#[derive(Debug, Default)]
struct ParentStack {
    entries: Vec<(u8, LineId)>,
}

impl ParentStack {
    fn push(&mut self, level: u8, id: LineId) {
        self.entries.push((level, id));
    }

    fn peek(&self) -> Option<LineId> {
        self.entries.last().map(|&(_, id)| id)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    /// Pops until the top's level is strictly below `level`, then returns
    /// it. `None` means the line is orphaned.
    ///
    /// Popping, rather than requiring consecutive levels, is what makes
    /// non-consecutive level jumps tolerable: whatever ancestor has a
    /// smaller level becomes the parent.
    fn find_parent(&mut self, level: u8) -> Option<LineId> {
        while let Some(&(top_level, _)) = self.entries.last() {
            if top_level < level {
                break;
            }
            self.entries.pop();
        }
        self.peek()
    }
}

/// The `CONC`/`CONT` accumulation state.
///
/// Flushing is deferred: accumulated text is appended to the stack top
/// when the next non-continuation line arrives, or at end of input.
#[derive(Debug, Default)]
struct Continuation {
    last_was_continuation: bool,
    last_level: u8,
    buffer: String,
    pending: bool,
}

impl Continuation {
    /// Folds a continuation line in, or rejects it.
    ///
    /// A continuation must not be subordinate to another continuation: if
    /// the previous line was `CONC`/`CONT`, this line's level must not
    /// exceed it.
    fn accept(&mut self, line: &LexedLine<'_>) -> bool {
        if self.last_was_continuation && line.level > self.last_level {
            return false;
        }
        if line.tag == "CONT" {
            self.buffer.push('\n');
        }
        self.buffer.push_str(line.value);
        self.pending = true;
        self.last_was_continuation = true;
        self.last_level = line.level;
        true
    }

    /// Records a non-continuation line as the new baseline.
    fn baseline(&mut self, level: u8) {
        self.last_was_continuation = false;
        self.last_level = level;
    }

    /// Takes the accumulated text, if any.
    fn take_pending(&mut self) -> Option<String> {
        if self.pending {
            self.pending = false;
            Some(mem::take(&mut self.buffer))
        } else {
            None
        }
    }

    fn reset(&mut self) {
        *self = Continuation::default();
    }
}

/// A record's arena and stack while its lines are still arriving.
struct OpenRecord {
    arena: LineArena,
    stack: ParentStack,
}

impl OpenRecord {
    fn start(root: LineNode) -> OpenRecord {
        let arena = LineArena::with_root(root);
        let mut stack = ParentStack::default();
        stack.push(0, arena.root());
        OpenRecord { arena, stack }
    }

    fn flush_continuation(&mut self, pending: &str) {
        if let Some(top) = self.stack.peek() {
            self.arena.node_mut(top).value.push_str(pending);
        }
    }
}

/// Runs the construction loop over logical lines, handing every completed
/// level-0 record to `sink` in source order.
///
/// Returns the number of non-empty lines processed. An `Err` from the
/// line iterator (I/O) or from the sink (a streaming handler) stops the
/// loop and is returned as-is.
pub(crate) fn drive<I, S, F>(
    lines: I,
    errors: &mut ErrorCollector,
    mut sink: F,
) -> Result<u32, GedcomError>
where
    I: Iterator<Item = Result<(u32, S), GedcomError>>,
    S: AsRef<str>,
    F: FnMut(Record) -> Result<(), GedcomError>,
{
    let mut current: Option<OpenRecord> = None;
    let mut cont = Continuation::default();
    let mut processed: u32 = 0;

    for item in lines {
        let (line_number, raw) = item?;
        let trimmed = raw
            .as_ref()
            .trim_matches(|c| c == ' ' || c == '\t' || c == '\r');
        if trimmed.is_empty() {
            continue;
        }
        processed += 1;

        let line = match lex(trimmed) {
            Ok(line) => line,
            Err(error) => {
                errors.warning(
                    Context::LineParsing,
                    line_number,
                    format!("skipping malformed line: {error}"),
                );
                continue;
            }
        };

        // Continuations bypass the stack entirely.
        if line.tag == "CONC" || line.tag == "CONT" {
            if current.is_none() {
                errors.warning(
                    Context::Continuation,
                    line_number,
                    "continuation before any record; line dropped",
                );
            } else if !cont.accept(&line) {
                errors.warning(
                    Context::Continuation,
                    line_number,
                    "continuation subordinate to a continuation; line dropped",
                );
            }
            continue;
        }

        // A non-continuation line flushes whatever the accumulator holds
        // into the line that owns it, the current stack top.
        if let Some(pending) = cont.take_pending() {
            if let Some(open) = current.as_mut() {
                open.flush_continuation(&pending);
            }
        }

        if line.level == 0 {
            if let Some(open) = current.take() {
                finish(open.arena, &mut sink)?;
            }
            cont.reset();

            if let Some(xref) = line.xref {
                if !is_well_formed_xref(xref) {
                    errors.warning(
                        Context::FileValidation,
                        line_number,
                        format!("cross-reference \"{xref}\" is not @ALPHANUM{{1,20}}@"),
                    );
                }
            }
            let root = LineNode::new(0, line.tag, line.value, line.xref, line_number);
            current = Some(OpenRecord::start(root));
            cont.baseline(0);
        } else {
            let Some(open) = current.as_mut() else {
                errors.warning(
                    Context::Hierarchy,
                    line_number,
                    format!("orphaned line at level {}: no open record", line.level),
                );
                continue;
            };
            let Some(parent) = open.stack.find_parent(line.level) else {
                errors.warning(
                    Context::Hierarchy,
                    line_number,
                    format!("orphaned line at level {}: no admissible parent", line.level),
                );
                continue;
            };
            // Child lines never carry an xref of their own.
            let node = LineNode::new(line.level, line.tag, line.value, None, line_number);
            let id = open.arena.attach(parent, node);
            open.stack.push(line.level, id);
            cont.baseline(line.level);
        }
    }

    // End of input: flush, then close the record still open.
    if let Some(open) = current.as_mut() {
        if let Some(pending) = cont.take_pending() {
            open.flush_continuation(&pending);
        }
    }
    if let Some(open) = current.take() {
        finish(open.arena, &mut sink)?;
    }

    Ok(processed)
}

fn finish<F>(arena: LineArena, sink: &mut F) -> Result<(), GedcomError>
where
    F: FnMut(Record) -> Result<(), GedcomError>,
{
    if let Some(record) = Record::from_lines(arena) {
        debug!(xref = record.xref().unwrap_or(""), "record completed");
        sink(record)?;
    }
    Ok(())
}

/// Iterates logical lines of in-memory text, numbering from 1. Any of CR,
/// LF, or CRLF terminates a line.
struct LogicalLines<'a> {
    rest: &'a str,
    number: u32,
}

impl<'a> LogicalLines<'a> {
    fn new(text: &'a str) -> Self {
        LogicalLines {
            rest: text,
            number: 0,
        }
    }
}

impl<'a> Iterator for LogicalLines<'a> {
    type Item = (u32, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        self.number += 1;
        match self.rest.find(['\n', '\r']) {
            None => {
                let line = self.rest;
                self.rest = "";
                Some((self.number, line))
            }
            Some(at) => {
                let line = &self.rest[..at];
                let terminator = if self.rest[at..].starts_with("\r\n") {
                    2
                } else {
                    1
                };
                self.rest = &self.rest[at + terminator..];
                Some((self.number, line))
            }
        }
    }
}

fn register(tree: &Tree, record: Record) {
    if let Record::Header(header) = &record {
        if let Some(version) = header.version() {
            tree.set_version(version.to_string());
        }
    }
    tree.add_record(record);
}

/// Parses in-memory UTF-8 text into a [`Tree`].
///
/// Recoverable problems land in the returned collector; the parse itself
/// only fails on empty input.
///
/// # Errors
///
/// Returns [`GedcomError::EmptyInput`] when the text holds no GEDCOM
/// lines.
pub fn parse_str(text: &str) -> Result<(Tree, ErrorCollector), GedcomError> {
    let mut errors = ErrorCollector::new();
    let tree = Tree::new();
    let processed = drive(
        LogicalLines::new(text).map(Ok),
        &mut errors,
        |record| {
            register(&tree, record);
            Ok(())
        },
    )?;
    if processed == 0 {
        return Err(GedcomError::EmptyInput);
    }
    tree.set_encoding("UTF-8".to_string());
    cross_check_declared_encoding(&tree, &mut errors);
    Ok((tree, errors))
}

/// Detects the encoding of raw bytes, decodes them, and parses the result.
///
/// # Errors
///
/// Returns [`GedcomError::EmptyInput`] when the decoded text holds no
/// GEDCOM lines.
pub fn parse_bytes(bytes: &[u8]) -> Result<(Tree, ErrorCollector), GedcomError> {
    let mut errors = ErrorCollector::new();
    let (text, used) = encoding::decode(bytes, &mut errors);

    let tree = Tree::new();
    let processed = drive(
        LogicalLines::new(&text).map(Ok),
        &mut errors,
        |record| {
            register(&tree, record);
            Ok(())
        },
    )?;
    if processed == 0 {
        return Err(GedcomError::EmptyInput);
    }
    tree.set_encoding(used.to_string());
    cross_check_declared_encoding(&tree, &mut errors);
    Ok((tree, errors))
}

/// Opens and parses a file.
///
/// # Errors
///
/// Returns [`GedcomError::Io`] when the file cannot be opened or read,
/// and [`GedcomError::EmptyInput`] when it holds no GEDCOM lines.
pub fn parse_file<P: AsRef<std::path::Path>>(
    path: P,
) -> Result<(Tree, ErrorCollector), GedcomError> {
    let bytes = std::fs::read(path)?;
    parse_bytes(&bytes)
}

/// Flags a `HEAD.CHAR` declaration the detector could not place.
fn cross_check_declared_encoding(tree: &Tree, errors: &mut ErrorCollector) {
    let Some(header) = tree.header() else {
        return;
    };
    let Some(declared) = header.declared_encoding() else {
        return;
    };
    if encoding::normalize_declared(declared).is_none() {
        errors.info(
            Context::EncodingDetection,
            0,
            format!("unrecognized CHAR value \"{declared}\""),
        );
    }
}

/// Streams records to a handler without retaining them.
///
/// The handler runs once per level-0 record, in source order, with the
/// record fully constructed: descendants attached, continuations
/// flushed. Records handed out this way are not bound to any tree, so
/// xref resolution on them answers "absent". A handler failure stops the
/// parse and is surfaced verbatim.
///
/// The reader must supply UTF-8; a UTF-16 source is rejected rather than
/// misread.
///
/// # Errors
///
/// Returns the handler's failure, [`GedcomError::Io`] on read errors,
/// [`GedcomError::Encoding`] on non-UTF-8 input, and
/// [`GedcomError::EmptyInput`] on an empty source.
pub fn parse_with_handler<R, F>(reader: R, handler: F) -> Result<ErrorCollector, GedcomError>
where
    R: BufRead,
    F: FnMut(Record) -> Result<(), GedcomError>,
{
    let mut errors = ErrorCollector::new();
    let processed = drive(ReaderLines::new(reader), &mut errors, handler)?;
    if processed == 0 {
        return Err(GedcomError::EmptyInput);
    }
    Ok(errors)
}

/// Iterates logical lines off a `BufRead`, numbering from 1.
struct ReaderLines<R> {
    reader: R,
    number: u32,
    buffer: String,
}

impl<R: BufRead> ReaderLines<R> {
    fn new(reader: R) -> Self {
        ReaderLines {
            reader,
            number: 0,
            buffer: String::with_capacity(256),
        }
    }
}

impl<R: BufRead> Iterator for ReaderLines<R> {
    type Item = Result<(u32, String), GedcomError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        match self.reader.read_line(&mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                self.number += 1;
                let mut line = mem::take(&mut self.buffer);
                if self.number == 1 {
                    // A stray UTF-8 BOM belongs to no line.
                    if let Some(stripped) = line.strip_prefix('\u{FEFF}') {
                        line = stripped.to_string();
                    }
                }
                Some(Ok((self.number, line)))
            }
            Err(error) if error.kind() == std::io::ErrorKind::InvalidData => {
                Some(Err(GedcomError::Encoding(
                    "streaming requires UTF-8 input; the source appears to use another encoding"
                        .to_string(),
                )))
            }
            Err(error) => Some(Err(GedcomError::Io(error))),
        }
    }
}
