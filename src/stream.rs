//! Pull-style streaming over level-0 records.
//!
//! [`RecordIterator`] wraps the streaming driver in a producer thread that
//! parses ahead and hands completed records over a bounded channel; the
//! consumer pulls them one at a time and never holds more than the
//! channel's worth of look-ahead. [`close`](RecordIterator::close) signals
//! the producer, which observes cancellation at its next send; closing
//! also drains the channel so a blocked producer can exit.
//!
//! Records yielded here are not bound to a tree; xref resolution on them
//! answers "absent". Diagnostics collected while parsing are available
//! from [`errors`](RecordIterator::errors) once iteration completes.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, Receiver};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::diagnostics::ErrorCollector;
use crate::parser::parse_with_handler;
use crate::records::Record;
use crate::tree::Tree;
use crate::GedcomError;

/// How many parsed records the producer may run ahead of the consumer.
const RECORD_CHANNEL_CAPACITY: usize = 16;

enum StreamItem {
    Record(Record),
    Finished(Box<ErrorCollector>),
    Failed(Box<GedcomError>),
}

/// A pull-style iterator over the level-0 records of a GEDCOM source.
///
/// ```no_run
/// use std::fs::File;
/// use std::io::BufReader;
/// use ged_tree::stream::RecordIterator;
///
/// let file = File::open("family.ged").unwrap();
/// for record in RecordIterator::new(BufReader::new(file)) {
///     let record = record.unwrap();
///     println!("{:?} {:?}", record.kind(), record.xref());
/// }
/// ```
pub struct RecordIterator {
    receiver: Receiver<StreamItem>,
    cancel: Arc<AtomicBool>,
    producer: Option<JoinHandle<()>>,
    errors: ErrorCollector,
    finished: bool,
}

impl RecordIterator {
    /// Spawns the producer over `reader` and returns the consumer end.
    ///
    /// The reader must supply UTF-8; a UTF-16 source surfaces as an
    /// [`GedcomError::Encoding`] item.
    #[must_use]
    pub fn new<R>(reader: R) -> RecordIterator
    where
        R: BufRead + Send + 'static,
    {
        let (sender, receiver) = sync_channel(RECORD_CHANNEL_CAPACITY);
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_flag = Arc::clone(&cancel);

        let producer = std::thread::spawn(move || {
            let outcome = parse_with_handler(reader, |record| {
                if cancel_flag.load(Ordering::Relaxed) {
                    return Err(GedcomError::Handler("iterator closed".to_string()));
                }
                sender
                    .send(StreamItem::Record(record))
                    .map_err(|_| GedcomError::Handler("consumer dropped".to_string()))
            });
            let last = match outcome {
                Ok(errors) => StreamItem::Finished(Box::new(errors)),
                Err(error) => StreamItem::Failed(Box::new(error)),
            };
            let _ = sender.send(last);
        });

        RecordIterator {
            receiver,
            cancel,
            producer: Some(producer),
            errors: ErrorCollector::new(),
            finished: false,
        }
    }

    /// Diagnostics collected during the parse. Complete once iteration
    /// has finished or the iterator was closed.
    #[must_use]
    pub fn errors(&self) -> &ErrorCollector {
        &self.errors
    }

    /// Stops the producer and drains the channel.
    ///
    /// The producer observes the signal at its next send and aborts its
    /// parse. After closing, [`Iterator::next`] returns `None`; any
    /// diagnostics that made it out are retained.
    pub fn close(&mut self) {
        if self.finished && self.producer.is_none() {
            return;
        }
        self.cancel.store(true, Ordering::Relaxed);
        while let Ok(item) = self.receiver.recv() {
            if let StreamItem::Finished(errors) = item {
                self.errors = *errors;
            }
        }
        self.finished = true;
        self.join_producer();
    }

    fn join_producer(&mut self) {
        if let Some(handle) = self.producer.take() {
            let _ = handle.join();
        }
    }
}

impl Iterator for RecordIterator {
    type Item = Result<Record, GedcomError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.receiver.recv() {
            Ok(StreamItem::Record(record)) => Some(Ok(record)),
            Ok(StreamItem::Finished(errors)) => {
                self.errors = *errors;
                self.finished = true;
                self.join_producer();
                None
            }
            Ok(StreamItem::Failed(error)) => {
                self.finished = true;
                self.join_producer();
                Some(Err(*error))
            }
            Err(_) => {
                self.finished = true;
                self.join_producer();
                None
            }
        }
    }
}

impl Drop for RecordIterator {
    fn drop(&mut self) {
        self.close();
    }
}

/// Collects streamed records into a [`Tree`], indexing as it goes.
impl FromIterator<Record> for Tree {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let tree = Tree::new();
        for record in iter {
            tree.add_record(record);
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RecordKind;
    use std::io::BufReader;

    const SAMPLE: &str = "\
        0 HEAD\n\
        1 GEDC\n\
        2 VERS 5.5\n\
        0 @I1@ INDI\n\
        1 NAME John /Doe/\n\
        0 @I2@ INDI\n\
        1 NAME Jane /Doe/\n\
        0 @F1@ FAM\n\
        1 HUSB @I1@\n\
        1 WIFE @I2@\n\
        0 TRLR";

    #[test]
    fn test_stream_yields_records_in_source_order() {
        let reader = BufReader::new(SAMPLE.as_bytes());
        let records: Vec<_> = RecordIterator::new(reader)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(records.len(), 4);
        assert!(records[0].is_header());
        assert_eq!(records[1].xref(), Some("@I1@"));
        assert_eq!(records[2].xref(), Some("@I2@"));
        assert!(records[3].is_family());
    }

    #[test]
    fn test_stream_records_fully_constructed() {
        let source = "0 @N1@ NOTE first\n1 CONC  part\n1 CONT second\n0 TRLR";
        let reader = BufReader::new(source.as_bytes());
        let records: Vec<_> = RecordIterator::new(reader)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        let note = records[0].as_note().unwrap();
        assert_eq!(note.text(), "first part\nsecond");
    }

    #[test]
    fn test_stream_errors_available_after_iteration() {
        let source = "0 HEAD\ngarbage\n0 @I1@ INDI\n0 TRLR";
        let mut iterator = RecordIterator::new(BufReader::new(source.as_bytes()));
        assert!(iterator.errors().is_empty());

        let count = iterator.by_ref().filter(Result::is_ok).count();
        assert_eq!(count, 2);
        assert_eq!(iterator.errors().len(), 1);
    }

    #[test]
    fn test_close_unblocks_and_ends_iteration() {
        // More records than the channel holds, so the producer must block.
        let mut source = String::from("0 HEAD\n");
        for i in 0..200 {
            source.push_str(&format!("0 @I{i}@ INDI\n1 NAME Person{i} //\n"));
        }
        source.push_str("0 TRLR\n");

        let cursor = std::io::Cursor::new(source.into_bytes());
        let mut iterator = RecordIterator::new(BufReader::new(cursor));
        let first = iterator.next().unwrap().unwrap();
        assert!(first.is_header());

        iterator.close();
        assert!(iterator.next().is_none());
        assert!(iterator.next().is_none());
    }

    #[test]
    fn test_stream_utf16_rejected() {
        let bytes: &[u8] = &[0xFF, 0xFE, b'0', 0, b' ', 0];
        let mut iterator = RecordIterator::new(BufReader::new(bytes));
        match iterator.next() {
            Some(Err(GedcomError::Encoding(message))) => {
                assert!(message.contains("UTF-8"));
            }
            other => panic!("expected encoding error, got {other:?}"),
        }
        assert!(iterator.next().is_none());
    }

    #[test]
    fn test_stream_empty_input_is_severe() {
        let mut iterator = RecordIterator::new(BufReader::new("".as_bytes()));
        assert!(matches!(
            iterator.next(),
            Some(Err(GedcomError::EmptyInput))
        ));
    }

    #[test]
    fn test_collect_into_tree() {
        let reader = BufReader::new(SAMPLE.as_bytes());
        let tree: Tree = RecordIterator::new(reader)
            .collect::<Result<Tree, _>>()
            .unwrap();

        assert!(tree.header().is_some());
        assert_eq!(tree.counts().individuals, 2);
        assert_eq!(tree.counts().families, 1);
        // Collected records are bound: resolution works.
        let family = tree.get_family("@F1@").unwrap();
        assert_eq!(family.husband().unwrap().xref(), Some("@I1@"));
    }

    #[test]
    fn test_stream_record_kinds() {
        let reader = BufReader::new(SAMPLE.as_bytes());
        let kinds: Vec<RecordKind> = RecordIterator::new(reader)
            .map(|r| r.unwrap().kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                RecordKind::Header,
                RecordKind::Individual,
                RecordKind::Individual,
                RecordKind::Family,
            ]
        );
    }
}
