/*!
`ged_tree` is a Rust crate for reading GEDCOM 5.5.x files into a queryable
in-memory tree of typed records.

The library works with GEDCOM (GEnealogical Data Communication), the
line-oriented text format genealogy software uses to exchange family
history data. `ged_tree` decodes the source (UTF-8 with or without BOM,
UTF-16, ANSEL, ASCII, Windows-1252), builds every record's line tree with
a permissive error-collecting parser, and indexes the result by variant,
cross-reference, and UUID.

Batch example:

```rust
use ged_tree::parse_str;

# fn main() -> Result<(), ged_tree::GedcomError> {
let source = "\
    0 HEAD\n\
    1 GEDC\n\
    2 VERS 5.5\n\
    0 @I1@ INDI\n\
    1 NAME John /Doe/\n\
    1 BIRT\n\
    2 DATE 2 Oct 1822\n\
    0 TRLR";

let (tree, errors) = parse_str(source)?;
assert!(!errors.has_severe_errors());

let john = tree.get_individual("@I1@").unwrap();
assert_eq!(john.get_value("NAME"), "John /Doe/");
assert_eq!(john.get_value("BIRT.DATE"), "2 Oct 1822");
# Ok(())
# }
```

Streaming example, for files too large to hold as a tree:

```rust
use ged_tree::parse_with_handler;

# fn main() -> Result<(), ged_tree::GedcomError> {
let source = "0 @I1@ INDI\n1 NAME John /Doe/\n0 @I2@ INDI\n0 TRLR";
let mut individuals = 0;

let errors = parse_with_handler(source.as_bytes(), |record| {
    if record.is_individual() {
        individuals += 1;
    }
    Ok(())
})?;

assert_eq!(individuals, 2);
assert!(errors.is_empty());
# Ok(())
# }
```

The parser never aborts on a malformed line, an orphaned line, or an
illegal continuation; those become [`diagnostics::Diagnostic`]s in the
returned collector, and only Severe file-level conditions (I/O, empty
input, undecodable bytes) surface as a [`GedcomError`].

This crate contains an optional `"json"` feature that implements
serialization of the value types (dates, places, names, events, line
trees, diagnostics) with [`serde`](https://serde.rs).
*/

#![deny(clippy::pedantic)]
#![warn(missing_docs)]

pub mod diagnostics;
pub mod encoding;
/// Error types for the `ged_tree` crate.
pub mod error;
pub mod line;
pub mod parser;
pub mod records;
pub mod stream;
pub mod tokenizer;
pub mod tree;
pub mod types;

pub use diagnostics::{Context, Diagnostic, ErrorCollector, Severity};
pub use error::GedcomError;
pub use parser::{parse_bytes, parse_file, parse_str, parse_with_handler};
pub use records::{
    Family, GenericRecord, Header, Individual, Multimedia, Note, Record, RecordKind, Repository,
    Source, Submitter,
};
pub use stream::RecordIterator;
pub use tree::{Tree, TreeCounts};
