//! Typed level-0 records and the factory that makes them.
//!
//! Every record owns its [`LineArena`] exclusively and carries a v4 UUID
//! assigned at construction. The factory is the single point of variant
//! selection: a level-0 tag maps to one of the typed variants, `TRLR` is
//! recognized and discarded, and anything else becomes a generic record.
//!
//! Records may be bound to their [`Tree`] through a weak back-reference so
//! that helpers like [`Family::husband`] can resolve xrefs; an unbound
//! record simply answers "absent".

use std::sync::{Arc, OnceLock, Weak};

use uuid::Uuid;

use crate::line::{LineArena, LineId, LineNode};
use crate::tree::{Tree, TreeInner};
use crate::types::event::{events_of, Event};
use crate::types::name::ParsedName;

/// The variant a record belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// `HEAD`
    Header,
    /// `INDI`
    Individual,
    /// `FAM`
    Family,
    /// `NOTE`
    Note,
    /// `SOUR`
    Source,
    /// `REPO`
    Repository,
    /// `SUBM`
    Submitter,
    /// `OBJE`
    Multimedia,
    /// Any unrecognized level-0 tag.
    Other,
}

/// The state shared by every record variant.
#[derive(Clone, Debug)]
pub(crate) struct RecordCore {
    uuid: Uuid,
    lines: Arc<LineArena>,
    tree: OnceLock<Weak<TreeInner>>,
}

impl RecordCore {
    fn new(lines: LineArena) -> Self {
        RecordCore {
            uuid: Uuid::new_v4(),
            lines: Arc::new(lines),
            tree: OnceLock::new(),
        }
    }

    fn tree(&self) -> Option<Tree> {
        self.tree
            .get()
            .and_then(Weak::upgrade)
            .map(Tree::from_inner)
    }
}

macro_rules! record_variants {
    ($($(#[$doc:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$doc])*
            #[derive(Clone, Debug)]
            pub struct $name {
                core: RecordCore,
            }

            impl $name {
                /// The record's stable, tree-unique identifier.
                #[must_use]
                pub fn uuid(&self) -> Uuid {
                    self.core.uuid
                }

                /// The record's cross-reference identifier, when it has one.
                #[must_use]
                pub fn xref(&self) -> Option<&str> {
                    self.core.lines.node(LineId::ROOT).xref.as_deref()
                }

                /// The record's level-0 root line.
                #[must_use]
                pub fn first_line(&self) -> &LineNode {
                    self.core.lines.node(LineId::ROOT)
                }

                /// The record's exclusively owned line subtree.
                #[must_use]
                pub fn lines(&self) -> &LineArena {
                    &self.core.lines
                }

                /// The value of the first line a dot-separated selector
                /// reaches, or `""`.
                #[must_use]
                pub fn get_value(&self, path: &str) -> &str {
                    self.core.lines.query_value(LineId::ROOT, path)
                }

                /// The values of all lines matched by the selector's final
                /// component, in insertion order.
                #[must_use]
                pub fn get_values(&self, path: &str) -> Vec<&str> {
                    self.core.lines.query_values(LineId::ROOT, path)
                }

                /// The line handles matched by the selector.
                #[must_use]
                pub fn get_lines(&self, path: &str) -> Vec<LineId> {
                    self.core.lines.query_lines(LineId::ROOT, path)
                }

                /// Typed events projected from this record's direct
                /// children.
                #[must_use]
                pub fn events(&self) -> Vec<Event> {
                    events_of(&self.core.lines, LineId::ROOT)
                }

                #[allow(dead_code)]
                fn tree(&self) -> Option<Tree> {
                    self.core.tree()
                }
            }
        )+
    };
}

record_variants!(
    /// The `HEAD` record: file metadata.
    Header,
    /// An `INDI` record: one person.
    Individual,
    /// A `FAM` record: one family unit.
    Family,
    /// A level-0 `NOTE` record.
    Note,
    /// A `SOUR` record: a source of facts.
    Source,
    /// A `REPO` record: where sources are held.
    Repository,
    /// A `SUBM` record: who submitted the data.
    Submitter,
    /// An `OBJE` record: a multimedia asset.
    Multimedia,
    /// A level-0 record with an unrecognized tag.
    GenericRecord,
);

impl Header {
    /// The declared GEDCOM version, from `GEDC.VERS`.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        let version = self.get_value("GEDC.VERS");
        (!version.is_empty()).then_some(version)
    }

    /// The declared character set, from `CHAR`.
    #[must_use]
    pub fn declared_encoding(&self) -> Option<&str> {
        let declared = self.get_value("CHAR");
        (!declared.is_empty()).then_some(declared)
    }
}

impl Individual {
    /// The primary parsed name, from the first `NAME` child.
    #[must_use]
    pub fn name(&self) -> Option<ParsedName> {
        self.get_lines("NAME")
            .into_iter()
            .next()
            .map(|id| ParsedName::from_line(&self.core.lines, id))
    }

    /// All parsed names, in insertion order.
    #[must_use]
    pub fn names(&self) -> Vec<ParsedName> {
        self.get_lines("NAME")
            .into_iter()
            .map(|id| ParsedName::from_line(&self.core.lines, id))
            .collect()
    }

    /// The `SEX` value, `""` when absent.
    #[must_use]
    pub fn sex(&self) -> &str {
        self.get_value("SEX")
    }

    /// The birth event, when present.
    #[must_use]
    pub fn birth(&self) -> Option<Event> {
        self.events().into_iter().find(|e| e.tag == "BIRT")
    }

    /// The death event, when present.
    #[must_use]
    pub fn death(&self) -> Option<Event> {
        self.events().into_iter().find(|e| e.tag == "DEAT")
    }

    /// Xrefs of the families this individual belongs to as a spouse.
    #[must_use]
    pub fn spouse_family_xrefs(&self) -> Vec<&str> {
        self.get_values("FAMS")
    }

    /// Xrefs of the families this individual belongs to as a child.
    #[must_use]
    pub fn child_family_xrefs(&self) -> Vec<&str> {
        self.get_values("FAMC")
    }
}

impl Family {
    /// The husband's xref, from `HUSB`.
    #[must_use]
    pub fn husband_xref(&self) -> Option<&str> {
        let xref = self.get_value("HUSB");
        (!xref.is_empty()).then_some(xref)
    }

    /// The wife's xref, from `WIFE`.
    #[must_use]
    pub fn wife_xref(&self) -> Option<&str> {
        let xref = self.get_value("WIFE");
        (!xref.is_empty()).then_some(xref)
    }

    /// The children's xrefs, from `CHIL`, in insertion order.
    #[must_use]
    pub fn children_xrefs(&self) -> Vec<&str> {
        self.get_values("CHIL")
    }

    /// Resolves the husband through the owning tree. Absent when the
    /// record is unbound or the xref dangles.
    #[must_use]
    pub fn husband(&self) -> Option<Individual> {
        let tree = self.tree()?;
        tree.get_individual(self.husband_xref()?)
    }

    /// Resolves the wife through the owning tree.
    #[must_use]
    pub fn wife(&self) -> Option<Individual> {
        let tree = self.tree()?;
        tree.get_individual(self.wife_xref()?)
    }

    /// Resolves the children through the owning tree, skipping dangling
    /// xrefs.
    #[must_use]
    pub fn children(&self) -> Vec<Individual> {
        let Some(tree) = self.tree() else {
            return Vec::new();
        };
        self.children_xrefs()
            .into_iter()
            .filter_map(|xref| tree.get_individual(xref))
            .collect()
    }
}

impl Note {
    /// The note text, with all continuations folded in.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.first_line().value
    }
}

impl Source {
    /// The source title, from `TITL`.
    #[must_use]
    pub fn title(&self) -> &str {
        self.get_value("TITL")
    }
}

impl Repository {
    /// The repository name, from `NAME`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.get_value("NAME")
    }
}

impl Submitter {
    /// The submitter name, from `NAME`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.get_value("NAME")
    }
}

impl Multimedia {
    /// The file reference, from `FILE`.
    #[must_use]
    pub fn file(&self) -> &str {
        self.get_value("FILE")
    }
}

impl GenericRecord {
    /// The unrecognized level-0 tag this record was built from.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.first_line().tag
    }
}

/// Any level-0 record.
#[derive(Clone, Debug)]
pub enum Record {
    /// File header.
    Header(Header),
    /// An individual person.
    Individual(Individual),
    /// A family unit.
    Family(Family),
    /// A top-level note.
    Note(Note),
    /// A source.
    Source(Source),
    /// A repository.
    Repository(Repository),
    /// A submitter.
    Submitter(Submitter),
    /// A multimedia object.
    Multimedia(Multimedia),
    /// Anything with an unrecognized tag.
    Other(GenericRecord),
}

macro_rules! for_each_variant {
    ($value:expr, $record:ident => $body:expr) => {
        match $value {
            Record::Header($record) => $body,
            Record::Individual($record) => $body,
            Record::Family($record) => $body,
            Record::Note($record) => $body,
            Record::Source($record) => $body,
            Record::Repository($record) => $body,
            Record::Submitter($record) => $body,
            Record::Multimedia($record) => $body,
            Record::Other($record) => $body,
        }
    };
}

impl Record {
    /// Builds a typed record from a completed line subtree.
    ///
    /// Returns `None` for `TRLR`, which is recognized and discarded.
    #[must_use]
    pub fn from_lines(lines: LineArena) -> Option<Record> {
        let tag = lines.node(LineId::ROOT).tag.clone();
        let core = RecordCore::new(lines);
        let record = match tag.as_str() {
            "HEAD" => Record::Header(Header { core }),
            "INDI" => Record::Individual(Individual { core }),
            "FAM" => Record::Family(Family { core }),
            "NOTE" => Record::Note(Note { core }),
            "SOUR" => Record::Source(Source { core }),
            "REPO" => Record::Repository(Repository { core }),
            "SUBM" => Record::Submitter(Submitter { core }),
            "OBJE" => Record::Multimedia(Multimedia { core }),
            "TRLR" => return None,
            _ => Record::Other(GenericRecord { core }),
        };
        Some(record)
    }

    /// The record's variant.
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Header(_) => RecordKind::Header,
            Record::Individual(_) => RecordKind::Individual,
            Record::Family(_) => RecordKind::Family,
            Record::Note(_) => RecordKind::Note,
            Record::Source(_) => RecordKind::Source,
            Record::Repository(_) => RecordKind::Repository,
            Record::Submitter(_) => RecordKind::Submitter,
            Record::Multimedia(_) => RecordKind::Multimedia,
            Record::Other(_) => RecordKind::Other,
        }
    }

    /// The record's stable, tree-unique identifier.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        for_each_variant!(self, record => record.uuid())
    }

    /// The record's cross-reference identifier, when it has one.
    #[must_use]
    pub fn xref(&self) -> Option<&str> {
        for_each_variant!(self, record => record.xref())
    }

    /// The record's level-0 root line.
    #[must_use]
    pub fn first_line(&self) -> &LineNode {
        for_each_variant!(self, record => record.first_line())
    }

    /// The record's exclusively owned line subtree.
    #[must_use]
    pub fn lines(&self) -> &LineArena {
        for_each_variant!(self, record => record.lines())
    }

    /// Evaluates a dot-separated selector; see
    /// [`LineArena::query_value`].
    #[must_use]
    pub fn get_value(&self, path: &str) -> &str {
        for_each_variant!(self, record => record.get_value(path))
    }

    /// Evaluates a selector over all final-component matches.
    #[must_use]
    pub fn get_values(&self, path: &str) -> Vec<&str> {
        for_each_variant!(self, record => record.get_values(path))
    }

    /// Evaluates a selector and returns matched line handles.
    #[must_use]
    pub fn get_lines(&self, path: &str) -> Vec<LineId> {
        for_each_variant!(self, record => record.get_lines(path))
    }

    /// Typed events projected from this record.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        for_each_variant!(self, record => record.events())
    }

    pub(crate) fn bind_tree(&self, inner: &Arc<TreeInner>) {
        for_each_variant!(self, record => {
            let _ = record.core.tree.set(Arc::downgrade(inner));
        });
    }

    /// Borrows the record as an `Individual`, if it is one.
    #[must_use]
    pub fn as_individual(&self) -> Option<&Individual> {
        match self {
            Record::Individual(individual) => Some(individual),
            _ => None,
        }
    }

    /// Converts the record into an `Individual`, if it is one.
    #[must_use]
    pub fn into_individual(self) -> Option<Individual> {
        match self {
            Record::Individual(individual) => Some(individual),
            _ => None,
        }
    }

    /// Borrows the record as a `Family`, if it is one.
    #[must_use]
    pub fn as_family(&self) -> Option<&Family> {
        match self {
            Record::Family(family) => Some(family),
            _ => None,
        }
    }

    /// Converts the record into a `Family`, if it is one.
    #[must_use]
    pub fn into_family(self) -> Option<Family> {
        match self {
            Record::Family(family) => Some(family),
            _ => None,
        }
    }

    /// Borrows the record as a `Header`, if it is one.
    #[must_use]
    pub fn as_header(&self) -> Option<&Header> {
        match self {
            Record::Header(header) => Some(header),
            _ => None,
        }
    }

    /// Borrows the record as a `Note`, if it is one.
    #[must_use]
    pub fn as_note(&self) -> Option<&Note> {
        match self {
            Record::Note(note) => Some(note),
            _ => None,
        }
    }

    /// Borrows the record as a `Source`, if it is one.
    #[must_use]
    pub fn as_source(&self) -> Option<&Source> {
        match self {
            Record::Source(source) => Some(source),
            _ => None,
        }
    }

    /// Borrows the record as a `Repository`, if it is one.
    #[must_use]
    pub fn as_repository(&self) -> Option<&Repository> {
        match self {
            Record::Repository(repository) => Some(repository),
            _ => None,
        }
    }

    /// Borrows the record as a `Submitter`, if it is one.
    #[must_use]
    pub fn as_submitter(&self) -> Option<&Submitter> {
        match self {
            Record::Submitter(submitter) => Some(submitter),
            _ => None,
        }
    }

    /// Borrows the record as a `Multimedia`, if it is one.
    #[must_use]
    pub fn as_multimedia(&self) -> Option<&Multimedia> {
        match self {
            Record::Multimedia(multimedia) => Some(multimedia),
            _ => None,
        }
    }

    /// Whether this is an `Individual` record.
    #[must_use]
    pub fn is_individual(&self) -> bool {
        matches!(self, Record::Individual(_))
    }

    /// Whether this is a `Family` record.
    #[must_use]
    pub fn is_family(&self) -> bool {
        matches!(self, Record::Family(_))
    }

    /// Whether this is a `Header` record.
    #[must_use]
    pub fn is_header(&self) -> bool {
        matches!(self, Record::Header(_))
    }
}

/// Whether an xref has the well-formed shape `@` + 1..=20 alphanumerics +
/// `@`. Format only; referential integrity is the validator's concern.
#[must_use]
pub fn is_well_formed_xref(xref: &str) -> bool {
    let Some(interior) = xref
        .strip_prefix('@')
        .and_then(|rest| rest.strip_suffix('@'))
    else {
        return false;
    };
    !interior.is_empty()
        && interior.len() <= 20
        && interior.bytes().all(|b| b.is_ascii_alphanumeric())
}
