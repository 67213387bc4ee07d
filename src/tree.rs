//! The tree: owner of all records, with per-variant, xref, and UUID
//! indices.
//!
//! All state lives behind one reader-writer lock. Writers (`add_record`,
//! the metadata setters) take the write side, so readers never observe a
//! partially indexed record; every `get_all_*` accessor returns a snapshot
//! copy, making external iteration safe against concurrent mutation.
//! Records are cheap to clone (they share their line subtree), so
//! snapshot semantics cost one map clone, not a deep copy.
//!
//! Duplicate xrefs are last-writer-wins; the validator, not the core,
//! flags them.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::records::{
    Family, GenericRecord, Header, Individual, Multimedia, Note, Record, Repository, Source,
    Submitter,
};

#[derive(Default)]
pub(crate) struct TreeInner {
    state: RwLock<TreeState>,
}

#[derive(Default)]
struct TreeState {
    header: Option<Header>,
    individuals: HashMap<String, Individual>,
    families: HashMap<String, Family>,
    notes: HashMap<String, Note>,
    sources: HashMap<String, Source>,
    repositories: HashMap<String, Repository>,
    submitters: HashMap<String, Submitter>,
    multimedia: HashMap<String, Multimedia>,
    others: Vec<GenericRecord>,
    xrefs: HashMap<String, Record>,
    uuids: HashMap<Uuid, Record>,
    encoding: Option<String>,
    version: Option<String>,
}

/// Record counts per variant, as returned by [`Tree::counts`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeCounts {
    /// Individuals indexed by xref.
    pub individuals: usize,
    /// Families indexed by xref.
    pub families: usize,
    /// Level-0 notes indexed by xref.
    pub notes: usize,
    /// Sources indexed by xref.
    pub sources: usize,
    /// Repositories indexed by xref.
    pub repositories: usize,
    /// Submitters indexed by xref.
    pub submitters: usize,
    /// Multimedia records indexed by xref.
    pub multimedia: usize,
}

/// A parsed GEDCOM document: every record, indexed three ways.
#[derive(Clone, Default)]
pub struct Tree {
    inner: Arc<TreeInner>,
}

impl std::fmt::Debug for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts = self.counts();
        f.debug_struct("Tree")
            .field("individuals", &counts.individuals)
            .field("families", &counts.families)
            .field("records", &self.record_count())
            .finish_non_exhaustive()
    }
}

impl Tree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Tree {
        Tree::default()
    }

    pub(crate) fn from_inner(inner: Arc<TreeInner>) -> Tree {
        Tree { inner }
    }

    pub(crate) fn inner(&self) -> &Arc<TreeInner> {
        &self.inner
    }

    /// Inserts a record, indexing it by variant, xref (when present), and
    /// always by UUID. The record is bound to this tree so its resolution
    /// helpers work. Duplicate xrefs are last-writer-wins.
    pub fn add_record(&self, record: Record) {
        record.bind_tree(&self.inner);
        let mut state = self.inner.state.write().unwrap();
        let xref = record.xref().map(ToString::to_string);

        match &record {
            Record::Header(header) => state.header = Some(header.clone()),
            Record::Individual(individual) => {
                if let Some(xref) = &xref {
                    state.individuals.insert(xref.clone(), individual.clone());
                }
            }
            Record::Family(family) => {
                if let Some(xref) = &xref {
                    state.families.insert(xref.clone(), family.clone());
                }
            }
            Record::Note(note) => {
                if let Some(xref) = &xref {
                    state.notes.insert(xref.clone(), note.clone());
                }
            }
            Record::Source(source) => {
                if let Some(xref) = &xref {
                    state.sources.insert(xref.clone(), source.clone());
                }
            }
            Record::Repository(repository) => {
                if let Some(xref) = &xref {
                    state.repositories.insert(xref.clone(), repository.clone());
                }
            }
            Record::Submitter(submitter) => {
                if let Some(xref) = &xref {
                    state.submitters.insert(xref.clone(), submitter.clone());
                }
            }
            Record::Multimedia(multimedia) => {
                if let Some(xref) = &xref {
                    state.multimedia.insert(xref.clone(), multimedia.clone());
                }
            }
            Record::Other(generic) => state.others.push(generic.clone()),
        }

        if let Some(xref) = xref {
            state.xrefs.insert(xref, record.clone());
        }
        state.uuids.insert(record.uuid(), record);
    }

    /// The header record, when the file had one.
    #[must_use]
    pub fn header(&self) -> Option<Header> {
        self.inner.state.read().unwrap().header.clone()
    }

    /// Looks up an individual by xref.
    #[must_use]
    pub fn get_individual(&self, xref: &str) -> Option<Individual> {
        self.inner.state.read().unwrap().individuals.get(xref).cloned()
    }

    /// Looks up a family by xref.
    #[must_use]
    pub fn get_family(&self, xref: &str) -> Option<Family> {
        self.inner.state.read().unwrap().families.get(xref).cloned()
    }

    /// Looks up a level-0 note by xref.
    #[must_use]
    pub fn get_note(&self, xref: &str) -> Option<Note> {
        self.inner.state.read().unwrap().notes.get(xref).cloned()
    }

    /// Looks up a source by xref.
    #[must_use]
    pub fn get_source(&self, xref: &str) -> Option<Source> {
        self.inner.state.read().unwrap().sources.get(xref).cloned()
    }

    /// Looks up a repository by xref.
    #[must_use]
    pub fn get_repository(&self, xref: &str) -> Option<Repository> {
        self.inner.state.read().unwrap().repositories.get(xref).cloned()
    }

    /// Looks up a submitter by xref.
    #[must_use]
    pub fn get_submitter(&self, xref: &str) -> Option<Submitter> {
        self.inner.state.read().unwrap().submitters.get(xref).cloned()
    }

    /// Looks up a multimedia record by xref.
    #[must_use]
    pub fn get_multimedia(&self, xref: &str) -> Option<Multimedia> {
        self.inner.state.read().unwrap().multimedia.get(xref).cloned()
    }

    /// Looks up any record by xref through the unified index.
    #[must_use]
    pub fn get_record_by_xref(&self, xref: &str) -> Option<Record> {
        self.inner.state.read().unwrap().xrefs.get(xref).cloned()
    }

    /// Looks up any record, header and xref-less records included, by
    /// its UUID.
    #[must_use]
    pub fn get_record_by_uuid(&self, uuid: Uuid) -> Option<Record> {
        self.inner.state.read().unwrap().uuids.get(&uuid).cloned()
    }

    /// A snapshot of the individual map.
    #[must_use]
    pub fn get_all_individuals(&self) -> HashMap<String, Individual> {
        self.inner.state.read().unwrap().individuals.clone()
    }

    /// A snapshot of the family map.
    #[must_use]
    pub fn get_all_families(&self) -> HashMap<String, Family> {
        self.inner.state.read().unwrap().families.clone()
    }

    /// A snapshot of the note map.
    #[must_use]
    pub fn get_all_notes(&self) -> HashMap<String, Note> {
        self.inner.state.read().unwrap().notes.clone()
    }

    /// A snapshot of the source map.
    #[must_use]
    pub fn get_all_sources(&self) -> HashMap<String, Source> {
        self.inner.state.read().unwrap().sources.clone()
    }

    /// A snapshot of the repository map.
    #[must_use]
    pub fn get_all_repositories(&self) -> HashMap<String, Repository> {
        self.inner.state.read().unwrap().repositories.clone()
    }

    /// A snapshot of the submitter map.
    #[must_use]
    pub fn get_all_submitters(&self) -> HashMap<String, Submitter> {
        self.inner.state.read().unwrap().submitters.clone()
    }

    /// A snapshot of the multimedia map.
    #[must_use]
    pub fn get_all_multimedia(&self) -> HashMap<String, Multimedia> {
        self.inner.state.read().unwrap().multimedia.clone()
    }

    /// A snapshot of the unified xref index.
    #[must_use]
    pub fn get_all_records(&self) -> HashMap<String, Record> {
        self.inner.state.read().unwrap().xrefs.clone()
    }

    /// A snapshot of the records with unrecognized level-0 tags, in
    /// arrival order.
    #[must_use]
    pub fn get_all_custom_records(&self) -> Vec<GenericRecord> {
        self.inner.state.read().unwrap().others.clone()
    }

    /// The encoding the source was decoded with, set once by the parser.
    #[must_use]
    pub fn encoding(&self) -> Option<String> {
        self.inner.state.read().unwrap().encoding.clone()
    }

    /// The declared GEDCOM version, from `HEAD.GEDC.VERS`.
    #[must_use]
    pub fn version(&self) -> Option<String> {
        self.inner.state.read().unwrap().version.clone()
    }

    pub(crate) fn set_encoding(&self, encoding: String) {
        self.inner.state.write().unwrap().encoding = Some(encoding);
    }

    pub(crate) fn set_version(&self, version: String) {
        self.inner.state.write().unwrap().version = Some(version);
    }

    /// Per-variant record counts.
    #[must_use]
    pub fn counts(&self) -> TreeCounts {
        let state = self.inner.state.read().unwrap();
        TreeCounts {
            individuals: state.individuals.len(),
            families: state.families.len(),
            notes: state.notes.len(),
            sources: state.sources.len(),
            repositories: state.repositories.len(),
            submitters: state.submitters.len(),
            multimedia: state.multimedia.len(),
        }
    }

    /// Total number of records in the UUID index, header included.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.inner.state.read().unwrap().uuids.len()
    }

    /// Whether the tree holds no records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}
