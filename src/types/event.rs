//! Typed event projections over record subtrees.
//!
//! An [`Event`] is a derived, non-owning view: it copies the interpreted
//! pieces (date, place, sources, notes) out of an event line's subtree and
//! keeps a handle to the originating line. The set of recognized event
//! tags is fixed; anything under `EVEN` is a custom event whose effective
//! type comes from its `TYPE` sub-tag, then its value, then `"Unknown"`.

use crate::line::{LineArena, LineId};
use crate::types::date::ParsedDate;
use crate::types::place::ParsedPlace;

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

/// Recognized event tags and their type names.
///
/// Individual events first, family events after. `MARB` means "Marriage
/// Bann" here; the marriage-notice reading is not carried.
const EVENT_TAGS: &[(&str, &str)] = &[
    ("BIRT", "Birth"),
    ("CHR", "Christening"),
    ("BAPM", "Baptism"),
    ("BARM", "Bar Mitzvah"),
    ("BASM", "Bas Mitzvah"),
    ("BLES", "Blessing"),
    ("ADOP", "Adoption"),
    ("CHRA", "Adult Christening"),
    ("CONF", "Confirmation"),
    ("FCOM", "First Communion"),
    ("ORDN", "Ordination"),
    ("NATU", "Naturalization"),
    ("EMIG", "Emigration"),
    ("IMMI", "Immigration"),
    ("CENS", "Census"),
    ("PROB", "Probate"),
    ("WILL", "Will"),
    ("GRAD", "Graduation"),
    ("RETI", "Retirement"),
    ("DEAT", "Death"),
    ("BURI", "Burial"),
    ("CREM", "Cremation"),
    ("MARR", "Marriage"),
    ("MARB", "Marriage Bann"),
    ("MARC", "Marriage Contract"),
    ("MARL", "Marriage License"),
    ("MARS", "Marriage Settlement"),
    ("ENGA", "Engagement"),
    ("ANUL", "Annulment"),
    ("DIV", "Divorce"),
    ("DIVF", "Divorce Filed"),
    ("EVEN", "Event"),
];

fn event_type_name(tag: &str) -> Option<&'static str> {
    EVENT_TAGS
        .iter()
        .find(|(event_tag, _)| *event_tag == tag)
        .map(|&(_, name)| name)
}

/// One event derived from a record subtree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct Event {
    /// The event type: the tag's type name, or for `EVEN` the custom type
    /// string.
    pub kind: String,
    /// The raw event tag (`BIRT`, `EVEN`, …).
    pub tag: String,
    /// Parsed `DATE` child, when present.
    pub date: Option<ParsedDate>,
    /// Parsed `PLAC` child, when present.
    pub place: Option<ParsedPlace>,
    /// `SOUR` children: xrefs (`@S1@`) or inline citations, as written.
    pub sources: Vec<String>,
    /// `NOTE` children, continuations already folded in.
    pub notes: Vec<String>,
    /// The event line's own value, verbatim.
    pub value: String,
    /// The originating line within the record's arena.
    pub line: LineId,
}

impl Event {
    fn from_line(arena: &LineArena, id: LineId) -> Event {
        let node = arena.node(id);
        let kind = if node.tag == "EVEN" {
            custom_event_type(arena, id)
        } else {
            event_type_name(&node.tag)
                .unwrap_or(node.tag.as_str())
                .to_string()
        };

        Event {
            kind,
            tag: node.tag.clone(),
            date: arena
                .first_child_with_tag(id, "DATE")
                .map(|date| ParsedDate::parse(&arena.node(date).value)),
            place: arena
                .first_child_with_tag(id, "PLAC")
                .map(|plac| ParsedPlace::from_line(arena, plac)),
            sources: arena
                .children_with_tag(id, "SOUR")
                .map(|sour| arena.node(sour).value.clone())
                .collect(),
            notes: arena
                .children_with_tag(id, "NOTE")
                .map(|note| arena.node(note).value.clone())
                .collect(),
            value: node.value.clone(),
            line: id,
        }
    }
}

/// A custom event's effective type: `TYPE` sub-tag, then the event value,
/// then `"Unknown"`.
fn custom_event_type(arena: &LineArena, id: LineId) -> String {
    if let Some(type_line) = arena.first_child_with_tag(id, "TYPE") {
        let declared = arena.node(type_line).value.trim();
        if !declared.is_empty() {
            return declared.to_string();
        }
    }
    let value = arena.node(id).value.trim();
    if value.is_empty() {
        "Unknown".to_string()
    } else {
        value.to_string()
    }
}

/// Projects all recognized events among the direct children of `root`, in
/// arrival order.
#[must_use]
pub fn events_of(arena: &LineArena, root: LineId) -> Vec<Event> {
    arena
        .node(root)
        .children()
        .iter()
        .copied()
        .filter(|&child| event_type_name(&arena.node(child).tag).is_some())
        .map(|child| Event::from_line(arena, child))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::LineNode;

    fn individual_with_events() -> LineArena {
        let mut arena = LineArena::with_root(LineNode::new(0, "INDI", "", Some("@I1@"), 1));
        let root = arena.root();
        arena.attach(root, LineNode::new(1, "NAME", "John /Doe/", None, 2));
        let birt = arena.attach(root, LineNode::new(1, "BIRT", "", None, 3));
        arena.attach(birt, LineNode::new(2, "DATE", "2 OCT 1822", None, 4));
        arena.attach(
            birt,
            LineNode::new(2, "PLAC", "Weston, Madison, Connecticut", None, 5),
        );
        arena.attach(birt, LineNode::new(2, "SOUR", "@S1@", None, 6));
        let deat = arena.attach(root, LineNode::new(1, "DEAT", "", None, 7));
        arena.attach(deat, LineNode::new(2, "DATE", "BEF 1900", None, 8));
        arena.attach(deat, LineNode::new(2, "NOTE", "Date uncertain", None, 9));
        arena
    }

    #[test]
    fn test_events_in_arrival_order() {
        let arena = individual_with_events();
        let events = events_of(&arena, arena.root());
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, "Birth");
        assert_eq!(events[1].kind, "Death");
    }

    #[test]
    fn test_event_reads_date_and_place() {
        let arena = individual_with_events();
        let events = events_of(&arena, arena.root());

        let birth = &events[0];
        assert_eq!(birth.tag, "BIRT");
        let date = birth.date.as_ref().unwrap();
        assert_eq!(date.date.year, 1822);
        let place = birth.place.as_ref().unwrap();
        assert_eq!(place.county.as_deref(), Some("Madison"));
        assert_eq!(birth.sources, vec!["@S1@"]);
    }

    #[test]
    fn test_event_reads_notes() {
        let arena = individual_with_events();
        let events = events_of(&arena, arena.root());
        assert_eq!(events[1].notes, vec!["Date uncertain"]);
    }

    #[test]
    fn test_non_event_children_skipped() {
        let arena = individual_with_events();
        let events = events_of(&arena, arena.root());
        assert!(events.iter().all(|e| e.tag != "NAME"));
    }

    #[test]
    fn test_custom_event_type_from_type_sub_tag() {
        let mut arena = LineArena::with_root(LineNode::new(0, "INDI", "", Some("@I1@"), 1));
        let root = arena.root();
        let even = arena.attach(root, LineNode::new(1, "EVEN", "", None, 2));
        arena.attach(even, LineNode::new(2, "TYPE", "Land Purchase", None, 3));

        let events = events_of(&arena, root);
        assert_eq!(events[0].kind, "Land Purchase");
    }

    #[test]
    fn test_custom_event_type_from_value() {
        let mut arena = LineArena::with_root(LineNode::new(0, "INDI", "", Some("@I1@"), 1));
        let root = arena.root();
        arena.attach(root, LineNode::new(1, "EVEN", "Shipwreck", None, 2));

        let events = events_of(&arena, root);
        assert_eq!(events[0].kind, "Shipwreck");
    }

    #[test]
    fn test_custom_event_type_unknown() {
        let mut arena = LineArena::with_root(LineNode::new(0, "INDI", "", Some("@I1@"), 1));
        let root = arena.root();
        arena.attach(root, LineNode::new(1, "EVEN", "", None, 2));

        let events = events_of(&arena, root);
        assert_eq!(events[0].kind, "Unknown");
    }

    #[test]
    fn test_marriage_bann_reading() {
        let mut arena = LineArena::with_root(LineNode::new(0, "FAM", "", Some("@F1@"), 1));
        let root = arena.root();
        arena.attach(root, LineNode::new(1, "MARB", "", None, 2));

        let events = events_of(&arena, root);
        assert_eq!(events[0].kind, "Marriage Bann");
    }

    #[test]
    fn test_multiple_sources_in_order() {
        let mut arena = LineArena::with_root(LineNode::new(0, "INDI", "", Some("@I1@"), 1));
        let root = arena.root();
        let marr = arena.attach(root, LineNode::new(1, "MARR", "", None, 2));
        arena.attach(marr, LineNode::new(2, "SOUR", "@S1@", None, 3));
        arena.attach(marr, LineNode::new(2, "SOUR", "parish register", None, 4));

        let events = events_of(&arena, root);
        assert_eq!(events[0].sources, vec!["@S1@", "parish register"]);
    }
}
