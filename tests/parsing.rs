//! End-to-end parsing scenarios over the public API.

use ged_tree::types::{DateKind, ParsedDate};
use ged_tree::{parse_str, Context, GedcomError, Severity};

#[test]
fn test_two_level_simple() {
    let source = "0 HEAD\n1 GEDC\n0 @I1@ INDI\n1 NAME John /Doe/\n0 TRLR\n";
    let (tree, errors) = parse_str(source).unwrap();
    assert!(errors.is_empty());

    let header = tree.header().unwrap();
    let children = header.first_line().children();
    assert_eq!(children.len(), 1);
    assert_eq!(header.lines().node(children[0]).tag, "GEDC");

    let individual = tree.get_individual("@I1@").unwrap();
    assert_eq!(individual.first_line().children().len(), 1);
    assert_eq!(individual.get_value("NAME"), "John /Doe/");
}

#[test]
fn test_deep_nesting_and_path_query() {
    let source = "\
        0 HEAD\n\
        0 @I1@ INDI\n\
        1 BIRT\n\
        2 DATE 2 Oct 1822\n\
        2 PLAC Weston, Madison, Connecticut\n\
        0 TRLR\n";
    let (tree, _) = parse_str(source).unwrap();
    let individual = tree.get_individual("@I1@").unwrap();

    assert_eq!(individual.get_value("BIRT.DATE"), "2 Oct 1822");
    assert_eq!(
        individual.get_value("BIRT.PLAC"),
        "Weston, Madison, Connecticut"
    );
}

#[test]
fn test_continuation_mixing() {
    let source = "0 @N1@ NOTE This is a note\n1 CONC that continues\n1 CONT on a new line\n0 TRLR\n";
    let (tree, errors) = parse_str(source).unwrap();
    assert!(errors.is_empty());

    let note = tree.get_note("@N1@").unwrap();
    assert_eq!(note.text(), "This is a notethat continues\non a new line");
}

#[test]
fn test_orphaned_line_warns_and_parse_continues() {
    let source = "1 NAME John /Doe/\n0 @I1@ INDI\n1 NAME Jane /Doe/\n0 TRLR\n";
    let (tree, errors) = parse_str(source).unwrap();

    let hierarchy: Vec<_> = errors.with_context(Context::Hierarchy).collect();
    assert_eq!(hierarchy.len(), 1);
    assert_eq!(hierarchy[0].severity, Severity::Warning);

    let individual = tree.get_individual("@I1@").unwrap();
    assert_eq!(individual.get_values("NAME"), vec!["Jane /Doe/"]);
}

#[test]
fn test_duplicate_xref_last_writer_wins() {
    let source = "0 @I1@ INDI\n1 NAME First /One/\n0 @I1@ INDI\n1 NAME Second /Two/\n0 TRLR\n";
    let (tree, _) = parse_str(source).unwrap();
    assert_eq!(
        tree.get_individual("@I1@").unwrap().get_value("NAME"),
        "Second /Two/"
    );
}

#[test]
fn test_date_grammar_scenario() {
    let date = ParsedDate::parse("BET 1800 AND 1850");
    assert_eq!(date.kind, DateKind::Between);
    assert_eq!(date.start.year, 1800);
    assert_eq!(date.end.year, 1850);
    assert!((date.years() - 1825.0).abs() <= 1.0);
    assert!(date.similarity(&ParsedDate::parse("1825"), 10.0) > 0.9);
}

#[test]
fn test_empty_input_is_severe() {
    assert!(matches!(parse_str(""), Err(GedcomError::EmptyInput)));
}

#[test]
fn test_trailer_only_is_empty_tree() {
    let (tree, errors) = parse_str("0 TRLR\n").unwrap();
    assert!(tree.is_empty());
    assert!(errors.is_empty());
}

#[test]
fn test_every_record_uuid_is_indexed() {
    let source = "\
        0 HEAD\n\
        0 @I1@ INDI\n\
        0 @F1@ FAM\n\
        0 @S1@ SOUR\n\
        0 @R1@ REPO\n\
        0 @U1@ SUBM\n\
        0 @M1@ OBJE\n\
        0 @N1@ NOTE text\n\
        0 TRLR\n";
    let (tree, _) = parse_str(source).unwrap();

    for (_, record) in tree.get_all_records() {
        assert!(tree.get_record_by_uuid(record.uuid()).is_some());
        assert_eq!(record.first_line().level, 0);
    }
    // Header has no xref but is still reachable by UUID.
    let header = tree.header().unwrap();
    assert!(tree.get_record_by_uuid(header.uuid()).is_some());
    assert_eq!(tree.record_count(), 8);
}

#[test]
fn test_unified_xref_index_spans_variants() {
    let source = "0 @I1@ INDI\n0 @S1@ SOUR\n0 TRLR\n";
    let (tree, _) = parse_str(source).unwrap();

    assert!(tree.get_record_by_xref("@I1@").unwrap().is_individual());
    assert!(tree
        .get_record_by_xref("@S1@")
        .unwrap()
        .as_source()
        .is_some());
    assert!(tree.get_record_by_xref("@X9@").is_none());
}

#[test]
fn test_family_resolution_through_tree() {
    let source = "\
        0 @I1@ INDI\n\
        1 NAME John /Doe/\n\
        0 @I2@ INDI\n\
        1 NAME Jane /Doe/\n\
        0 @I3@ INDI\n\
        1 NAME Jimmy /Doe/\n\
        0 @F1@ FAM\n\
        1 HUSB @I1@\n\
        1 WIFE @I2@\n\
        1 CHIL @I3@\n\
        0 TRLR\n";
    let (tree, _) = parse_str(source).unwrap();
    let family = tree.get_family("@F1@").unwrap();

    assert_eq!(family.husband().unwrap().xref(), Some("@I1@"));
    assert_eq!(family.wife().unwrap().xref(), Some("@I2@"));
    let children = family.children();
    assert_eq!(children.len(), 1);
    assert_eq!(
        children[0].name().unwrap().given.as_deref(),
        Some("Jimmy")
    );
}

#[test]
fn test_individual_event_projection() {
    let source = "\
        0 @I1@ INDI\n\
        1 NAME John /Doe/\n\
        1 BIRT\n\
        2 DATE 2 OCT 1822\n\
        2 PLAC Weston, Madison, Connecticut\n\
        1 DEAT\n\
        2 DATE BEF 1900\n\
        1 EVEN\n\
        2 TYPE Land Purchase\n\
        0 TRLR\n";
    let (tree, _) = parse_str(source).unwrap();
    let individual = tree.get_individual("@I1@").unwrap();

    let events = individual.events();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].kind, "Birth");
    assert_eq!(events[2].kind, "Land Purchase");

    let birth = individual.birth().unwrap();
    let date = birth.date.unwrap();
    assert_eq!(date.date.year, 1822);
    let place = birth.place.unwrap();
    assert_eq!(place.county.as_deref(), Some("Madison"));

    let death_date = individual.death().unwrap().date.unwrap();
    assert_eq!(death_date.kind, DateKind::Before);
}

#[test]
fn test_name_sub_tags_and_fallback() {
    let source = "\
        0 @I1@ INDI\n\
        1 NAME Dr. John /Doe/ Jr.\n\
        0 @I2@ INDI\n\
        1 NAME Mary /Smith/\n\
        2 GIVN Maria\n\
        2 SURN Smythe\n\
        0 TRLR\n";
    let (tree, _) = parse_str(source).unwrap();

    let fallback = tree.get_individual("@I1@").unwrap().name().unwrap();
    assert_eq!(fallback.prefix.as_deref(), Some("Dr."));
    assert_eq!(fallback.given.as_deref(), Some("John"));
    assert_eq!(fallback.surname.as_deref(), Some("Doe"));
    assert_eq!(fallback.suffix.as_deref(), Some("Jr."));

    let pieces = tree.get_individual("@I2@").unwrap().name().unwrap();
    assert_eq!(pieces.given.as_deref(), Some("Maria"));
    assert_eq!(pieces.surname.as_deref(), Some("Smythe"));
}

#[test]
fn test_parse_twice_structurally_identical() {
    let source = "\
        0 HEAD\n\
        1 GEDC\n\
        2 VERS 5.5\n\
        0 @I1@ INDI\n\
        1 NAME John /Doe/\n\
        1 BIRT\n\
        2 DATE 1850\n\
        0 @F1@ FAM\n\
        1 HUSB @I1@\n\
        0 TRLR\n";
    let (first, _) = parse_str(source).unwrap();
    let (second, _) = parse_str(source).unwrap();

    assert_eq!(first.record_count(), second.record_count());
    for (xref, record) in first.get_all_records() {
        let other = second.get_record_by_xref(&xref).unwrap();
        assert_eq!(record.lines(), other.lines());
        assert_ne!(record.uuid(), other.uuid());
    }
}

#[test]
fn test_value_whitespace_preserved() {
    let source = "0 @N1@ NOTE a  value   with  runs\n0 TRLR\n";
    let (tree, _) = parse_str(source).unwrap();
    assert_eq!(tree.get_note("@N1@").unwrap().text(), "a  value   with  runs");
}

#[test]
fn test_unknown_level0_tag_falls_back_to_generic() {
    let source = "0 _MYOWNTAG This is a non-standard tag. Not recommended but allowed\n0 TRLR\n";
    let (tree, errors) = parse_str(source).unwrap();
    assert!(!errors.has_severe_errors());
    assert_eq!(tree.record_count(), 1);
}
