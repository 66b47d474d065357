//! Marker tree tests over a derived GEDCOM-like model.
//!
//! The fixture in `tests/fixtures/dummy.json` is walked the way a migration
//! would walk it, and the resulting coverage is checked per branch.

#![allow(clippy::unwrap_used, clippy::panic)]

mod common;

use common::{load, Gedcom, Name, Person, Source};
use gedmark::{Accessible, Branch, GapReport, Invocation, PersonalName, ResultShape, Value};
use proptest::prelude::*;

fn people(root: &mut Branch) -> Vec<Branch> {
    root.get("people")
        .and_then(Invocation::into_branches)
        .unwrap()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

// ============================================================================
// Derived accessor tables
// ============================================================================

#[test]
fn accessor_table_follows_declaration_order() {
    assert_eq!(
        Gedcom::gedmark_accessors(),
        &["header", "people", "families", "sources", "notes", "extensions", "person", "person"]
    );
    assert_eq!(Name::gedmark_accessors(), &["value", "type"]);
    assert_eq!(Source::gedmark_accessors(), &["id", "title"]);
}

#[test]
fn shapes_come_from_declared_types() {
    let root = Branch::root(load());
    let rows: Vec<_> = root
        .catalog()
        .descriptors()
        .iter()
        .map(|d| (d.name(), d.arity(), d.shape()))
        .collect();

    assert_eq!(rows[0], ("header", 0, Some(ResultShape::DomainObject)));
    assert_eq!(rows[1], ("people", 0, Some(ResultShape::SequenceOfDomainObject)));
    assert_eq!(rows[5], ("extensions", 0, Some(ResultShape::ScalarOrOther)));
    assert_eq!(rows[6], ("person", 1, Some(ResultShape::DomainObject)));
    assert_eq!(rows[7], ("person", 0, Some(ResultShape::DomainObject)));
}

#[test]
fn fresh_root_reports_every_accessor() {
    let root = Branch::root(load());
    assert_eq!(root.path(), "");
    assert_eq!(root.display_path(), "/");
    assert_eq!(
        root.unmarked_items(),
        strings(&["header", "people", "families", "sources", "notes", "extensions", "person", "person"])
    );
}

// ============================================================================
// Walking the graph
// ============================================================================

#[test]
fn sequence_results_wrap_each_element() {
    let mut root = Branch::root(load());
    let people = people(&mut root);

    assert_eq!(people.len(), 2);
    assert!(people.iter().all(|p| p.path() == "/people"));
    assert_eq!(people[1].downcast_ref::<Person>().unwrap().id, "I2");
    assert!(!root.unmarked_items().contains(&"people".to_string()));
}

#[test]
fn nested_branches_extend_the_path() {
    let mut root = Branch::root(load());
    let mut people = people(&mut root);
    let mut names = people[0]
        .get("names")
        .and_then(Invocation::into_branches)
        .unwrap();
    assert_eq!(names[0].path(), "/people/names");

    let value = names[0].get("value").and_then(Invocation::into_value).unwrap();
    let parsed = PersonalName::parse(value.as_str().unwrap());
    assert_eq!(parsed.given.as_deref(), Some("William Lee"));
    assert_eq!(parsed.surname.as_deref(), Some("Parry"));
    assert_eq!(parsed.suffix.as_deref(), Some("Jr."));

    assert_eq!(names[0].unmarked_items(), strings(&["type"]));
}

#[test]
fn optional_domain_object_becomes_branch() {
    let mut root = Branch::root(load());
    let mut header = root.get("header").and_then(Invocation::into_branch).unwrap();

    assert_eq!(header.path(), "/header");
    assert_eq!(header.get("version").unwrap().as_str(), Some("5.5.1"));
    let submitter = header.get("submitter_ref").and_then(Invocation::into_value).unwrap();
    assert!(submitter.is_null());
    assert_eq!(header.unmarked_items(), strings(&["source", "charset"]));
}

#[test]
fn raw_values_are_returned_untouched() {
    let mut root = Branch::root(load());
    let extensions = root.get("extensions").and_then(Invocation::into_value).unwrap();
    let Value::Map(map) = extensions else {
        panic!("expected map");
    };
    assert!(map.contains_key("_ROOT"));

    let mut people = people(&mut root);
    let refs = people[0].get("family_refs").and_then(Invocation::into_value).unwrap();
    assert_eq!(refs.as_list().unwrap()[0].as_str(), Some("F1"));
}

#[derive(Debug, Clone, Accessible)]
struct Record {
    rin: u64,
    count: usize,
}

#[test]
fn wide_unsigned_fields_keep_their_value() {
    let mut root = Branch::root(Record {
        rin: u64::MAX - 1,
        count: 3,
    });

    let rin = root.get("rin").and_then(Invocation::into_value).unwrap();
    assert_eq!(rin.as_u64(), Some(u64::MAX - 1));
    assert_eq!(rin.as_int(), None);

    let count = root.get("count").and_then(Invocation::into_value).unwrap();
    assert_eq!(count.as_int(), Some(3));
}

#[test]
fn skipped_fields_are_not_tracked() {
    let mut root = Branch::root(load());
    let mut sources = root.get("sources").and_then(Invocation::into_branches).unwrap();

    assert_eq!(sources[0].catalog().len(), 2);
    assert!(sources[0].get("rin").is_none());
    // still carried by the value itself
    assert_eq!(
        sources[0].downcast_ref::<Source>().unwrap().rin.as_deref(),
        Some("17")
    );
}

// ============================================================================
// Methods, overloads, failures
// ============================================================================

#[test]
fn overloads_resolve_by_argument_count() {
    let mut root = Branch::root(load());
    let second = root
        .invoke("person", &[Value::from("I2")])
        .and_then(Invocation::into_branch)
        .unwrap();
    assert_eq!(second.path(), "/person");
    assert_eq!(second.downcast_ref::<Person>().unwrap().id, "I2");

    // only the one-argument overload is exercised
    let unmarked = root.unmarked_items();
    assert_eq!(unmarked.iter().filter(|n| *n == "person").count(), 1);

    let first = root.get("person").and_then(Invocation::into_branch).unwrap();
    assert_eq!(first.downcast_ref::<Person>().unwrap().id, "I1");
    assert!(!root.unmarked_items().contains(&"person".to_string()));
}

#[test]
fn absent_domain_object_is_null_but_exercised() {
    let mut root = Branch::root(load());
    let result = root
        .invoke("person", &[Value::from("I9")])
        .and_then(Invocation::into_value)
        .unwrap();

    assert!(result.is_null());
    assert_eq!(root.catalog().exercised_count(), 1);
}

#[test]
fn failing_accessor_is_not_exercised() {
    let mut root = Branch::root(load());
    let mut people = people(&mut root);
    let person = &mut people[0];

    assert!(person.invoke("name", &[Value::Int(3)]).is_none());
    assert!(person.invoke("name", &[Value::from("first")]).is_none());
    assert!(person.invoke("name", &[]).is_none());
    assert!(person.unmarked_items().contains(&"name".to_string()));

    let name = person
        .invoke("name", &[Value::Int(0)])
        .and_then(Invocation::into_branch)
        .unwrap();
    assert_eq!(name.path(), "/people/name");
    assert!(!person.unmarked_items().contains(&"name".to_string()));
}

#[test]
fn unknown_accessor_changes_nothing() {
    let mut root = Branch::root(load());
    assert!(root.get("submitter").is_none());
    assert_eq!(root.catalog().exercised_count(), 0);
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn ignoring_empty_skips_accessors_without_data() {
    let mut root = Branch::root(load());
    let mut people = people(&mut root);
    let _ = people[0].get("id");

    assert_eq!(
        people[0].unmarked_items(),
        strings(&["names", "sex", "event_facts", "notes", "family_refs", "uid", "name"])
    );
    assert_eq!(
        people[0].unmarked_items_ignoring_empty(),
        strings(&["names", "sex", "event_facts", "family_refs"])
    );
    assert_eq!(
        people[1].unmarked_items_ignoring_empty(),
        strings(&["id", "names", "sex", "notes", "family_refs", "uid"])
    );
    // querying does not mark
    assert_eq!(people[1].catalog().exercised_count(), 0);
}

#[test]
fn ignoring_empty_at_root() {
    let root = Branch::root(load());
    assert_eq!(
        root.unmarked(true),
        strings(&["header", "people", "families", "sources", "extensions", "person"])
    );
}

#[test]
fn display_shows_progress() {
    let mut root = Branch::root(load());
    let _ = root.get("people");
    assert_eq!(root.to_string(), "/ (Gedcom: 1/8 exercised)");
}

// ============================================================================
// Migration walk
// ============================================================================

#[test]
fn migration_walk_reports_gaps() {
    let mut report = GapReport::new();
    let mut root = Branch::root(load());
    let mut people = people(&mut root);

    for person in &mut people {
        let _ = person.get("id");
        let mut names = person
            .get("names")
            .and_then(Invocation::into_branches)
            .unwrap();
        for name in &mut names {
            let _ = name.get("value");
            name.mark("type");
        }
        report.record_all(&names);
    }
    report.record_all(&people);
    report.record(&root);

    let summary = report.summary();
    assert_eq!(summary.branches, 6);
    assert_eq!(summary.total_accessors, 3 * 2 + 2 * 8 + 8);
    assert_eq!(summary.unmarked_accessors, 2 * 6 + 7);
    assert!(!report.is_complete());

    let items = report.qualified_items();
    assert!(items.contains(&"/people/sex".to_string()));
    assert!(items.contains(&"/header".to_string()));
    assert!(!items.iter().any(|i| i.starts_with("/people/names")));

    let text = report.to_string();
    assert!(text.starts_with("Accessor coverage: "));
    assert!(text.contains("  unmarked: /people/uid"));
}

// ============================================================================
// Property tests
// ============================================================================

const FIELDS: [&str; 6] = ["header", "people", "families", "sources", "notes", "extensions"];

proptest! {
    #[test]
    fn unmarked_shrinks_by_distinct_invocations(
        picks in proptest::collection::vec(0usize..FIELDS.len(), 0..12)
    ) {
        let mut root = Branch::root(load());
        let mut distinct = picks.clone();
        distinct.sort_unstable();
        distinct.dedup();

        for &i in &picks {
            prop_assert!(root.get(FIELDS[i]).is_some());
        }
        prop_assert_eq!(root.unmarked_items().len(), 8 - distinct.len());
    }
}
